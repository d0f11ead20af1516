//! Skill extraction from free text and loose stemmed skill comparison.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::matching::text::{split_sentences, stem, tokenize};

/// Technology terms looked up by plain substring containment.
pub const TECHNICAL_TERMS: &[&str] = &[
    "python",
    "java",
    "javascript",
    "typescript",
    "react",
    "node",
    "sql",
    "database",
    "aws",
    "azure",
    "docker",
    "kubernetes",
    "ml",
    "ai",
    "machine learning",
    "data science",
    "tensorflow",
    "pytorch",
    "tableau",
    "power bi",
    "excel",
    "statistical analysis",
];

/// Cue words that usually precede a skill ("proficient in X", "experience with Y").
pub const SKILL_INDICATORS: &[&str] = &[
    "skill",
    "proficient",
    "knowledge",
    "experience",
    "familiarity",
];

static INDICATOR_PATTERNS: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    SKILL_INDICATORS
        .iter()
        .map(|&indicator| {
            let pattern = format!(r"(?i){indicator}\s+(?:in|with|of)?\s+([a-z0-9_\s]+)");
            (
                indicator,
                Regex::new(&pattern).expect("valid skill indicator regex"),
            )
        })
        .collect()
});

/// Extracts candidate skills from free text. Order of first appearance is kept.
///
/// Captures after an indicator run until the next non-word character, so
/// "experience with Python and SQL" yields "python and sql" alongside the
/// vocabulary hits "python" and "sql".
pub fn extract_skills(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut skills = Vec::new();
    let mut push = |skill: String| {
        if seen.insert(skill.clone()) {
            skills.push(skill);
        }
    };

    for sentence in split_sentences(text) {
        if tokenize(sentence).is_empty() {
            continue;
        }
        let lowered = sentence.to_lowercase();

        for term in TECHNICAL_TERMS {
            if lowered.contains(term) {
                push(term.to_string());
            }
        }

        for (indicator, pattern) in INDICATOR_PATTERNS.iter() {
            if !lowered.contains(indicator) {
                continue;
            }
            if let Some(capture) = pattern.captures(&lowered).and_then(|c| c.get(1)) {
                let candidate = capture.as_str().trim();
                if !candidate.is_empty() {
                    push(candidate.to_string());
                }
            }
        }
    }

    skills
}

/// Outcome of comparing required skills against the skills a candidate has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMatch {
    /// 0–100.
    pub percentage: u8,
    /// Required skills that were covered, in their original casing.
    pub matched: Vec<String>,
    /// Required skills with no stemmed counterpart, in their original casing.
    pub missing: Vec<String>,
}

/// Compares skills by stemmed substring containment in either direction.
///
/// No requirements counts as a full match.
pub fn match_skills(required: &[String], possessed: &[String]) -> SkillMatch {
    let possessed_stems: Vec<String> = possessed
        .iter()
        .filter(|skill| !skill.trim().is_empty())
        .map(|skill| stem(skill))
        .collect();

    let mut matched = Vec::new();
    let mut missing = Vec::new();

    for skill in required {
        let required_stem = stem(skill);
        let covered = possessed_stems.iter().any(|have| {
            have.contains(required_stem.as_str()) || required_stem.contains(have.as_str())
        });
        if covered {
            matched.push(skill.clone());
        } else {
            missing.push(skill.clone());
        }
    }

    let percentage = if required.is_empty() {
        100
    } else {
        ((matched.len() as f64 / required.len() as f64) * 100.0).round() as u8
    };

    SkillMatch {
        percentage,
        matched,
        missing,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_extract_empty_text() {
        assert!(extract_skills("").is_empty());
        assert!(extract_skills("...!?").is_empty());
    }

    #[test]
    fn test_extract_vocabulary_and_indicator_capture() {
        let skills = extract_skills("5+ years experience with Python and SQL");
        assert_eq!(skills, strings(&["python", "sql", "python and sql"]));
    }

    #[test]
    fn test_extract_indicator_needs_preposition_or_double_space() {
        // `\s+(?:in|with|of)?\s+` needs two whitespace runs when no preposition is present.
        let skills = extract_skills("10 years experience required");
        assert!(skills.is_empty(), "got {skills:?}");
    }

    #[test]
    fn test_extract_multiple_indicators() {
        let skills = extract_skills("Proficient in Go. Knowledge of distributed systems!");
        assert_eq!(skills, strings(&["go", "distributed systems"]));
    }

    #[test]
    fn test_extract_dedupes_across_sentences() {
        let skills = extract_skills("We use Docker. Docker everywhere.");
        assert_eq!(skills, strings(&["docker"]));
    }

    #[test]
    fn test_extract_capture_stops_at_punctuation() {
        let skills = extract_skills("Familiarity with tableau, excel");
        assert_eq!(skills, strings(&["tableau", "excel"]));
    }

    #[test]
    fn test_match_empty_required_is_full() {
        let result = match_skills(&[], &strings(&["rust"]));
        assert_eq!(result.percentage, 100);
        assert!(result.matched.is_empty());
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_match_bidirectional_containment() {
        let required = strings(&["python", "sql", "python and sql"]);
        let result = match_skills(&required, &strings(&["python", "sql"]));
        assert_eq!(result.percentage, 100);
        assert!(result.missing.is_empty());
        assert_eq!(result.matched, required);
    }

    #[test]
    fn test_match_plural_variants() {
        let result = match_skills(&strings(&["Databases"]), &strings(&["database"]));
        assert_eq!(result.percentage, 100);
    }

    #[test]
    fn test_match_reports_missing_in_original_casing() {
        let result = match_skills(&strings(&["Kubernetes", "SQL", "AWS"]), &strings(&["sql"]));
        assert_eq!(result.percentage, 33);
        assert_eq!(result.missing, strings(&["Kubernetes", "AWS"]));
        assert_eq!(result.matched, strings(&["SQL"]));
    }

    #[test]
    fn test_match_ignores_blank_possessed_skills() {
        let result = match_skills(&strings(&["rust"]), &strings(&["", "  "]));
        assert_eq!(result.percentage, 0);
    }

    proptest! {
        #[test]
        fn prop_no_requirements_is_always_full(
            possessed in proptest::collection::vec("[a-z ]{0,12}", 0..6),
        ) {
            prop_assert_eq!(match_skills(&[], &possessed).percentage, 100);
        }

        #[test]
        fn prop_adding_possessed_never_lowers_match(
            required in proptest::collection::vec("[a-z]{1,10}", 1..6),
            possessed in proptest::collection::vec("[a-z]{1,10}", 0..6),
            extra in "[a-z]{1,10}",
        ) {
            let before = match_skills(&required, &possessed).percentage;
            let mut more = possessed.clone();
            more.push(extra);
            let after = match_skills(&required, &more).percentage;
            prop_assert!(after >= before);
        }

        #[test]
        fn prop_matched_and_missing_partition_required(
            required in proptest::collection::vec("[a-z]{1,10}", 0..6),
            possessed in proptest::collection::vec("[a-z]{1,10}", 0..6),
        ) {
            let result = match_skills(&required, &possessed);
            prop_assert_eq!(result.matched.len() + result.missing.len(), required.len());
            prop_assert!(result.percentage <= 100);
        }
    }
}
