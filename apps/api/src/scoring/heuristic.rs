//! Rule-based resume scoring. Used directly and as the last link of the
//! assist chain when no AI provider answers.
//!
//! Each failed rule adds one suggestion and a fixed penalty; the score is
//! `100 - total penalty`, floored at zero.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::ResumeDocument;
use crate::scoring::ResumeScore;

const MIN_SUMMARY_CHARS: usize = 50;
const MIN_BULLETS_PER_ENTRY: usize = 3;
const MIN_SKILLS: usize = 5;

const SUMMARY_PENALTY: u32 = 5;
const BULLETS_PENALTY_PER_ENTRY: u32 = 3;
const QUANTIFICATION_PENALTY: u32 = 10;
const SKILLS_PENALTY: u32 = 8;
const PROJECTS_PENALTY: u32 = 7;

pub const SUMMARY_SUGGESTION: &str =
    "Add a more detailed professional summary (aim for 75-150 words)";
pub const BULLETS_SUGGESTION: &str =
    "Add more bullet points to your work experience (aim for 3-5 per job)";
pub const QUANTIFICATION_SUGGESTION: &str =
    "Add quantifiable achievements to your experience (e.g., \"increased sales by 20%\")";
pub const SKILLS_SUGGESTION: &str =
    "Add more skills relevant to your field (aim for 8-12 key skills)";
pub const PROJECTS_SUGGESTION: &str = "Add at least one project that showcases your skills";

/// Percentages, multipliers, dollar amounts, or a count followed by a word.
static QUANTIFIED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\d+%|\d+x|\$\d+|\d+ [a-z]+").expect("valid quantification regex")
});

/// True when the text carries a measurable outcome.
pub fn is_quantified(text: &str) -> bool {
    QUANTIFIED.is_match(text)
}

/// Scores a resume with fixed penalties. Never fails.
///
/// `grammar_issues` stays empty and `fallback` is left `false`; the caller
/// decides whether this result counts as a fallback.
pub fn score_resume(resume: &ResumeDocument) -> ResumeScore {
    let mut penalty: u32 = 0;
    let mut improvements = Vec::new();

    if resume.personal_details.summary.chars().count() < MIN_SUMMARY_CHARS {
        improvements.push(SUMMARY_SUGGESTION.to_string());
        penalty += SUMMARY_PENALTY;
    }

    let thin_entries = resume
        .experience
        .iter()
        .filter(|entry| entry.description.split('\n').count() < MIN_BULLETS_PER_ENTRY)
        .count() as u32;
    if thin_entries > 0 {
        improvements.push(BULLETS_SUGGESTION.to_string());
        penalty += BULLETS_PENALTY_PER_ENTRY * thin_entries;
    }

    let has_quantified = resume
        .experience
        .iter()
        .any(|entry| is_quantified(&entry.description));
    if !has_quantified {
        improvements.push(QUANTIFICATION_SUGGESTION.to_string());
        penalty += QUANTIFICATION_PENALTY;
    }

    if resume.skills.len() < MIN_SKILLS {
        improvements.push(SKILLS_SUGGESTION.to_string());
        penalty += SKILLS_PENALTY;
    }

    if resume.projects.is_empty() {
        improvements.push(PROJECTS_SUGGESTION.to_string());
        penalty += PROJECTS_PENALTY;
    }

    ResumeScore {
        score: 100u32.saturating_sub(penalty).min(100) as u8,
        improvements,
        grammar_issues: Vec::new(),
        fallback: false,
    }
}
