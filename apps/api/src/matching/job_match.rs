//! Job match analysis: compares a job description against a resume.
//!
//! Flow: extract required skills → collect resume skills → match →
//!       extract years requirements → aggregate resume tenure → check each requirement.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matching::experience::{aggregate_experience_at, extract_requirements};
use crate::matching::skills::{extract_skills, match_skills, SkillMatch};
use crate::models::{DateParseError, ResumeDocument, YearMonth};

/// Raised when any step of the analysis fails. No partial result is produced.
#[derive(Debug, Error)]
#[error("failed to analyze job description: {source}")]
pub struct AnalysisFailed {
    #[from]
    source: DateParseError,
}

/// One years-of-experience requirement checked against the resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceCheck {
    /// e.g. "5+ years of experience".
    pub requirement: String,
    pub context: String,
    pub met: bool,
    /// The resume's total tenure, e.g. "3+ years".
    pub resume_years: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalysisResult {
    pub skills_match: SkillMatch,
    pub experience_match: Vec<ExperienceCheck>,
}

/// Analyzes a job description against a resume as of the current month.
pub fn analyze(
    job_description: &str,
    resume: &ResumeDocument,
) -> Result<JobAnalysisResult, AnalysisFailed> {
    analyze_at(job_description, resume, YearMonth::today())
}

pub fn analyze_at(
    job_description: &str,
    resume: &ResumeDocument,
    today: YearMonth,
) -> Result<JobAnalysisResult, AnalysisFailed> {
    let required = extract_skills(job_description);
    let possessed = resume_skills(resume);
    let skills_match = match_skills(&required, &possessed);

    let total = aggregate_experience_at(&resume.experience, today)?;

    let experience_match = extract_requirements(job_description)
        .into_iter()
        .map(|req| ExperienceCheck {
            requirement: format!("{}+ years of experience", req.years),
            context: req.context,
            met: total.covers_years(req.years),
            resume_years: total.display.clone(),
        })
        .collect();

    Ok(JobAnalysisResult {
        skills_match,
        experience_match,
    })
}

/// The resume's skill list, or skills mined from experience descriptions when
/// the list is empty.
fn resume_skills(resume: &ResumeDocument) -> Vec<String> {
    if !resume.skills.is_empty() {
        return resume.skills.clone();
    }

    let mut seen = HashSet::new();
    resume
        .experience
        .iter()
        .flat_map(|entry| extract_skills(&entry.description))
        .filter(|skill| seen.insert(skill.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ExperienceEntry;
    use pretty_assertions::assert_eq;

    fn today() -> YearMonth {
        YearMonth::new(2025, 3).unwrap()
    }

    fn resume_with_skills(skills: &[&str]) -> ResumeDocument {
        ResumeDocument {
            skills: skills.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_python_sql_full_match() {
        let resume = resume_with_skills(&["python", "sql"]);
        let result =
            analyze_at("5+ years experience with Python and SQL", &resume, today()).unwrap();
        assert_eq!(result.skills_match.percentage, 100);
        assert!(result.skills_match.missing.is_empty());
        assert_eq!(result.experience_match.len(), 1);
        assert_eq!(result.experience_match[0].requirement, "5+ years of experience");
        assert!(!result.experience_match[0].met);
        assert_eq!(result.experience_match[0].resume_years, "0 months");
    }

    #[test]
    fn test_ten_years_not_met_by_two_year_current_role() {
        let resume = ResumeDocument {
            experience: vec![ExperienceEntry {
                title: "Analyst".to_string(),
                start_date: today().minus_months(24).to_string(),
                current: true,
                ..Default::default()
            }],
            ..Default::default()
        };
        let result = analyze_at("10 years experience required", &resume, today()).unwrap();
        assert_eq!(result.experience_match.len(), 1);
        assert!(!result.experience_match[0].met);
        assert_eq!(result.experience_match[0].resume_years, "2+ years");
    }

    #[test]
    fn test_requirement_met() {
        let resume = ResumeDocument {
            experience: vec![ExperienceEntry {
                start_date: "2015-01".to_string(),
                end_date: Some("2021-01".to_string()),
                ..Default::default()
            }],
            ..Default::default()
        };
        let result = analyze_at("Requires 5 years of experience.", &resume, today()).unwrap();
        assert!(result.experience_match[0].met);
        assert_eq!(result.experience_match[0].resume_years, "6+ years");
    }

    #[test]
    fn test_falls_back_to_experience_descriptions_for_skills() {
        let resume = ResumeDocument {
            experience: vec![
                ExperienceEntry {
                    description: "Built dashboards in Tableau".to_string(),
                    ..Default::default()
                },
                ExperienceEntry {
                    description: "Deployed services on AWS with Docker".to_string(),
                    ..Default::default()
                },
            ],
            ..Default::default()
        };
        assert_eq!(
            resume_skills(&resume),
            vec!["tableau".to_string(), "aws".to_string(), "docker".to_string()]
        );

        let result = analyze_at("We run Docker on AWS. Kubernetes a plus.", &resume, today())
            .unwrap();
        assert_eq!(result.skills_match.missing, vec!["kubernetes".to_string()]);
    }

    #[test]
    fn test_no_requirements_is_full_match() {
        let result = analyze_at("Friendly team!", &ResumeDocument::default(), today()).unwrap();
        assert_eq!(result.skills_match.percentage, 100);
        assert!(result.experience_match.is_empty());
    }

    #[test]
    fn test_invalid_date_fails_whole_analysis() {
        let resume = ResumeDocument {
            experience: vec![ExperienceEntry {
                start_date: "whenever".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        let err = analyze_at("3 years experience", &resume, today()).unwrap_err();
        assert!(err.to_string().contains("whenever"));
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let result = analyze_at("2 years experience", &resume_with_skills(&[]), today()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("skillsMatch").is_some());
        assert!(json["experienceMatch"][0].get("resumeYears").is_some());
    }
}
