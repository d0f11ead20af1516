//! The resume document as the editor builds it. Every field defaults so that
//! partially filled drafts deserialize.

use serde::{Deserialize, Serialize};

use crate::models::dates::{DateParseError, YearMonth};

/// Visual template used for preview and PDF export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Template {
    /// Clean single-column corporate layout.
    #[default]
    Professional,
    /// Banner header, skills near the top.
    Creative,
    /// Education first, serif type.
    Academic,
}

impl Template {
    pub const ALL: [Template; 3] = [Template::Professional, Template::Creative, Template::Academic];

    pub fn id(&self) -> &'static str {
        match self {
            Template::Professional => "professional",
            Template::Creative => "creative",
            Template::Academic => "academic",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Template::Professional => "Professional",
            Template::Creative => "Creative",
            Template::Academic => "Academic",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Template::Professional => {
                "A clean, professional template suitable for corporate environments"
            }
            Template::Creative => "A modern, eye-catching design for creative industries",
            Template::Academic => "A structured format ideal for academic and research positions",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersonalDetails {
    pub name: String,
    pub job_title: String,
    pub summary: String,
    pub email: String,
    pub phone: String,
    pub linkedin: Option<String>,
    pub github: Option<String>,
    pub website: Option<String>,
    pub location: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub id: Option<String>,
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    /// `YYYY-MM`; blank when the user has not filled it in yet.
    pub start_date: String,
    pub end_date: Option<String>,
    /// When set, `end_date` is ignored.
    pub current: bool,
    /// Newline-separated bullets.
    pub description: String,
}

impl ExperienceEntry {
    pub fn start(&self) -> Result<Option<YearMonth>, DateParseError> {
        YearMonth::parse_optional(&self.start_date)
    }

    /// Recorded end month. Always `None` for current positions.
    pub fn end(&self) -> Result<Option<YearMonth>, DateParseError> {
        if self.current {
            return Ok(None);
        }
        match self.end_date.as_deref() {
            Some(raw) => YearMonth::parse_optional(raw),
            None => Ok(None),
        }
    }

    /// Description lines with any leading bullet marker removed; blank lines dropped.
    pub fn bullets(&self) -> impl Iterator<Item = &str> {
        self.description
            .lines()
            .map(|line| line.trim().trim_start_matches(['•', '-', '*']).trim())
            .filter(|line| !line.is_empty())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EducationEntry {
    pub id: Option<String>,
    pub degree: String,
    pub institution: String,
    pub location: Option<String>,
    pub start_date: String,
    pub end_date: Option<String>,
    pub current: bool,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectEntry {
    pub id: Option<String>,
    pub name: String,
    pub link: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub description: String,
}

/// Skills keep insertion order; uniqueness is the editor's job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumeDocument {
    pub title: String,
    pub personal_details: PersonalDetails,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub skills: Vec<String>,
    pub projects: Vec<ProjectEntry>,
    pub template: Template,
}
