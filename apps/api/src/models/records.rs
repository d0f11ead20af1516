//! Stored records. Document and analysis payloads are kept as opaque JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::models::Template;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeRecord {
    pub id: u64,
    pub user_id: Option<u64>,
    pub title: String,
    pub content: Value,
    pub template: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Missing fields default so that validation, not deserialization, reports them.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewResume {
    pub user_id: Option<u64>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub content: Value,
    #[serde(default = "default_template")]
    pub template: String,
}

fn default_template() -> String {
    Template::default().id().to_string()
}

/// Partial update; absent fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResumePatch {
    pub user_id: Option<u64>,
    pub title: Option<String>,
    pub content: Option<Value>,
    pub template: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalysisRecord {
    pub id: u64,
    pub user_id: Option<u64>,
    pub resume_id: Option<u64>,
    pub job_description: String,
    pub analysis: Value,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewJobAnalysis {
    pub user_id: Option<u64>,
    pub resume_id: Option<u64>,
    pub job_description: String,
    pub analysis: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSuggestionRecord {
    pub id: u64,
    pub industry: String,
    pub job_title: String,
    pub skills: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewSkillSuggestion {
    pub industry: String,
    pub job_title: String,
    pub skills: Vec<String>,
}
