use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::assist::SectionKind;
use crate::errors::AppError;
use crate::models::ResumeDocument;
use crate::scoring::ResumeScore;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSummaryRequest {
    pub resume_content: Option<ResumeDocument>,
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SummaryResponse {
    pub summary: String,
    pub source: String,
    pub fallback: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestSkillsRequest {
    pub job_title: Option<String>,
    pub industry: Option<String>,
    #[serde(default)]
    pub current_skills: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SkillsResponse {
    pub skills: Vec<String>,
    pub source: String,
    pub fallback: bool,
}

#[derive(Debug, Deserialize)]
pub struct ImproveDescriptionRequest {
    pub description: Option<String>,
    /// "experience", "project" or "summary".
    #[serde(rename = "type")]
    pub kind: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImproveResponse {
    pub improved: String,
    pub source: String,
    pub fallback: bool,
}

#[derive(Debug, Deserialize)]
pub struct ScoreResumeRequest {
    pub resume: Option<ResumeDocument>,
}

/// POST /api/generate-summary
pub async fn handle_generate_summary(
    State(state): State<AppState>,
    Json(req): Json<GenerateSummaryRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    let resume = req
        .resume_content
        .ok_or_else(|| AppError::Validation("Resume content is required".to_string()))?;

    let result = state
        .assistants
        .generate_summary(&resume, req.job_description.as_deref())
        .await;
    info!("Summary generated by {}", result.source);

    Ok(Json(SummaryResponse {
        summary: result.value,
        source: result.source,
        fallback: result.fallback,
    }))
}

/// POST /api/suggest-skills
pub async fn handle_suggest_skills(
    State(state): State<AppState>,
    Json(req): Json<SuggestSkillsRequest>,
) -> Result<Json<SkillsResponse>, AppError> {
    let job_title = req
        .job_title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::Validation("Job title is required".to_string()))?;
    let industry = req.industry.as_deref().filter(|i| !i.trim().is_empty());

    let result = state
        .assistants
        .suggest_skills(job_title.trim(), industry, &req.current_skills)
        .await;
    info!(
        "Suggested {} skill(s) for '{}' via {}",
        result.value.len(),
        job_title,
        result.source
    );

    Ok(Json(SkillsResponse {
        skills: result.value,
        source: result.source,
        fallback: result.fallback,
    }))
}

/// POST /api/improve-description
///
/// Both `description` and `type` must be present. A whitespace-only description
/// is accepted and answered with a fill-in template.
pub async fn handle_improve_description(
    State(state): State<AppState>,
    Json(req): Json<ImproveDescriptionRequest>,
) -> Result<Json<ImproveResponse>, AppError> {
    let (description, label) = match (req.description, req.kind) {
        (Some(description), Some(label)) if !description.is_empty() && !label.is_empty() => {
            (description, label)
        }
        _ => {
            return Err(AppError::Validation(
                "Description and type (experience, project, or summary) are required"
                    .to_string(),
            ))
        }
    };
    let kind = SectionKind::from_label(&label);

    let result = state
        .assistants
        .improve_description(&description, kind)
        .await;

    Ok(Json(ImproveResponse {
        improved: result.value,
        source: result.source,
        fallback: result.fallback,
    }))
}

/// POST /api/score-resume
pub async fn handle_score_resume(
    State(state): State<AppState>,
    Json(req): Json<ScoreResumeRequest>,
) -> Result<Json<ResumeScore>, AppError> {
    let resume = req
        .resume
        .ok_or_else(|| AppError::Validation("Resume data is required".to_string()))?;

    let result = state.assistants.score_resume(&resume).await;
    info!("Resume scored {} by {}", result.value.score, result.source);

    Ok(Json(result.value))
}
