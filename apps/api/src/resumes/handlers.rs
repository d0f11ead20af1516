use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::records::{
    JobAnalysisRecord, NewJobAnalysis, NewResume, NewSkillSuggestion, ResumePatch, ResumeRecord,
    SkillSuggestionRecord,
};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIdQuery {
    pub user_id: Option<u64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillSuggestionQuery {
    #[serde(default)]
    pub job_title: String,
    pub industry: Option<String>,
}

/// GET /api/resumes
pub async fn handle_list_resumes(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Json<Vec<ResumeRecord>> {
    Json(state.store.list_resumes(params.user_id).await)
}

/// GET /api/resumes/:id
pub async fn handle_get_resume(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<ResumeRecord>, AppError> {
    state
        .store
        .get_resume(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

/// POST /api/resumes
pub async fn handle_create_resume(
    State(state): State<AppState>,
    Json(req): Json<NewResume>,
) -> Result<(StatusCode, Json<ResumeRecord>), AppError> {
    if req.title.trim().is_empty() {
        return Err(AppError::Validation("Resume title is required".to_string()));
    }
    let record = state.store.create_resume(req).await;
    info!("Created resume {} ('{}')", record.id, record.title);
    Ok((StatusCode::CREATED, Json(record)))
}

/// PUT /api/resumes/:id
pub async fn handle_update_resume(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(patch): Json<ResumePatch>,
) -> Result<Json<ResumeRecord>, AppError> {
    if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
        return Err(AppError::Validation("Resume title cannot be empty".to_string()));
    }
    state
        .store
        .update_resume(id, patch)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Resume {id} not found")))
}

/// DELETE /api/resumes/:id
pub async fn handle_delete_resume(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_resume(id).await {
        return Err(AppError::NotFound(format!("Resume {id} not found")));
    }
    info!("Deleted resume {id}");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/job-analyses
pub async fn handle_list_job_analyses(
    State(state): State<AppState>,
    Query(params): Query<UserIdQuery>,
) -> Json<Vec<JobAnalysisRecord>> {
    Json(state.store.list_job_analyses(params.user_id).await)
}

/// GET /api/job-analyses/:id
pub async fn handle_get_job_analysis(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<JobAnalysisRecord>, AppError> {
    state
        .store
        .get_job_analysis(id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Job analysis {id} not found")))
}

/// POST /api/job-analyses
pub async fn handle_create_job_analysis(
    State(state): State<AppState>,
    Json(req): Json<NewJobAnalysis>,
) -> Result<(StatusCode, Json<JobAnalysisRecord>), AppError> {
    if req.job_description.trim().is_empty() {
        return Err(AppError::Validation("Job description is required".to_string()));
    }
    let record = state.store.create_job_analysis(req).await;
    info!("Saved job analysis {}", record.id);
    Ok((StatusCode::CREATED, Json(record)))
}

/// DELETE /api/job-analyses/:id
pub async fn handle_delete_job_analysis(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<StatusCode, AppError> {
    if !state.store.delete_job_analysis(id).await {
        return Err(AppError::NotFound(format!("Job analysis {id} not found")));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/skill-suggestions
pub async fn handle_find_skill_suggestions(
    State(state): State<AppState>,
    Query(params): Query<SkillSuggestionQuery>,
) -> Json<Vec<SkillSuggestionRecord>> {
    Json(
        state
            .store
            .find_skill_suggestions(&params.job_title, params.industry.as_deref())
            .await,
    )
}

/// POST /api/skill-suggestions
pub async fn handle_create_skill_suggestion(
    State(state): State<AppState>,
    Json(req): Json<NewSkillSuggestion>,
) -> Result<(StatusCode, Json<SkillSuggestionRecord>), AppError> {
    if req.job_title.trim().is_empty() {
        return Err(AppError::Validation("Job title is required".to_string()));
    }
    let record = state.store.create_skill_suggestion(req).await;
    Ok((StatusCode::CREATED, Json(record)))
}
