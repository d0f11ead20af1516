//! Axum route handler for job match analysis.

use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::matching::{analyze, JobAnalysisResult};
use crate::models::ResumeDocument;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeJobRequest {
    pub job_description: Option<String>,
    pub resume_content: Option<ResumeDocument>,
}

/// POST /api/analyze-job
///
/// Compares a job description with the submitted resume: skill coverage and
/// years-of-experience requirements.
pub async fn handle_analyze_job(
    Json(request): Json<AnalyzeJobRequest>,
) -> Result<Json<JobAnalysisResult>, AppError> {
    let job_description = request
        .job_description
        .filter(|jd| !jd.trim().is_empty());
    let (Some(job_description), Some(resume)) = (job_description, request.resume_content) else {
        return Err(AppError::Validation(
            "Job description and resume content are required".to_string(),
        ));
    };

    let analysis = analyze(&job_description, &resume)?;
    info!(
        "Job analysis: {}% skills match, {} experience requirement(s)",
        analysis.skills_match.percentage,
        analysis.experience_match.len()
    );

    Ok(Json(analysis))
}
