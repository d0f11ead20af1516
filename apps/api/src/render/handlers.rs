use axum::{
    http::{header, HeaderName},
    Json,
};
use bytes::Bytes;
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::models::ResumeDocument;
use crate::render::render_resume_pdf;

#[derive(Debug, Deserialize)]
pub struct ExportPdfRequest {
    pub resume: Option<ResumeDocument>,
}

/// POST /api/export-pdf
///
/// Responds with the rendered PDF as a download named after the candidate.
pub async fn handle_export_pdf(
    Json(req): Json<ExportPdfRequest>,
) -> Result<([(HeaderName, String); 2], Bytes), AppError> {
    let resume = req
        .resume
        .ok_or_else(|| AppError::Validation("Resume data is required".to_string()))?;

    let pdf = render_resume_pdf(&resume)?;
    let file_name = download_name(&resume.personal_details.name);
    info!("Exported {} ({} bytes)", file_name, pdf.len());

    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        Bytes::from(pdf),
    ))
}

/// `Jane_Doe.pdf`, or `Resume.pdf` when the name has nothing printable.
fn download_name(name: &str) -> String {
    let stem: String = name
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect();
    if stem.is_empty() {
        "Resume.pdf".to_string()
    } else {
        format!("{stem}.pdf")
    }
}
