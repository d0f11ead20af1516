pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::assist::handlers as assist;
use crate::matching::handlers as matching;
use crate::render::handlers as render;
use crate::resumes::handlers as resumes;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/templates", get(health::templates_handler))
        // Saved documents
        .route(
            "/api/resumes",
            get(resumes::handle_list_resumes).post(resumes::handle_create_resume),
        )
        .route(
            "/api/resumes/:id",
            get(resumes::handle_get_resume)
                .put(resumes::handle_update_resume)
                .delete(resumes::handle_delete_resume),
        )
        .route(
            "/api/job-analyses",
            get(resumes::handle_list_job_analyses).post(resumes::handle_create_job_analysis),
        )
        .route(
            "/api/job-analyses/:id",
            get(resumes::handle_get_job_analysis).delete(resumes::handle_delete_job_analysis),
        )
        .route(
            "/api/skill-suggestions",
            get(resumes::handle_find_skill_suggestions)
                .post(resumes::handle_create_skill_suggestion),
        )
        // Analysis and writing assistance
        .route("/api/analyze-job", post(matching::handle_analyze_job))
        .route("/api/generate-summary", post(assist::handle_generate_summary))
        .route("/api/suggest-skills", post(assist::handle_suggest_skills))
        .route(
            "/api/improve-description",
            post(assist::handle_improve_description),
        )
        .route("/api/score-resume", post(assist::handle_score_resume))
        .route("/api/export-pdf", post(render::handle_export_pdf))
        .with_state(state)
}
