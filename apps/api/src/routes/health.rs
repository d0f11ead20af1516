use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

use crate::models::Template;

/// GET /health
/// Returns a simple status object with service version.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": env!("CARGO_PKG_NAME")
    }))
}

#[derive(Debug, Serialize)]
pub struct TemplateInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

/// GET /api/templates
pub async fn templates_handler() -> Json<Vec<TemplateInfo>> {
    Json(
        Template::ALL
            .iter()
            .map(|t| TemplateInfo {
                id: t.id(),
                name: t.name(),
                description: t.description(),
            })
            .collect(),
    )
}
