//! Health check handler

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_loaded: bool,
}

/// Always 200; reports the live readiness flag
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let model_loaded = state.model.is_loaded();

    Json(HealthResponse {
        status: if model_loaded { "ok" } else { "error" },
        model_loaded,
    })
}
