use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub products_loaded: usize,
    pub llm_enabled: bool,
    pub timestamp: DateTime<Utc>,
}

/// GET /health
/// Liveness plus catalog size and whether re-ranking is active.
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        products_loaded: state.catalog.len(),
        llm_enabled: state.curator.reranking_enabled(),
        timestamp: Utc::now(),
    })
}
