pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::curation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/curate", post(handlers::handle_curate))
        .route("/stats", get(handlers::handle_stats))
        .with_state(state)
}
