//! Axum route handlers for the Curation API.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::catalog::CatalogSummary;
use crate::errors::AppError;
use crate::models::curation::{CurateRequest, CurateResponse, MAX_MAX_PRODUCTS, MIN_MAX_PRODUCTS};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct StatsConfig {
    pub top_k_preselect: usize,
    pub default_max_products: u32,
    pub llm_enabled: bool,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub products: CatalogSummary,
    pub config: StatsConfig,
    pub timestamp: DateTime<Utc>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /curate
///
/// Curates products for a venue profile. Re-ranking failures degrade to the
/// rule-based result; only an empty catalog or an internal fault is an error.
pub async fn handle_curate(
    State(state): State<AppState>,
    payload: Result<Json<CurateRequest>, JsonRejection>,
) -> Result<Json<CurateResponse>, AppError> {
    let Json(request) = payload?;

    let max_products = request
        .max_products
        .unwrap_or(state.config.default_max_products);
    if !(MIN_MAX_PRODUCTS..=MAX_MAX_PRODUCTS).contains(&max_products) {
        return Err(AppError::Validation(format!(
            "maxProducts must be between {MIN_MAX_PRODUCTS} and {MAX_MAX_PRODUCTS}"
        )));
    }

    info!(
        "Curating for venue type {} (max {max_products})",
        request.profile.venue_type
    );
    let result = state
        .curator
        .curate(&request.profile, max_products as usize)
        .await?;
    info!(
        "Curated {} products (source: {:?}, confidence: {:.2})",
        result.curated.len(),
        result.source,
        result.confidence
    );

    Ok(Json(CurateResponse::from(result)))
}

/// GET /stats
///
/// Catalog summary and the effective curation settings.
pub async fn handle_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    if state.catalog.is_empty() {
        return Err(AppError::ServiceUnavailable(
            "Products not loaded".to_string(),
        ));
    }

    Ok(Json(StatsResponse {
        products: state.catalog.summary(),
        config: StatsConfig {
            top_k_preselect: state.config.top_k_preselect,
            default_max_products: state.config.default_max_products,
            llm_enabled: state.curator.reranking_enabled(),
        },
        timestamp: Utc::now(),
    }))
}
