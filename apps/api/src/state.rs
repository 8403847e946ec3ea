use std::sync::Arc;

use crate::catalog::Catalog;
use crate::config::Config;
use crate::curation::orchestrator::CurationOrchestrator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Immutable after startup; shared read-only by every request.
    pub catalog: Arc<Catalog>,
    /// Holds the scoring engine and, when `USE_LLM` is set, the re-ranking gateway.
    pub curator: Arc<CurationOrchestrator>,
    pub config: Config,
}
