mod catalog;
mod config;
mod curation;
mod errors;
mod llm_client;
mod models;
mod routes;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::catalog::load_catalog;
use crate::config::Config;
use crate::curation::orchestrator::CurationOrchestrator;
use crate::curation::reranker::LlmReranker;
use crate::curation::scoring::ScoringEngine;
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (malformed values abort startup)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Curation API v{}", env!("CARGO_PKG_VERSION"));

    // Load the catalog once; a missing or malformed file is fatal
    let catalog = load_catalog(&config.products_json).with_context(|| {
        format!(
            "Failed to load catalog from {}",
            config.products_json.display()
        )
    })?;
    let summary = catalog.summary();
    info!(
        "Catalog loaded: {} products ({} visible, {} bundles)",
        summary.total, summary.visible, summary.bundles
    );
    let catalog = Arc::new(catalog);

    // Build the curation pipeline
    let engine = ScoringEngine::new(config.corrected_bundle_weight);
    let mut curator =
        CurationOrchestrator::new(Arc::clone(&catalog), engine, config.top_k_preselect);

    if config.use_llm {
        let llm = LlmClient::new(config.llm_settings())?;
        info!(
            "LLM re-ranking enabled (model: {}, endpoint: {})",
            llm.model(),
            config.llm_base_url
        );
        curator = curator.with_reranker(Arc::new(LlmReranker::new(llm)), config.llm_timeout);
    } else {
        info!("LLM re-ranking disabled; serving rule-based curation");
    }

    // Build app state
    let state = AppState {
        catalog,
        curator: Arc::new(curator),
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
