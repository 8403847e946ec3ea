//! Curation Orchestrator: runs one curation request end to end.
//!
//! Flow: score catalog → diversity-capped preselection → rule-based result →
//!       optional re-ranking gateway → gateway result or rule-based fallback.
//!
//! The result is either entirely rule-based or, for every list and narrative
//! field, entirely gateway-derived. Gateway errors never reach the caller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::curation::reasoning::{business_insights, next_steps, rule_based_reasoning};
use crate::curation::reranker::{
    CompactCandidate, RerankError, RerankOutput, RerankRequest, Reranker,
};
use crate::curation::scoring::{ScoredProduct, ScoringEngine};
use crate::curation::selector::select_candidates;
use crate::models::curation::{CurationResult, CurationSource};
use crate::models::product::SupplierTier;
use crate::models::profile::Profile;

/// Confidence reported for rule-based results.
pub const RULE_BASED_CONFIDENCE: f64 = 0.8;
/// Cap on each rule-based highlight subset.
pub const HIGHLIGHT_LIMIT: usize = 10;

#[derive(Debug, Error)]
pub enum CurationError {
    #[error("Products not loaded")]
    CatalogUnavailable,

    #[error("Curation failed: {0}")]
    Internal(String),
}

pub struct CurationOrchestrator {
    catalog: Arc<Catalog>,
    engine: ScoringEngine,
    preselect_width: usize,
    reranker: Option<Arc<dyn Reranker>>,
    rerank_timeout: Duration,
}

impl CurationOrchestrator {
    pub fn new(catalog: Arc<Catalog>, engine: ScoringEngine, preselect_width: usize) -> Self {
        Self {
            catalog,
            engine,
            preselect_width,
            reranker: None,
            rerank_timeout: Duration::from_secs(30),
        }
    }

    /// Enables the re-ranking pass, bounded by `timeout` per request.
    pub fn with_reranker(mut self, reranker: Arc<dyn Reranker>, timeout: Duration) -> Self {
        self.reranker = Some(reranker);
        self.rerank_timeout = timeout;
        self
    }

    pub fn reranking_enabled(&self) -> bool {
        self.reranker.is_some()
    }

    pub async fn curate(
        &self,
        profile: &Profile,
        max_products: usize,
    ) -> Result<CurationResult, CurationError> {
        if self.catalog.is_empty() {
            return Err(CurationError::CatalogUnavailable);
        }

        info!("Scoring products for profile: {}", profile.venue_type);
        let candidates = self.preselect(profile).await?;
        info!("Selected {} candidates", candidates.len());

        let base = build_rule_based_result(profile, &candidates, max_products);

        let Some(reranker) = &self.reranker else {
            return Ok(base);
        };

        info!("Applying LLM re-ranking via {}", reranker.name());
        match self
            .rerank(reranker.as_ref(), profile, &candidates, max_products)
            .await
        {
            Ok(output) => {
                let result = merge_reranked(output, &candidates, max_products, base.generated_at);
                info!(
                    "LLM re-ranking completed: {} curated products",
                    result.curated.len()
                );
                Ok(result)
            }
            Err(e) => {
                warn!("LLM re-ranking failed, using rule-based results: {e}");
                Ok(base)
            }
        }
    }

    /// Scores and preselects on the blocking pool; catalog records are shared read-only.
    async fn preselect(&self, profile: &Profile) -> Result<Vec<ScoredProduct>, CurationError> {
        let catalog = Arc::clone(&self.catalog);
        let engine = self.engine.clone();
        let profile = profile.clone();
        let width = self.preselect_width;

        tokio::task::spawn_blocking(move || {
            let ranked = engine.score(catalog.products(), &profile);
            select_candidates(ranked, width)
        })
        .await
        .map_err(|e| CurationError::Internal(format!("scoring task failed: {e}")))
    }

    async fn rerank(
        &self,
        reranker: &dyn Reranker,
        profile: &Profile,
        candidates: &[ScoredProduct],
        max_products: usize,
    ) -> Result<RerankOutput, RerankError> {
        let request = RerankRequest {
            profile,
            candidates: candidates.iter().map(CompactCandidate::from).collect(),
            max_products,
        };

        match tokio::time::timeout(self.rerank_timeout, reranker.rerank(request)).await {
            Ok(result) => result,
            Err(_) => Err(RerankError::Timeout(self.rerank_timeout)),
        }
    }
}

/// Deterministic result from the preselected candidates.
pub fn build_rule_based_result(
    profile: &Profile,
    candidates: &[ScoredProduct],
    max_products: usize,
) -> CurationResult {
    let curated: Vec<ScoredProduct> = candidates.iter().take(max_products).cloned().collect();

    let platinum = highlight(candidates, |c| c.product.tier() == SupplierTier::Platinum);
    let bundles = highlight(candidates, |c| c.product.is_bundle);
    let city = profile.resolved_location().city;
    let local_favorites = highlight(candidates, |c| c.product.available_in(city.as_deref()));

    CurationResult {
        reasoning: rule_based_reasoning(profile, &curated),
        curated,
        confidence: RULE_BASED_CONFIDENCE,
        platinum,
        bundles,
        local_favorites,
        business_insights: business_insights(candidates),
        next_steps: next_steps(profile),
        generated_at: Utc::now(),
        source: CurationSource::Rules,
    }
}

fn highlight(
    candidates: &[ScoredProduct],
    keep: impl Fn(&ScoredProduct) -> bool,
) -> Vec<ScoredProduct> {
    candidates
        .iter()
        .filter(|c| keep(c))
        .take(HIGHLIGHT_LIMIT)
        .cloned()
        .collect()
}

/// Builds a result wholly from the gateway's answer.
///
/// Identifiers are resolved against the candidate set only; unknown ones are
/// dropped so identifier and record lists stay aligned.
pub fn merge_reranked(
    output: RerankOutput,
    candidates: &[ScoredProduct],
    max_products: usize,
    generated_at: DateTime<Utc>,
) -> CurationResult {
    let index: HashMap<&str, &ScoredProduct> = candidates
        .iter()
        .map(|c| (c.product.catalog_key(), c))
        .collect();

    let mut curated = resolve(&output.curated_product_ids, &index);
    curated.truncate(max_products);

    CurationResult {
        curated,
        reasoning: output.reasoning,
        confidence: output.confidence.clamp(0.0, 1.0),
        platinum: resolve(&output.platinum_supplier_products, &index),
        bundles: resolve(&output.bundled_packs, &index),
        local_favorites: resolve(&output.local_favorites, &index),
        business_insights: output.business_insights,
        next_steps: output.next_steps,
        generated_at,
        source: CurationSource::Reranked,
    }
}

fn resolve(ids: &[String], index: &HashMap<&str, &ScoredProduct>) -> Vec<ScoredProduct> {
    let resolved: Vec<ScoredProduct> = ids
        .iter()
        .filter_map(|id| index.get(id.as_str()).map(|c| (*c).clone()))
        .collect();
    if resolved.len() < ids.len() {
        debug!(
            "Dropped {} identifiers not present in the candidate set",
            ids.len() - resolved.len()
        );
    }
    resolved
}
