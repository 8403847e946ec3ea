//! Re-ranking Gateway: optional LLM pass that may replace the rule-based curation.
//!
//! `Reranker` is the seam: the orchestrator holds an `Arc<dyn Reranker>` and
//! treats every error from it as "no answer". `LlmReranker` is the production
//! backend; tests plug in stubs.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::curation::prompts::{RERANK_PROMPT_TEMPLATE, RERANK_SYSTEM};
use crate::curation::scoring::ScoredProduct;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::profile::Profile;

/// Candidates rendered into the prompt, independent of the preselection width.
pub const MAX_PROMPT_CANDIDATES: usize = 50;

#[derive(Debug, Error)]
pub enum RerankError {
    #[error("gateway transport failed: {0}")]
    Transport(#[from] LlmError),

    #[error("gateway returned invalid content: {0}")]
    Content(String),

    #[error("gateway timed out after {0:?}")]
    Timeout(Duration),
}

/// Payload-bounded view of a candidate: no descriptions or raw text fields.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompactCandidate {
    pub id: String,
    pub sku: String,
    pub name: String,
    pub category_level_1: Option<String>,
    pub category_level_2: Option<String>,
    pub category_level_3: Option<String>,
    pub category_level_4: Option<String>,
    pub brand: Option<String>,
    pub supplier: Option<String>,
    pub supplier_tier: Option<String>,
    pub origin: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub tags: Vec<String>,
    pub is_bundle: bool,
    pub composite_score: f64,
    pub locality_score: f64,
    pub category_fitness: f64,
    pub supplier_boost: f64,
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

impl From<&ScoredProduct> for CompactCandidate {
    fn from(scored: &ScoredProduct) -> Self {
        let p = &scored.product;
        CompactCandidate {
            id: p.id.clone(),
            sku: p.catalog_key().to_string(),
            name: p.name.clone(),
            category_level_1: p.category_level_1.clone(),
            category_level_2: p.category_level_2.clone(),
            category_level_3: p.category_level_3.clone(),
            category_level_4: p.category_level_4.clone(),
            brand: p.brand.clone(),
            supplier: p.supplier.clone(),
            supplier_tier: p.supplier_tier.clone(),
            origin: p.origin.clone(),
            region: p.region.clone(),
            country: p.country.clone(),
            tags: p.tags.clone().unwrap_or_default(),
            is_bundle: p.is_bundle,
            composite_score: round3(scored.composite_score),
            locality_score: round3(scored.locality_score),
            category_fitness: round3(scored.category_fitness),
            supplier_boost: round3(scored.supplier_boost),
        }
    }
}

pub struct RerankRequest<'a> {
    pub profile: &'a Profile,
    pub candidates: Vec<CompactCandidate>,
    pub max_products: usize,
}

/// Validated gateway answer. Identifiers are unchecked against the candidate set;
/// the orchestrator resolves them.
#[derive(Debug, Clone, PartialEq)]
pub struct RerankOutput {
    pub curated_product_ids: Vec<String>,
    pub reasoning: Vec<String>,
    pub confidence: f64,
    pub platinum_supplier_products: Vec<String>,
    pub bundled_packs: Vec<String>,
    pub local_favorites: Vec<String>,
    pub business_insights: Vec<String>,
    pub next_steps: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawRerankOutput {
    curated_product_ids: Vec<String>,
    reasoning: Vec<String>,
    confidence: f64,
    #[serde(default)]
    platinum_supplier_products: Vec<String>,
    #[serde(default)]
    bundled_packs: Vec<String>,
    #[serde(default)]
    local_favorites: Vec<String>,
    #[serde(default)]
    business_insights: Vec<String>,
    #[serde(default)]
    next_steps: Vec<String>,
}

impl RerankOutput {
    /// Validates a gateway reply. Out-of-range confidence is clamped;
    /// `curatedProductIds` is truncated to `max_products`.
    pub fn parse(text: &str, max_products: usize) -> Result<Self, RerankError> {
        let raw: RawRerankOutput =
            serde_json::from_str(text).map_err(|e| RerankError::Content(e.to_string()))?;

        let mut curated_product_ids = raw.curated_product_ids;
        curated_product_ids.truncate(max_products);

        Ok(RerankOutput {
            curated_product_ids,
            reasoning: raw.reasoning,
            confidence: raw.confidence.clamp(0.0, 1.0),
            platinum_supplier_products: raw.platinum_supplier_products,
            bundled_packs: raw.bundled_packs,
            local_favorites: raw.local_favorites,
            business_insights: raw.business_insights,
            next_steps: raw.next_steps,
        })
    }
}

#[async_trait]
pub trait Reranker: Send + Sync {
    fn name(&self) -> &str;

    async fn rerank(&self, request: RerankRequest<'_>) -> Result<RerankOutput, RerankError>;
}

/// Production gateway backed by the chat-completion client.
pub struct LlmReranker {
    llm: LlmClient,
}

impl LlmReranker {
    pub fn new(llm: LlmClient) -> Self {
        Self { llm }
    }
}

#[async_trait]
impl Reranker for LlmReranker {
    fn name(&self) -> &str {
        self.llm.model()
    }

    async fn rerank(&self, request: RerankRequest<'_>) -> Result<RerankOutput, RerankError> {
        let prompt = build_rerank_prompt(&request);
        let text = self.llm.complete(&prompt, RERANK_SYSTEM).await?;
        let output = RerankOutput::parse(&text, request.max_products)?;
        info!(
            "LLM re-ranking successful: {} products selected",
            output.curated_product_ids.len()
        );
        Ok(output)
    }
}

fn or_unspecified(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("Not specified")
}

fn or_unknown(value: Option<&str>) -> &str {
    value.filter(|v| !v.is_empty()).unwrap_or("Unknown")
}

pub fn build_rerank_prompt(request: &RerankRequest<'_>) -> String {
    let profile = request.profile;
    let location = profile.resolved_location();

    let profile_text = format!(
        "Business Profile:\n\
         - Venue Type: {}\n\
         - Cuisine Style: {}\n\
         - Tier: {}\n\
         - Location: {}, {}, {}\n\
         - Budget Band: {}",
        profile.venue_type,
        or_unspecified(profile.cuisine_style.as_deref()),
        or_unspecified(profile.tier.as_deref()),
        or_unspecified(location.city.as_deref()),
        or_unspecified(location.state.as_deref()),
        or_unspecified(location.country.as_deref()),
        or_unspecified(profile.budget_band.map(|b| b.as_str())),
    );

    let mut candidates_text = String::from("Product Candidates:\n");
    for (i, c) in request
        .candidates
        .iter()
        .take(MAX_PROMPT_CANDIDATES)
        .enumerate()
    {
        candidates_text.push_str(&format!(
            "\n{}. {} (SKU: {})\n   \
             - Category: {} / {}\n   \
             - Brand: {}\n   \
             - Supplier: {} (Tier: {})\n   \
             - Origin: {}\n   \
             - Bundle: {}\n   \
             - Score: {}\n",
            i + 1,
            c.name,
            c.sku,
            or_unknown(c.category_level_1.as_deref()),
            or_unknown(c.category_level_2.as_deref()),
            or_unknown(c.brand.as_deref()),
            or_unknown(c.supplier.as_deref()),
            or_unknown(c.supplier_tier.as_deref()),
            or_unknown(c.origin.as_deref()),
            if c.is_bundle { "Yes" } else { "No" },
            c.composite_score,
        ));
    }

    RERANK_PROMPT_TEMPLATE
        .replace("{profile_text}", &profile_text)
        .replace("{candidates_text}", &candidates_text)
        .replace("{max_products}", &request.max_products.to_string())
}
