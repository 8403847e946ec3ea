use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::curation::scoring::ScoredProduct;
use crate::models::profile::Profile;

/// Inclusive bounds on `maxProducts`.
pub const MIN_MAX_PRODUCTS: u32 = 1;
pub const MAX_MAX_PRODUCTS: u32 = 500;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurateRequest {
    pub profile: Profile,
    #[serde(default)]
    pub max_products: Option<u32>,
}

/// Which pipeline stage produced the list and narrative fields of a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CurationSource {
    Rules,
    Reranked,
}

/// Outcome of one curation request.
///
/// Only full records are stored; identifier lists are derived from them when
/// the response is built, so the two can never drift apart.
#[derive(Debug, Clone)]
pub struct CurationResult {
    pub curated: Vec<ScoredProduct>,
    pub reasoning: Vec<String>,
    pub confidence: f64,
    pub platinum: Vec<ScoredProduct>,
    pub bundles: Vec<ScoredProduct>,
    pub local_favorites: Vec<ScoredProduct>,
    pub business_insights: Vec<String>,
    pub next_steps: Vec<String>,
    pub generated_at: DateTime<Utc>,
    pub source: CurationSource,
}

/// Wire shape of `POST /curate`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurateResponse {
    pub curated_product_ids: Vec<String>,
    pub curated_products: Vec<ScoredProduct>,
    pub reasoning: Vec<String>,
    pub confidence: f64,
    pub platinum_supplier_products: Vec<String>,
    pub platinum_products: Vec<ScoredProduct>,
    pub bundled_packs: Vec<String>,
    pub bundled_products: Vec<ScoredProduct>,
    pub local_favorites: Vec<String>,
    pub local_favorite_products: Vec<ScoredProduct>,
    pub business_insights: Vec<String>,
    pub next_steps: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

fn keys(products: &[ScoredProduct]) -> Vec<String> {
    products
        .iter()
        .map(|p| p.product.catalog_key().to_string())
        .collect()
}

impl From<CurationResult> for CurateResponse {
    fn from(result: CurationResult) -> Self {
        CurateResponse {
            curated_product_ids: keys(&result.curated),
            curated_products: result.curated,
            reasoning: result.reasoning,
            confidence: result.confidence.clamp(0.0, 1.0),
            platinum_supplier_products: keys(&result.platinum),
            platinum_products: result.platinum,
            bundled_packs: keys(&result.bundles),
            bundled_products: result.bundles,
            local_favorites: keys(&result.local_favorites),
            local_favorite_products: result.local_favorites,
            business_insights: result.business_insights,
            next_steps: result.next_steps,
            generated_at: result.generated_at,
        }
    }
}
