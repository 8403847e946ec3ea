//! Candidate Selector: diversity-capped prefix of the ranked list.
//!
//! Walks the ranking in order and accepts a product only while fewer than
//! `MAX_PER_BRAND_CATEGORY` accepted candidates share its (brand, category) pair.
//! A product whose group is full is skipped for good, even if later slots remain.

use std::collections::HashMap;

use crate::curation::scoring::ScoredProduct;

pub const MAX_PER_BRAND_CATEGORY: usize = 3;

fn diversity_key(candidate: &ScoredProduct) -> (String, String) {
    let product = &candidate.product;
    let brand = product.brand.as_deref().unwrap_or("unknown").to_lowercase();
    let category = product
        .category_level_1
        .as_deref()
        .unwrap_or("unknown")
        .to_lowercase();
    (brand, category)
}

/// Returns at most `top_k` candidates, preserving rank order.
pub fn select_candidates(ranked: Vec<ScoredProduct>, top_k: usize) -> Vec<ScoredProduct> {
    let mut accepted_per_group: HashMap<(String, String), usize> = HashMap::new();
    let mut candidates = Vec::with_capacity(top_k.min(ranked.len()));

    for candidate in ranked {
        if candidates.len() >= top_k {
            break;
        }

        let count = accepted_per_group.entry(diversity_key(&candidate)).or_insert(0);
        if *count < MAX_PER_BRAND_CATEGORY {
            *count += 1;
            candidates.push(candidate);
        }
    }

    candidates
}
