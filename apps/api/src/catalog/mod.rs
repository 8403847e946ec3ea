//! Catalog Store: the immutable product list loaded once at startup.
//!
//! Records are held behind `Arc` so curation requests can wrap them in
//! request-local score annotations without cloning or mutating them.

pub mod loader;

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::models::product::Product;

pub use loader::load_catalog;

const SUMMARY_TOP_N: usize = 10;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Products file not found: {path}")]
    NotFound { path: String },

    #[error("Error reading products file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON in products file: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Invalid products file: {0}")]
    InvalidShape(String),
}

#[derive(Debug, Default)]
pub struct Catalog {
    products: Vec<Arc<Product>>,
}

/// A label with its number of occurrences.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NamedCount {
    pub name: String,
    pub count: usize,
}

/// Aggregate view of the loaded catalog for `/stats` and startup logging.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSummary {
    pub total: usize,
    pub visible: usize,
    pub bundles: usize,
    pub top_categories: Vec<NamedCount>,
    pub top_suppliers: Vec<NamedCount>,
}

impl Catalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn products(&self) -> &[Arc<Product>] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn summary(&self) -> CatalogSummary {
        CatalogSummary {
            total: self.len(),
            visible: self.products.iter().filter(|p| p.is_curatable()).count(),
            bundles: self.products.iter().filter(|p| p.is_bundle).count(),
            top_categories: top_counts(
                self.products.iter().filter_map(|p| p.category_level_1.as_deref()),
            ),
            top_suppliers: top_counts(self.products.iter().filter_map(|p| p.supplier.as_deref())),
        }
    }
}

/// Counts labels and returns the most frequent, ties broken by first appearance.
fn top_counts<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<NamedCount> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        let count = counts.entry(label).or_insert(0);
        if *count == 0 {
            order.push(label);
        }
        *count += 1;
    }

    let mut ranked: Vec<NamedCount> = order
        .into_iter()
        .map(|name| NamedCount {
            name: name.to_string(),
            count: counts[name],
        })
        .collect();
    // Stable sort keeps first-appearance order among equal counts
    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(SUMMARY_TOP_N);
    ranked
}
