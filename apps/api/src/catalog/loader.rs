//! Catalog loading: reads a product export and turns it into `Product` records.
//!
//! Two top-level shapes are accepted: a bare array, or an object with a
//! `products` array. Individual malformed records are skipped, never fatal.

use std::path::Path;

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::catalog::{Catalog, CatalogError};
use crate::models::product::Product;

/// Case-insensitive substrings that mark a product as a multi-item pack.
const BUNDLE_KEYWORDS: [&str; 9] = [
    "pack",
    "bundle",
    "combo",
    "set",
    "collection",
    "starter",
    "sampler",
    "mixed",
    "variety",
];

/// Reads and parses the catalog file at `path`.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<Catalog, CatalogError> {
    let path = path.as_ref();
    info!("Loading products from {}", path.display());

    if !path.exists() {
        return Err(CatalogError::NotFound {
            path: path.display().to_string(),
        });
    }

    let text = std::fs::read_to_string(path)?;
    let products = parse_products(&text)?;
    Ok(Catalog::new(products))
}

/// Parses catalog JSON text into products, skipping records that fail to decode.
pub fn parse_products(text: &str) -> Result<Vec<Product>, CatalogError> {
    let data: Value = serde_json::from_str(text)?;

    let records = match data {
        Value::Array(items) => items,
        Value::Object(mut obj) => match obj.remove("products") {
            Some(Value::Array(items)) => items,
            Some(_) => {
                return Err(CatalogError::InvalidShape(
                    "'products' must be an array".to_string(),
                ))
            }
            None => {
                return Err(CatalogError::InvalidShape(
                    "expected an array of products or an object with a 'products' key"
                        .to_string(),
                ))
            }
        },
        _ => {
            return Err(CatalogError::InvalidShape(
                "expected an array of products or an object with a 'products' key".to_string(),
            ))
        }
    };

    let mut products = Vec::with_capacity(records.len());
    for (index, record) in records.into_iter().enumerate() {
        match decode_record(index, record) {
            Ok(product) => products.push(product),
            Err(reason) => warn!("Skipping invalid product at index {index}: {reason}"),
        }
    }

    Ok(products)
}

fn decode_record(index: usize, record: Value) -> Result<Product, String> {
    let mut fields: Map<String, Value> = match record {
        Value::Object(fields) => fields,
        other => return Err(format!("expected an object, got {other}")),
    };

    fields
        .entry("id")
        .or_insert_with(|| Value::String(index.to_string()));
    fields
        .entry("name")
        .or_insert_with(|| Value::String(format!("Product {index}")));

    let is_bundle = detect_bundle(&fields);
    fields.insert("is_bundle".to_string(), Value::Bool(is_bundle));

    serde_json::from_value(Value::Object(fields)).map_err(|e| e.to_string())
}

/// Keyword heuristic over the product name and web description.
fn detect_bundle(fields: &Map<String, Value>) -> bool {
    ["name", "product_web_description"].iter().any(|key| {
        fields
            .get(*key)
            .and_then(Value::as_str)
            .map(|text| {
                let text = text.to_lowercase();
                BUNDLE_KEYWORDS.iter().any(|kw| text.contains(kw))
            })
            .unwrap_or(false)
    })
}
