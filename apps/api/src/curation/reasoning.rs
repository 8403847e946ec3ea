//! Templated narrative for rule-based results. Pure string formatting.

use std::collections::{HashMap, HashSet};

use crate::curation::scoring::ScoredProduct;
use crate::models::product::SupplierTier;
use crate::models::profile::Profile;

const HIGH_BUNDLE_RATIO: f64 = 0.1;

/// Explains the curated selection.
pub fn rule_based_reasoning(profile: &Profile, curated: &[ScoredProduct]) -> Vec<String> {
    let mut reasoning = vec![format!("Curated for {} venue type", profile.venue_type)];

    if let Some(city) = profile
        .resolved_location()
        .city
        .filter(|c| !c.is_empty())
    {
        reasoning.push(format!("Prioritized products available in {city}"));
    }

    match profile.venue_type.trim().to_lowercase().as_str() {
        "restaurant" | "fine dining" => reasoning
            .push("Emphasized wine and champagne selections for dining experience".to_string()),
        "bar" => reasoning.push("Focused on spirits and beer for bar service".to_string()),
        _ => {}
    }

    let bundle_count = curated.iter().filter(|p| p.product.is_bundle).count();
    if bundle_count > 0 {
        reasoning.push(format!("Included {bundle_count} curated bundles for variety"));
    }

    let platinum_count = curated
        .iter()
        .filter(|p| p.product.tier() == SupplierTier::Platinum)
        .count();
    if platinum_count > 0 {
        reasoning.push(format!("Featured {platinum_count} platinum supplier products"));
    }

    reasoning
}

/// Category, supplier, and bundle observations over the whole candidate set.
pub fn business_insights(candidates: &[ScoredProduct]) -> Vec<String> {
    let mut insights = Vec::new();

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut first_seen: Vec<&str> = Vec::new();
    for c in candidates {
        let category = c.product.category_level_1.as_deref().unwrap_or("Unknown");
        let count = counts.entry(category).or_insert(0);
        if *count == 0 {
            first_seen.push(category);
        }
        *count += 1;
    }
    // First category reaching the highest count wins ties
    let (top_name, top_count) = first_seen
        .iter()
        .fold(("Unknown", 0usize), |best, name| {
            let count = counts[name];
            if count > best.1 {
                (*name, count)
            } else {
                best
            }
        });
    insights.push(format!("Top category: {top_name} ({top_count} products)"));

    let suppliers: HashSet<&str> = candidates
        .iter()
        .filter_map(|c| c.product.supplier.as_deref())
        .filter(|s| !s.is_empty())
        .collect();
    insights.push(format!("Products from {} different suppliers", suppliers.len()));

    if !candidates.is_empty() {
        let bundles = candidates.iter().filter(|c| c.product.is_bundle).count();
        let ratio = bundles as f64 / candidates.len() as f64;
        if ratio > HIGH_BUNDLE_RATIO {
            insights.push(format!(
                "High bundle ratio ({:.1}%) - good for variety",
                ratio * 100.0
            ));
        }
    }

    insights
}

/// Onboarding checklist for the venue.
pub fn next_steps(profile: &Profile) -> Vec<String> {
    let mut steps = vec![
        "Review curated product list and select initial order".to_string(),
        "Contact suppliers for pricing and availability".to_string(),
    ];

    if matches!(
        profile.venue_type.trim().to_lowercase().as_str(),
        "restaurant" | "fine dining"
    ) {
        steps.push("Consider wine pairing recommendations for your menu".to_string());
        steps.push("Plan staff training on product knowledge".to_string());
    }

    if profile
        .tier
        .as_deref()
        .map(|t| t.eq_ignore_ascii_case("bronze"))
        .unwrap_or(false)
    {
        steps.push("Explore upgrade opportunities to access premium products".to_string());
    }

    steps.push("Set up regular reordering schedule".to_string());
    steps.push("Monitor customer preferences and adjust selections".to_string());
    steps
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::json;

    use crate::models::product::Product;

    fn scored(value: serde_json::Value) -> ScoredProduct {
        let product: Product = serde_json::from_value(value).unwrap();
        ScoredProduct {
            product: Arc::new(product),
            locality_score: 0.0,
            category_fitness: 0.0,
            supplier_boost: 0.0,
            composite_score: 0.0,
        }
    }

    #[test]
    fn test_reasoning_for_restaurant_in_city() {
        let profile: Profile = serde_json::from_value(json!({
            "venueType": "restaurant",
            "location": {"city": "Melbourne"}
        }))
        .unwrap();
        let curated = vec![
            scored(json!({"id": "1", "name": "a", "is_bundle": true, "supplier_tier": "Platinum"})),
            scored(json!({"id": "2", "name": "b", "supplier_tier": "platinum"})),
        ];
        assert_eq!(
            rule_based_reasoning(&profile, &curated),
            vec![
                "Curated for restaurant venue type",
                "Prioritized products available in Melbourne",
                "Emphasized wine and champagne selections for dining experience",
                "Included 1 curated bundles for variety",
                "Featured 2 platinum supplier products",
            ]
        );
    }

    #[test]
    fn test_reasoning_for_bar_without_location() {
        let reasoning = rule_based_reasoning(&Profile::new("bar"), &[]);
        assert_eq!(
            reasoning,
            vec![
                "Curated for bar venue type",
                "Focused on spirits and beer for bar service",
            ]
        );
    }

    #[test]
    fn test_insights_top_category_and_bundle_ratio() {
        let candidates = vec![
            scored(json!({"id": "1", "name": "a", "category_level_1": "Beer", "supplier": "S1", "is_bundle": true})),
            scored(json!({"id": "2", "name": "b", "category_level_1": "Wine", "supplier": "S2"})),
            scored(json!({"id": "3", "name": "c", "category_level_1": "Wine", "supplier": "S2"})),
            scored(json!({"id": "4", "name": "d", "category_level_1": "Beer"})),
        ];
        assert_eq!(
            business_insights(&candidates),
            vec![
                "Top category: Beer (2 products)",
                "Products from 2 different suppliers",
                "High bundle ratio (25.0%) - good for variety",
            ]
        );
    }

    #[test]
    fn test_insights_for_empty_candidates() {
        assert_eq!(
            business_insights(&[]),
            vec!["Top category: Unknown (0 products)", "Products from 0 different suppliers"]
        );
    }

    #[test]
    fn test_next_steps_for_bronze_fine_dining() {
        let mut profile = Profile::new("Fine Dining");
        profile.tier = Some("bronze".into());
        let steps = next_steps(&profile);
        assert_eq!(steps.len(), 7);
        assert!(steps.contains(&"Consider wine pairing recommendations for your menu".to_string()));
        assert!(steps.contains(&"Explore upgrade opportunities to access premium products".to_string()));
        assert_eq!(steps.last().unwrap(), "Monitor customer preferences and adjust selections");
    }

    #[test]
    fn test_next_steps_for_cafe() {
        assert_eq!(next_steps(&Profile::new("cafe")).len(), 4);
    }
}
