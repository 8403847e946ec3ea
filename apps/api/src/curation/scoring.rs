//! Scoring Engine: rule-based relevance of catalog products for a venue profile.
//!
//! Scores are written to request-local `ScoredProduct` wrappers; the shared
//! catalog records are only ever read.

use std::cmp::Ordering;
use std::sync::Arc;

use serde::Serialize;

use crate::models::product::{City, Product};
use crate::models::profile::{Location, Profile};

const CITY_BONUS: f64 = 0.3;
const STATE_BONUS: f64 = 0.2;
const COUNTRY_BONUS: f64 = 0.2;
const ORIGIN_BONUS: f64 = 0.1;
const FINE_DINING_SPARKLING_BONUS: f64 = 0.2;
const BUNDLE_FITNESS_BONUS: f64 = 0.1;
/// Value fed into the bundle term of the composite for bundle products.
const BUNDLE_SIGNAL: f64 = 0.1;

/// A product annotated with the scores of one curation pass.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredProduct {
    #[serde(flatten)]
    pub product: Arc<Product>,
    pub locality_score: f64,
    pub category_fitness: f64,
    pub supplier_boost: f64,
    pub composite_score: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductCategory {
    Wine,
    Champagne,
    Sparkling,
    Spirits,
    Beer,
    Unclassified,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VenueType {
    Restaurant,
    FineDining,
    Bistro,
    Bar,
    Cafe,
}

impl VenueType {
    /// Unrecognised venue types score like a restaurant.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "fine dining" => VenueType::FineDining,
            "bistro" => VenueType::Bistro,
            "bar" => VenueType::Bar,
            "cafe" => VenueType::Cafe,
            _ => VenueType::Restaurant,
        }
    }

    /// Base category fitness for this venue.
    pub fn category_weight(self, category: ProductCategory) -> f64 {
        use ProductCategory::*;
        match (self, category) {
            (VenueType::Restaurant, Wine) => 1.0,
            (VenueType::Restaurant, Champagne) => 0.8,
            (VenueType::Restaurant, Sparkling) => 0.8,
            (VenueType::Restaurant, Spirits) => 0.3,
            (VenueType::Restaurant, Beer) => 0.2,
            (VenueType::Restaurant, Unclassified) => 0.5,

            (VenueType::FineDining, Wine) => 1.0,
            (VenueType::FineDining, Champagne) => 1.0,
            (VenueType::FineDining, Sparkling) => 0.9,
            (VenueType::FineDining, Spirits) => 0.4,
            (VenueType::FineDining, Beer) => 0.1,
            (VenueType::FineDining, Unclassified) => 0.6,

            (VenueType::Bistro, Wine) => 0.9,
            (VenueType::Bistro, Champagne) => 0.6,
            (VenueType::Bistro, Sparkling) => 0.7,
            (VenueType::Bistro, Spirits) => 0.4,
            (VenueType::Bistro, Beer) => 0.3,
            (VenueType::Bistro, Unclassified) => 0.5,

            (VenueType::Bar, Wine) => 0.6,
            (VenueType::Bar, Champagne) => 0.4,
            (VenueType::Bar, Sparkling) => 0.5,
            (VenueType::Bar, Spirits) => 0.9,
            (VenueType::Bar, Beer) => 0.8,
            (VenueType::Bar, Unclassified) => 0.7,

            (VenueType::Cafe, Wine) => 0.3,
            (VenueType::Cafe, Champagne) => 0.2,
            (VenueType::Cafe, Sparkling) => 0.3,
            (VenueType::Cafe, Spirits) => 0.2,
            (VenueType::Cafe, Beer) => 0.4,
            (VenueType::Cafe, Unclassified) => 0.4,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CompositeWeights {
    pub locality: f64,
    pub category: f64,
    pub supplier: f64,
    pub bundle: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            locality: 0.3,
            category: 0.4,
            supplier: 0.2,
            bundle: 0.1,
        }
    }
}

/// Stateless scorer; one instance is shared by all requests.
#[derive(Debug, Clone, Default)]
pub struct ScoringEngine {
    weights: CompositeWeights,
    /// When set, bundles feed 1.0 into the bundle term instead of 0.1.
    corrected_bundle_weight: bool,
}

impl ScoringEngine {
    pub fn new(corrected_bundle_weight: bool) -> Self {
        Self {
            weights: CompositeWeights::default(),
            corrected_bundle_weight,
        }
    }

    /// Scores every curatable product and returns them best-first.
    ///
    /// Order: composite score desc, supplier tier weight desc, supplier name asc.
    pub fn score(&self, products: &[Arc<Product>], profile: &Profile) -> Vec<ScoredProduct> {
        let location = profile.resolved_location();

        let mut ranked: Vec<ScoredProduct> = products
            .iter()
            .filter(|p| p.is_curatable())
            .map(|p| self.score_product(p, profile, &location))
            .collect();

        ranked.sort_by(compare_ranked);
        ranked
    }

    pub fn score_product(
        &self,
        product: &Arc<Product>,
        profile: &Profile,
        location: &Location,
    ) -> ScoredProduct {
        let locality_score = locality_score(product, location);
        let category_fitness = category_fitness(product, profile);
        let supplier_boost = product.tier().weight();
        let composite_score =
            self.composite_score(locality_score, category_fitness, supplier_boost, product.is_bundle);

        ScoredProduct {
            product: Arc::clone(product),
            locality_score,
            category_fitness,
            supplier_boost,
            composite_score,
        }
    }

    pub fn composite_score(
        &self,
        locality: f64,
        category_fitness: f64,
        supplier_boost: f64,
        is_bundle: bool,
    ) -> f64 {
        let bundle_signal = match (is_bundle, self.corrected_bundle_weight) {
            (false, _) => 0.0,
            (true, false) => BUNDLE_SIGNAL,
            (true, true) => 1.0,
        };
        let w = &self.weights;
        (w.locality * locality
            + w.category * category_fitness
            + w.supplier * supplier_boost
            + w.bundle * bundle_signal)
            .min(1.0)
    }
}

fn compare_ranked(a: &ScoredProduct, b: &ScoredProduct) -> Ordering {
    b.composite_score
        .total_cmp(&a.composite_score)
        .then_with(|| {
            b.product
                .tier()
                .weight()
                .total_cmp(&a.product.tier().weight())
        })
        .then_with(|| {
            let sa = a.product.supplier.as_deref().unwrap_or("");
            let sb = b.product.supplier.as_deref().unwrap_or("");
            sa.cmp(sb)
        })
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|s| !s.is_empty())
        .map(str::to_lowercase)
}

fn field_contains(field: &Option<String>, needle: &Option<String>) -> bool {
    match (field.as_deref(), non_empty(needle)) {
        (Some(haystack), Some(needle)) => haystack.to_lowercase().contains(&needle),
        _ => false,
    }
}

/// Additive location bonuses, capped at 1.0.
pub fn locality_score(product: &Product, location: &Location) -> f64 {
    let mut score = 0.0;

    if let Some(city) = non_empty(&location.city).as_deref().and_then(City::parse) {
        if product.sold_at(city) {
            score += CITY_BONUS;
        }
    }
    if field_contains(&product.region, &location.state) {
        score += STATE_BONUS;
    }
    if field_contains(&product.country, &location.country) {
        score += COUNTRY_BONUS;
    }
    if field_contains(&product.origin, &location.country) {
        score += ORIGIN_BONUS;
    }

    f64::min(score, 1.0)
}

/// Classifies a product from the first category level naming a known stem.
pub fn primary_category(product: &Product) -> ProductCategory {
    let levels = [
        &product.category_level_1,
        &product.category_level_2,
        &product.category_level_3,
    ];
    for level in levels.into_iter().flatten() {
        let level = level.to_lowercase();
        if level.contains("wine") {
            return ProductCategory::Wine;
        } else if level.contains("champagne") {
            return ProductCategory::Champagne;
        } else if level.contains("sparkling") {
            return ProductCategory::Sparkling;
        } else if level.contains("spirit") {
            return ProductCategory::Spirits;
        } else if level.contains("beer") {
            return ProductCategory::Beer;
        } else if level.contains("liquor") {
            return ProductCategory::Spirits;
        }
    }
    ProductCategory::Unclassified
}

pub fn category_fitness(product: &Product, profile: &Profile) -> f64 {
    let venue = VenueType::parse(&profile.venue_type);
    let category = primary_category(product);
    let mut fitness = venue.category_weight(category);

    let fine_dining_cuisine = profile
        .cuisine_style
        .as_deref()
        .map(|c| c.trim().eq_ignore_ascii_case("fine dining"))
        .unwrap_or(false);
    if venue == VenueType::FineDining
        && fine_dining_cuisine
        && matches!(category, ProductCategory::Champagne | ProductCategory::Sparkling)
    {
        fitness += FINE_DINING_SPARKLING_BONUS;
    }

    if product.is_bundle {
        fitness += BUNDLE_FITNESS_BONUS;
    }

    f64::min(fitness, 1.0)
}
