use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Visibility code marking a product as publicly curatable.
pub const CURATABLE_VISIBILITY: &str = "4";

/// A catalog entry. Immutable once loaded; per-request scores live in
/// `curation::scoring::ScoredProduct`, never on this struct.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub sku: Option<String>,
    pub name: String,
    #[serde(default)]
    pub product_web_description: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub visibility: Option<String>,
    #[serde(default)]
    pub category_level_1: Option<String>,
    #[serde(default)]
    pub category_level_2: Option<String>,
    #[serde(default)]
    pub category_level_3: Option<String>,
    #[serde(default)]
    pub category_level_4: Option<String>,
    #[serde(default, deserialize_with = "availability_flag")]
    pub sold_at_cairns: bool,
    #[serde(default, deserialize_with = "availability_flag")]
    pub sold_at_brisbane: bool,
    #[serde(default, deserialize_with = "availability_flag")]
    pub sold_at_adelaide: bool,
    #[serde(default, deserialize_with = "availability_flag")]
    pub sold_at_melbourne: bool,
    #[serde(default, deserialize_with = "availability_flag")]
    pub sold_at_sydney: bool,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub origin: Option<String>,
    #[serde(default)]
    pub supplier_tier: Option<String>,
    #[serde(default)]
    pub is_bundle: bool,
}

impl Product {
    /// Identifier exposed to callers and the re-ranking gateway: SKU when present, else id.
    pub fn catalog_key(&self) -> &str {
        self.sku.as_deref().unwrap_or(&self.id)
    }

    pub fn is_curatable(&self) -> bool {
        self.visibility.as_deref() == Some(CURATABLE_VISIBILITY)
    }

    pub fn tier(&self) -> SupplierTier {
        SupplierTier::parse(self.supplier_tier.as_deref())
    }

    pub fn sold_at(&self, city: City) -> bool {
        match city {
            City::Cairns => self.sold_at_cairns,
            City::Brisbane => self.sold_at_brisbane,
            City::Adelaide => self.sold_at_adelaide,
            City::Melbourne => self.sold_at_melbourne,
            City::Sydney => self.sold_at_sydney,
        }
    }

    /// True when the profile city is one of the tracked cities and the product ships there.
    pub fn available_in(&self, city: Option<&str>) -> bool {
        city.and_then(City::parse)
            .map(|c| self.sold_at(c))
            .unwrap_or(false)
    }
}

/// Supplier quality ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SupplierTier {
    Platinum,
    Gold,
    Silver,
    Bronze,
    Unknown,
}

impl SupplierTier {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("platinum") => SupplierTier::Platinum,
            Some("gold") => SupplierTier::Gold,
            Some("silver") => SupplierTier::Silver,
            Some("bronze") => SupplierTier::Bronze,
            _ => SupplierTier::Unknown,
        }
    }

    /// Supplier boost and secondary sort weight.
    pub fn weight(self) -> f64 {
        match self {
            SupplierTier::Platinum => 1.0,
            SupplierTier::Gold => 0.8,
            SupplierTier::Silver => 0.6,
            SupplierTier::Bronze => 0.4,
            SupplierTier::Unknown => 0.5,
        }
    }
}

/// Cities with per-product availability flags in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum City {
    Cairns,
    Brisbane,
    Adelaide,
    Melbourne,
    Sydney,
}

impl City {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_lowercase().as_str() {
            "cairns" => Some(City::Cairns),
            "brisbane" => Some(City::Brisbane),
            "adelaide" => Some(City::Adelaide),
            "melbourne" => Some(City::Melbourne),
            "sydney" => Some(City::Sydney),
            _ => None,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Lenient field decoders for catalog exports
// ────────────────────────────────────────────────────────────────────────────

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

pub(crate) fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// Availability flags arrive as `0/1` (numbers or strings), booleans, or null.
fn availability_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(b) => Ok(b),
        Value::Number(n) => Ok(n.as_f64() == Some(1.0)),
        Value::String(s) => match s.trim().to_lowercase().as_str() {
            "1" | "true" => Ok(true),
            "0" | "false" | "" => Ok(false),
            _ => Err(serde::de::Error::custom(format!(
                "expected availability flag, got \"{s}\""
            ))),
        },
        other => Err(serde::de::Error::custom(format!(
            "expected availability flag, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_catalog_key_prefers_sku() {
        let p: Product = serde_json::from_value(json!({"id": "7", "sku": "SKU-7", "name": "x"}))
            .unwrap();
        assert_eq!(p.catalog_key(), "SKU-7");

        let p: Product = serde_json::from_value(json!({"id": "7", "name": "x"})).unwrap();
        assert_eq!(p.catalog_key(), "7");
    }

    #[test]
    fn test_numeric_fields_accepted_as_strings() {
        let p: Product =
            serde_json::from_value(json!({"id": 12, "name": "x", "visibility": 4})).unwrap();
        assert_eq!(p.id, "12");
        assert!(p.is_curatable());
    }

    #[test]
    fn test_availability_flags_accept_ints_bools_and_null() {
        let p: Product = serde_json::from_value(json!({
            "id": "1",
            "name": "x",
            "sold_at_sydney": 1,
            "sold_at_melbourne": true,
            "sold_at_cairns": null,
            "sold_at_brisbane": 0
        }))
        .unwrap();
        assert!(p.sold_at(City::Sydney));
        assert!(p.sold_at(City::Melbourne));
        assert!(!p.sold_at(City::Cairns));
        assert!(!p.sold_at(City::Brisbane));
        assert!(p.available_in(Some("SYDNEY")));
        assert!(!p.available_in(Some("Perth")));
        assert!(!p.available_in(None));
    }

    #[test]
    fn test_availability_flags_accept_strings() {
        let p: Product = serde_json::from_value(json!({
            "id": "1",
            "name": "x",
            "sold_at_sydney": "1",
            "sold_at_melbourne": " true ",
            "sold_at_cairns": "0",
            "sold_at_brisbane": "false"
        }))
        .unwrap();
        assert!(p.sold_at(City::Sydney));
        assert!(p.sold_at(City::Melbourne));
        assert!(!p.sold_at(City::Cairns));
        assert!(!p.sold_at(City::Brisbane));

        let bad: Result<Product, _> =
            serde_json::from_value(json!({"id": "1", "name": "x", "sold_at_sydney": "maybe"}));
        assert!(bad.is_err());
    }

    #[test]
    fn test_supplier_tier_parse_is_case_insensitive() {
        assert_eq!(SupplierTier::parse(Some("Platinum")), SupplierTier::Platinum);
        assert_eq!(SupplierTier::parse(Some("GOLD")), SupplierTier::Gold);
        assert_eq!(SupplierTier::parse(Some("tin")), SupplierTier::Unknown);
        assert_eq!(SupplierTier::parse(None), SupplierTier::Unknown);
        assert_eq!(SupplierTier::Unknown.weight(), 0.5);
    }
}
