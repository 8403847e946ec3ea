use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::product::opt_string_or_number;

/// Venue address. Numeric values (e.g. a postcode sent as `2000`) are kept as strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Location {
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub state: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub postcode: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetBand {
    Low,
    Mid,
    Premium,
}

impl BudgetBand {
    pub fn as_str(self) -> &'static str {
        match self {
            BudgetBand::Low => "low",
            BudgetBand::Mid => "mid",
            BudgetBand::Premium => "premium",
        }
    }
}

/// Venue descriptor submitted with a curation request.
///
/// Questionnaire front-ends attach arbitrary extra answers; those are kept in
/// `extra` and only consulted for flat `city`/`state`/`country` fallbacks.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
    pub venue_type: String,
    #[serde(default)]
    pub cuisine_style: Option<String>,
    #[serde(default)]
    pub budget_band: Option<BudgetBand>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Profile {
    pub fn new(venue_type: impl Into<String>) -> Self {
        Self {
            tier: None,
            location: None,
            venue_type: venue_type.into(),
            cuisine_style: None,
            budget_band: None,
            extra: Map::new(),
        }
    }

    /// Single place where the nested and flat location shapes are reconciled.
    /// Each field prefers the nested `location` object and falls back to the
    /// flat key of the same name.
    pub fn resolved_location(&self) -> Location {
        let nested = self.location.clone().unwrap_or_default();
        Location {
            city: nested.city.or_else(|| self.flat_field("city")),
            state: nested.state.or_else(|| self.flat_field("state")),
            address: nested.address.or_else(|| self.flat_field("address")),
            country: nested.country.or_else(|| self.flat_field("country")),
            postcode: nested.postcode.or_else(|| self.flat_field("postcode")),
        }
    }

    fn flat_field(&self, key: &str) -> Option<String> {
        match self.extra.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_fields_are_kept() {
        let profile: Profile = serde_json::from_value(json!({
            "venueType": "bar",
            "seatingCapacity": 80,
            "happyHour": true
        }))
        .unwrap();
        assert_eq!(profile.venue_type, "bar");
        assert_eq!(profile.extra.get("seatingCapacity"), Some(&json!(80)));
    }

    #[test]
    fn test_budget_band_rejects_unknown_values() {
        let result: Result<Profile, _> =
            serde_json::from_value(json!({"venueType": "bar", "budgetBand": "lavish"}));
        assert!(result.is_err());

        let profile: Profile =
            serde_json::from_value(json!({"venueType": "bar", "budgetBand": "mid"})).unwrap();
        assert_eq!(profile.budget_band, Some(BudgetBand::Mid));
    }

    #[test]
    fn test_nested_location_preferred() {
        let profile: Profile = serde_json::from_value(json!({
            "venueType": "cafe",
            "location": {"city": "Sydney"},
            "city": "Brisbane",
            "country": "Australia"
        }))
        .unwrap();
        let loc = profile.resolved_location();
        assert_eq!(loc.city.as_deref(), Some("Sydney"));
        assert_eq!(loc.country.as_deref(), Some("Australia"));
    }

    #[test]
    fn test_numeric_nested_postcode_matches_flat_form() {
        let nested: Profile = serde_json::from_value(json!({
            "venueType": "bar",
            "location": {"city": "Sydney", "postcode": 2000}
        }))
        .unwrap();
        let flat: Profile = serde_json::from_value(json!({
            "venueType": "bar",
            "city": "Sydney",
            "postcode": 2000
        }))
        .unwrap();
        assert_eq!(nested.resolved_location().postcode.as_deref(), Some("2000"));
        assert_eq!(nested.resolved_location(), flat.resolved_location());
    }

    #[test]
    fn test_flat_location_used_without_nested() {
        let profile: Profile = serde_json::from_value(json!({
            "venueType": "cafe",
            "city": "Adelaide",
            "state": "SA",
            "postcode": 5000
        }))
        .unwrap();
        let loc = profile.resolved_location();
        assert_eq!(loc.city.as_deref(), Some("Adelaide"));
        assert_eq!(loc.state.as_deref(), Some("SA"));
        assert_eq!(loc.postcode.as_deref(), Some("5000"));
        assert_eq!(loc.country, None);
    }
}
