use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{ensure, Context, Result};

use crate::llm_client::LlmSettings;
use crate::models::curation::{MAX_MAX_PRODUCTS, MIN_MAX_PRODUCTS};

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed values abort startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub products_json: PathBuf,
    pub default_max_products: u32,
    pub top_k_preselect: usize,
    pub use_llm: bool,
    pub llm_base_url: String,
    pub llm_api_key: String,
    pub llm_model: String,
    pub llm_temperature: f32,
    pub llm_max_tokens: u32,
    pub llm_timeout: Duration,
    pub corrected_bundle_weight: bool,
    pub port: u16,
    pub rust_log: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            products_json: PathBuf::from("/app/data/products.json"),
            default_max_products: 100,
            top_k_preselect: 250,
            use_llm: false,
            llm_base_url: "http://ollama:11434/v1".to_string(),
            llm_api_key: "ollama".to_string(),
            llm_model: "llama3.1".to_string(),
            llm_temperature: 0.3,
            llm_max_tokens: 1800,
            llm_timeout: Duration::from_secs(30),
            corrected_bundle_weight: false,
            port: 8000,
            rust_log: "info".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from any key lookup, falling back to defaults for absent keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Config::default();

        let config = Config {
            products_json: lookup("PRODUCTS_JSON")
                .map(PathBuf::from)
                .unwrap_or(defaults.products_json),
            default_max_products: parse_or(
                &lookup,
                "DEFAULT_MAX_PRODUCTS",
                defaults.default_max_products,
            )?,
            top_k_preselect: parse_or(&lookup, "TOP_K_PRESELECT", defaults.top_k_preselect)?,
            use_llm: flag_or(&lookup, "USE_LLM", defaults.use_llm),
            llm_base_url: lookup("LLM_BASE_URL").unwrap_or(defaults.llm_base_url),
            llm_api_key: lookup("LLM_API_KEY").unwrap_or(defaults.llm_api_key),
            llm_model: lookup("LLM_MODEL").unwrap_or(defaults.llm_model),
            llm_temperature: parse_or(&lookup, "LLM_TEMPERATURE", defaults.llm_temperature)?,
            llm_max_tokens: parse_or(&lookup, "LLM_MAX_TOKENS", defaults.llm_max_tokens)?,
            llm_timeout: Duration::from_secs(parse_or(
                &lookup,
                "LLM_TIMEOUT_SECS",
                defaults.llm_timeout.as_secs(),
            )?),
            corrected_bundle_weight: flag_or(
                &lookup,
                "CORRECTED_BUNDLE_WEIGHT",
                defaults.corrected_bundle_weight,
            ),
            port: parse_or(&lookup, "PORT", defaults.port)?,
            rust_log: lookup("RUST_LOG").unwrap_or(defaults.rust_log),
        };

        ensure!(
            (MIN_MAX_PRODUCTS..=MAX_MAX_PRODUCTS).contains(&config.default_max_products),
            "DEFAULT_MAX_PRODUCTS must be between {MIN_MAX_PRODUCTS} and {MAX_MAX_PRODUCTS}"
        );

        Ok(config)
    }

    pub fn llm_settings(&self) -> LlmSettings {
        LlmSettings {
            base_url: self.llm_base_url.clone(),
            api_key: self.llm_api_key.clone(),
            model: self.llm_model.clone(),
            temperature: self.llm_temperature,
            max_tokens: self.llm_max_tokens,
            timeout: self.llm_timeout,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value: '{raw}'")),
        None => Ok(default),
    }
}

fn flag_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> bool {
    lookup(key)
        .map(|raw| raw.trim().eq_ignore_ascii_case("true"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.products_json, PathBuf::from("/app/data/products.json"));
        assert_eq!(config.default_max_products, 100);
        assert_eq!(config.top_k_preselect, 250);
        assert!(!config.use_llm);
        assert_eq!(config.llm_model, "llama3.1");
        assert_eq!(config.llm_timeout, Duration::from_secs(30));
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_overrides_and_flags() {
        let config = config_from(&[
            ("USE_LLM", "TRUE"),
            ("CORRECTED_BUNDLE_WEIGHT", "true"),
            ("TOP_K_PRESELECT", "40"),
            ("LLM_TIMEOUT_SECS", "5"),
            ("LLM_TEMPERATURE", "0.7"),
        ])
        .unwrap();
        assert!(config.use_llm);
        assert!(config.corrected_bundle_weight);
        assert_eq!(config.top_k_preselect, 40);

        let settings = config.llm_settings();
        assert_eq!(settings.timeout, Duration::from_secs(5));
        assert_eq!(settings.temperature, 0.7);
        assert_eq!(settings.base_url, "http://ollama:11434/v1");
    }

    #[test]
    fn test_non_true_flag_is_false() {
        let config = config_from(&[("USE_LLM", "yes")]).unwrap();
        assert!(!config.use_llm);
    }

    #[test]
    fn test_malformed_numbers_are_errors() {
        assert!(config_from(&[("PORT", "eighty")]).is_err());
        assert!(config_from(&[("TOP_K_PRESELECT", "-1")]).is_err());
        assert!(config_from(&[("LLM_TEMPERATURE", "warm")]).is_err());
    }

    #[test]
    fn test_default_max_products_bounds() {
        assert!(config_from(&[("DEFAULT_MAX_PRODUCTS", "0")]).is_err());
        assert!(config_from(&[("DEFAULT_MAX_PRODUCTS", "501")]).is_err());
        assert_eq!(
            config_from(&[("DEFAULT_MAX_PRODUCTS", "500")])
                .unwrap()
                .default_max_products,
            500
        );
    }
}
