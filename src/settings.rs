// =============================================================================
// Settings — engine configuration with JSON file + environment overrides
// =============================================================================
//
// Every field carries `#[serde(default)]` so that a partial (or absent)
// settings file never breaks loading. After the file layer, environment
// variables are applied on top — that is where the FRED API key normally
// comes from (`.env` is loaded in main before this runs).

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::providers::{fred, market};

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_market_base_url() -> String {
    market::DEFAULT_BASE_URL.to_string()
}

fn default_fred_base_url() -> String {
    fred::DEFAULT_BASE_URL.to_string()
}

fn default_benchmark_symbol() -> String {
    "^GSPC".to_string()
}

fn default_macro_series() -> Vec<String> {
    vec![
        "GDP".to_string(),
        "FEDFUNDS".to_string(),
        "CPIAUCNS".to_string(),
        "UNRATE".to_string(),
    ]
}

fn default_news_limit() -> usize {
    10
}

// =============================================================================
// Settings
// =============================================================================

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Market-data endpoint root. Overridable for tests and mirrors.
    #[serde(default = "default_market_base_url")]
    pub market_base_url: String,

    /// Macro-series endpoint root.
    #[serde(default = "default_fred_base_url")]
    pub fred_base_url: String,

    /// API key for the macro-series provider.
    #[serde(default)]
    pub fred_api_key: String,

    /// Index charted on the market-overview tab.
    #[serde(default = "default_benchmark_symbol")]
    pub benchmark_symbol: String,

    /// Macro series fetched for the economic-insights tab.
    #[serde(default = "default_macro_series")]
    pub macro_series: Vec<String>,

    /// Maximum headlines shown per symbol.
    #[serde(default = "default_news_limit")]
    pub news_limit: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            market_base_url: default_market_base_url(),
            fred_base_url: default_fred_base_url(),
            fred_api_key: String::new(),
            benchmark_symbol: default_benchmark_symbol(),
            macro_series: default_macro_series(),
            news_limit: default_news_limit(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file at `path`.
    ///
    /// If the file does not exist, returns an error so the caller can fall
    /// back to defaults with a warning.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;

        let settings: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse settings from {}", path.display()))?;

        info!(
            path = %path.display(),
            benchmark = %settings.benchmark_symbol,
            "settings loaded"
        );

        Ok(settings)
    }

    /// Apply environment-variable overrides on top of the loaded values.
    pub fn apply_env(&mut self) {
        self.override_from(|name| std::env::var(name).ok());
    }

    fn override_from<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(key) = lookup("FRED_API_KEY") {
            self.fred_api_key = key;
        }
        if let Some(url) = lookup("MARKETLENS_MARKET_URL") {
            self.market_base_url = url;
        }
        if let Some(url) = lookup("MARKETLENS_FRED_URL") {
            self.fred_base_url = url;
        }
        if let Some(symbol) = lookup("MARKETLENS_BENCHMARK") {
            self.benchmark_symbol = symbol.trim().to_uppercase();
        }
        if let Some(series) = lookup("MARKETLENS_MACRO_SERIES") {
            let parsed: Vec<String> = series
                .split(',')
                .map(|s| s.trim().to_uppercase())
                .filter(|s| !s.is_empty())
                .collect();
            if !parsed.is_empty() {
                self.macro_series = parsed;
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_have_expected_values() {
        let s = Settings::default();
        assert_eq!(s.benchmark_symbol, "^GSPC");
        assert_eq!(s.macro_series, vec!["GDP", "FEDFUNDS", "CPIAUCNS", "UNRATE"]);
        assert_eq!(s.news_limit, 10);
        assert!(s.fred_api_key.is_empty());
        assert!(s.market_base_url.starts_with("https://"));
    }

    #[test]
    fn deserialise_empty_json_uses_defaults() {
        let s: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(s.benchmark_symbol, "^GSPC");
        assert_eq!(s.news_limit, 10);
    }

    #[test]
    fn deserialise_partial_json_fills_defaults() {
        let json = r#"{ "benchmark_symbol": "^DJI", "news_limit": 5 }"#;
        let s: Settings = serde_json::from_str(json).unwrap();
        assert_eq!(s.benchmark_symbol, "^DJI");
        assert_eq!(s.news_limit, 5);
        assert_eq!(s.macro_series.len(), 4);
    }

    #[test]
    fn env_overrides_take_precedence() {
        let mut s = Settings::default();
        s.override_from(|name| match name {
            "FRED_API_KEY" => Some("abc123".to_string()),
            "MARKETLENS_MACRO_SERIES" => Some("gdp, unrate".to_string()),
            _ => None,
        });
        assert_eq!(s.fred_api_key, "abc123");
        assert_eq!(s.macro_series, vec!["GDP", "UNRATE"]);
        // Untouched fields keep their defaults.
        assert_eq!(s.benchmark_symbol, "^GSPC");
    }

    #[test]
    fn empty_macro_series_override_is_ignored() {
        let mut s = Settings::default();
        s.override_from(|name| {
            (name == "MARKETLENS_MACRO_SERIES").then(|| " , ,".to_string())
        });
        assert_eq!(s.macro_series.len(), 4);
    }

    #[test]
    fn roundtrip_serialisation() {
        let s = Settings::default();
        let json = serde_json::to_string(&s).unwrap();
        let s2: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(s.benchmark_symbol, s2.benchmark_symbol);
        assert_eq!(s.macro_series, s2.macro_series);
        assert_eq!(s.news_limit, s2.news_limit);
    }
}
