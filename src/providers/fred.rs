// =============================================================================
// Macro Series Client — FRED observations endpoint
// =============================================================================
//
// One operation: fetch a named economic series as ordered `(date, value)`
// points. No fallback policy — whatever the provider returns is surfaced
// as-is, and an empty observation list is reported as `NoData`. Missing
// observations are encoded by the provider as the literal string "." and
// are skipped at parse time.

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::providers::ProviderError;
use crate::types::MacroPoint;

/// Default endpoint root for macro-series requests.
pub const DEFAULT_BASE_URL: &str = "https://api.stlouisfed.org";

/// Async client for the macroeconomic series provider.
#[derive(Clone)]
pub struct MacroSeriesClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl MacroSeriesClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            client,
        }
    }

    /// Fetch the full observation history of `series_id` (e.g. "GDP",
    /// "UNRATE").
    #[instrument(skip(self), name = "fred::fetch_macro_series")]
    pub async fn fetch_macro_series(
        &self,
        series_id: &str,
    ) -> Result<Vec<MacroPoint>, ProviderError> {
        let url = format!(
            "{}/fred/series/observations?series_id={}&api_key={}&file_type=json",
            self.base_url, series_id, self.api_key
        );

        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }
        let body: Value = resp.json().await?;

        let points = parse_observations(&body)?;
        if points.is_empty() {
            return Err(ProviderError::NoData);
        }
        debug!(series_id, count = points.len(), "macro series fetched");
        Ok(points)
    }
}

impl std::fmt::Debug for MacroSeriesClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MacroSeriesClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

// =============================================================================
// Pure response parser
// =============================================================================

/// Parse an observations payload into ordered points, skipping the "."
/// placeholders the provider uses for missing values.
pub fn parse_observations(body: &Value) -> Result<Vec<MacroPoint>, ProviderError> {
    let observations = body
        .get("observations")
        .and_then(Value::as_array)
        .ok_or_else(|| {
            ProviderError::Malformed("response missing 'observations' array".into())
        })?;

    let points = observations
        .iter()
        .filter_map(|obs| {
            let date = obs
                .get("date")
                .and_then(Value::as_str)
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())?;
            let value: f64 = obs.get("value").and_then(Value::as_str)?.parse().ok()?;
            value.is_finite().then_some(MacroPoint { date, value })
        })
        .collect();

    Ok(points)
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn observations_parse_in_order() {
        let body = json!({
            "observations": [
                { "date": "2024-01-01", "value": "27000.5" },
                { "date": "2024-04-01", "value": "27350.0" }
            ]
        });
        let points = parse_observations(&body).unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!((points[0].value - 27000.5).abs() < 1e-9);
        assert!(points[0].date < points[1].date);
    }

    #[test]
    fn observations_skip_missing_placeholders() {
        let body = json!({
            "observations": [
                { "date": "2024-01-01", "value": "." },
                { "date": "2024-02-01", "value": "3.9" }
            ]
        });
        let points = parse_observations(&body).unwrap();
        assert_eq!(points.len(), 1);
        assert!((points[0].value - 3.9).abs() < 1e-12);
    }

    #[test]
    fn observations_missing_array_is_malformed() {
        let body = json!({ "error_message": "Bad Request" });
        assert!(matches!(
            parse_observations(&body),
            Err(ProviderError::Malformed(_))
        ));
    }

    #[test]
    fn observations_empty_array_is_empty_vec() {
        let body = json!({ "observations": [] });
        assert!(parse_observations(&body).unwrap().is_empty());
    }
}
