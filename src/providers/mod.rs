// =============================================================================
// Data Providers
// =============================================================================
//
// The two external collaborators of the engine: the market-data provider
// (price history, company profile, statements, news) and the macroeconomic
// series provider. Both are thin async HTTP clients over irregular JSON
// payloads; the parse functions are pure and tested without any network
// access.

pub mod fred;
pub mod market;

use thiserror::Error;

/// Unified error type for both provider clients.
///
/// The three variants map onto how the failure is surfaced to the user:
/// `NoData` becomes a warning, the others become an inline error scoped to
/// the section that triggered the fetch.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider answered correctly but has nothing for this query.
    #[error("no data available for the requested symbol and range")]
    NoData,

    /// The request itself failed (DNS, timeout, TLS, connection reset).
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success HTTP status.
    #[error("provider returned HTTP {0}")]
    Status(reqwest::StatusCode),

    /// The response body did not have the expected shape.
    #[error("malformed provider response: {0}")]
    Malformed(String),
}
