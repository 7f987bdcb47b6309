// =============================================================================
// Shared types used across the MarketLens engine
// =============================================================================

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A single daily OHLCV bar for an equity or index.
///
/// Bars are always handled as ascending-by-date sequences with one bar per
/// trading day. Calendar gaps (weekends, holidays) are expected and never
/// filled. `adjusted_close` is the canonical price for all derived series;
/// `close` is kept for the latest-price display only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adjusted_close: f64,
    pub volume: u64,
}

/// One observation of a named macroeconomic series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MacroPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Company metadata from the quote-summary endpoint.
///
/// Every field except `name` is optional; the provider frequently omits them
/// (ETFs have no sector, small caps no summary). Missing fields are rendered
/// as "not available" downstream, never treated as an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyProfile {
    /// Long display name; falls back to the query symbol when absent.
    pub name: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub website: Option<String>,
    pub market_cap: Option<f64>,
    /// Long business summary paragraph.
    pub summary: Option<String>,
}

impl CompanyProfile {
    /// Placeholder shown for absent optional metadata.
    pub const NOT_AVAILABLE: &'static str = "not available";
}

/// A single news headline for a symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub title: String,
    pub link: String,
    pub publisher: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

/// One reporting period of a financial statement, line items in provider
/// order. Absent values stay `None` rather than being dropped so that the
/// row structure is stable across periods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementPeriod {
    pub end_date: NaiveDate,
    pub items: Vec<(String, Option<f64>)>,
}

/// The three statements shown on the company-data tab.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FinancialStatements {
    pub income_statement: Vec<StatementPeriod>,
    pub balance_sheet: Vec<StatementPeriod>,
    pub cashflow: Vec<StatementPeriod>,
}
