// =============================================================================
// Market Data Client — chart, quote-summary, and search endpoints
// =============================================================================
//
// All heavy lifting lives in the pure `parse_*` functions; the async fetch
// methods only build URLs, check the HTTP status, and hand the body over.
// The provider's payloads are irregular (null holes in price arrays,
// wrapped `{raw, fmt}` numbers, absent modules), so parsing works off
// `serde_json::Value` and degrades field-by-field instead of failing the
// whole response.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::providers::ProviderError;
use crate::types::{
    CompanyProfile, FinancialStatements, NewsItem, PriceBar, StatementPeriod,
};

/// Default endpoint root for all market-data requests.
pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Statement-history modules requested from the quote-summary endpoint.
const STATEMENT_MODULES: &str =
    "incomeStatementHistory,balanceSheetHistory,cashflowStatementHistory";

/// Async client for the market-data provider.
#[derive(Debug, Clone)]
pub struct MarketDataClient {
    base_url: String,
    client: reqwest::Client,
}

impl MarketDataClient {
    /// Create a client against `base_url` (overridable so tests and mirrors
    /// can point elsewhere).
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("marketlens/1.0")
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .expect("failed to build reqwest client");

        Self {
            base_url: base_url.into(),
            client,
        }
    }

    // -------------------------------------------------------------------------
    // Price history
    // -------------------------------------------------------------------------

    /// Fetch daily bars for `symbol` over `[start, end]` (inclusive).
    ///
    /// Fallback contract: when the requested range comes back empty (future
    /// end date, market holiday) the request is retried once with the end
    /// date moved to today. If the series is still empty the result is
    /// [`ProviderError::NoData`] — a warning at the call site, never a crash.
    #[instrument(skip(self), name = "market::fetch_price_history")]
    pub async fn fetch_price_history(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, ProviderError> {
        let bars = self.fetch_chart(symbol, start, end).await?;
        if !bars.is_empty() {
            debug!(symbol, count = bars.len(), "price history fetched");
            return Ok(bars);
        }

        let today = Utc::now().date_naive();
        if end < today {
            warn!(symbol, %end, "empty range, retrying through today");
            let bars = self.fetch_chart(symbol, start, today).await?;
            if !bars.is_empty() {
                debug!(symbol, count = bars.len(), "price history fetched on retry");
                return Ok(bars);
            }
        }

        Err(ProviderError::NoData)
    }

    async fn fetch_chart(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceBar>, ProviderError> {
        // period2 is exclusive at the provider; push it one day out so the
        // requested end date is included.
        let period1 = day_start_epoch(start);
        let period2 = day_start_epoch(end) + 86_400;

        let url = format!(
            "{}/v8/finance/chart/{}?period1={}&period2={}&interval=1d&events=div%2Csplits",
            self.base_url, symbol, period1, period2
        );

        let body = self.get_json(&url).await?;
        parse_chart_bars(&body)
    }

    // -------------------------------------------------------------------------
    // Company metadata
    // -------------------------------------------------------------------------

    /// Fetch name, sector, industry, website, market cap, and the business
    /// summary. Absent fields stay `None`; only a structurally missing
    /// result object is an error.
    #[instrument(skip(self), name = "market::fetch_company_profile")]
    pub async fn fetch_company_profile(
        &self,
        symbol: &str,
    ) -> Result<CompanyProfile, ProviderError> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules=assetProfile%2Cprice",
            self.base_url, symbol
        );
        let body = self.get_json(&url).await?;
        let profile = parse_company_profile(symbol, &body)?;
        debug!(symbol, name = %profile.name, "company profile fetched");
        Ok(profile)
    }

    /// Fetch the three annual statement histories.
    #[instrument(skip(self), name = "market::fetch_financial_statements")]
    pub async fn fetch_financial_statements(
        &self,
        symbol: &str,
    ) -> Result<FinancialStatements, ProviderError> {
        let url = format!(
            "{}/v10/finance/quoteSummary/{}?modules={}",
            self.base_url, symbol, STATEMENT_MODULES
        );
        let body = self.get_json(&url).await?;
        let statements = parse_financial_statements(&body)?;
        debug!(
            symbol,
            income_periods = statements.income_statement.len(),
            balance_periods = statements.balance_sheet.len(),
            cashflow_periods = statements.cashflow.len(),
            "financial statements fetched"
        );
        Ok(statements)
    }

    /// Fetch recent news headlines for `symbol`. The caller truncates to
    /// its display limit.
    #[instrument(skip(self), name = "market::fetch_news")]
    pub async fn fetch_news(&self, symbol: &str) -> Result<Vec<NewsItem>, ProviderError> {
        let url = format!(
            "{}/v1/finance/search?q={}&newsCount=20&quotesCount=0",
            self.base_url, symbol
        );
        let body = self.get_json(&url).await?;
        let items = parse_news(&body)?;
        debug!(symbol, count = items.len(), "news fetched");
        Ok(items)
    }

    // -------------------------------------------------------------------------
    // Transport helper
    // -------------------------------------------------------------------------

    async fn get_json(&self, url: &str) -> Result<Value, ProviderError> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(ProviderError::Status(status));
        }
        let body: Value = resp.json().await?;
        Ok(body)
    }
}

/// Midnight UTC of `date` as a UNIX timestamp.
fn day_start_epoch(date: NaiveDate) -> i64 {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).expect("midnight is valid"))
        .timestamp()
}

// =============================================================================
// Pure response parsers
// =============================================================================

/// Parse a chart response into ordered bars.
///
/// Entries with a null close or adjusted close (holiday holes the provider
/// leaves in the arrays) are skipped. An absent result set parses as an
/// empty series; the caller decides whether that means "no data".
pub fn parse_chart_bars(body: &Value) -> Result<Vec<PriceBar>, ProviderError> {
    if let Some(err) = body.pointer("/chart/error").filter(|e| !e.is_null()) {
        // The provider reports unknown symbols here rather than via status.
        warn!(error = %err, "chart response carries an error object");
        return Ok(Vec::new());
    }

    let result = match body.pointer("/chart/result/0") {
        Some(r) if !r.is_null() => r,
        _ => return Ok(Vec::new()),
    };

    let timestamps = match result.get("timestamp").and_then(Value::as_array) {
        Some(t) => t,
        None => return Ok(Vec::new()),
    };

    let quote = result
        .pointer("/indicators/quote/0")
        .ok_or_else(|| ProviderError::Malformed("chart result missing quote block".into()))?;
    let adjclose = result.pointer("/indicators/adjclose/0/adjclose");

    let field = |name: &str, i: usize| -> Option<f64> {
        quote.get(name).and_then(|a| a.get(i)).and_then(Value::as_f64)
    };

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let Some(epoch) = ts.as_i64() else { continue };
        let Some(stamp) = DateTime::from_timestamp(epoch, 0) else {
            continue;
        };

        let close = field("close", i);
        let adjusted = adjclose
            .and_then(|a| a.get(i))
            .and_then(Value::as_f64)
            .or(close);

        // A bar without a usable close is a calendar hole, not an error.
        let (Some(close), Some(adjusted)) = (close, adjusted) else {
            continue;
        };

        bars.push(PriceBar {
            date: stamp.date_naive(),
            open: field("open", i).unwrap_or(close),
            high: field("high", i).unwrap_or(close),
            low: field("low", i).unwrap_or(close),
            close,
            adjusted_close: adjusted,
            volume: quote
                .get("volume")
                .and_then(|a| a.get(i))
                .and_then(Value::as_u64)
                .unwrap_or(0),
        });
    }

    Ok(bars)
}

/// Parse the assetProfile + price modules into a [`CompanyProfile`].
pub fn parse_company_profile(
    symbol: &str,
    body: &Value,
) -> Result<CompanyProfile, ProviderError> {
    let result = body
        .pointer("/quoteSummary/result/0")
        .filter(|r| !r.is_null())
        .ok_or_else(|| {
            ProviderError::Malformed("quoteSummary response carries no result".into())
        })?;

    let asset = result.get("assetProfile").unwrap_or(&Value::Null);
    let price = result.get("price").unwrap_or(&Value::Null);

    let str_field = |obj: &Value, key: &str| -> Option<String> {
        obj.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
    };

    Ok(CompanyProfile {
        name: str_field(price, "longName")
            .or_else(|| str_field(price, "shortName"))
            .unwrap_or_else(|| symbol.to_string()),
        sector: str_field(asset, "sector"),
        industry: str_field(asset, "industry"),
        website: str_field(asset, "website"),
        market_cap: wrapped_number(price.get("marketCap")),
        summary: str_field(asset, "longBusinessSummary"),
    })
}

/// Parse the three statement-history modules.
pub fn parse_financial_statements(
    body: &Value,
) -> Result<FinancialStatements, ProviderError> {
    let result = body
        .pointer("/quoteSummary/result/0")
        .filter(|r| !r.is_null())
        .ok_or_else(|| {
            ProviderError::Malformed("quoteSummary response carries no result".into())
        })?;

    let history = |module: &str, inner: &str| -> Vec<StatementPeriod> {
        result
            .pointer(&format!("/{module}/{inner}"))
            .and_then(Value::as_array)
            .map(|entries| entries.iter().filter_map(parse_statement_period).collect())
            .unwrap_or_default()
    };

    Ok(FinancialStatements {
        income_statement: history("incomeStatementHistory", "incomeStatementHistory"),
        balance_sheet: history("balanceSheetHistory", "balanceSheetStatements"),
        cashflow: history("cashflowStatementHistory", "cashflowStatements"),
    })
}

/// One statement entry: an object of line items keyed by name, each either
/// a `{raw, fmt}` wrapper or an empty object for a missing value.
fn parse_statement_period(entry: &Value) -> Option<StatementPeriod> {
    let obj = entry.as_object()?;

    let end_date = obj
        .get("endDate")
        .and_then(|d| d.get("fmt"))
        .and_then(Value::as_str)
        .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())?;

    let items = obj
        .iter()
        .filter(|(k, _)| k.as_str() != "endDate" && k.as_str() != "maxAge")
        .map(|(k, v)| (k.clone(), wrapped_number(Some(v))))
        .collect();

    Some(StatementPeriod { end_date, items })
}

/// Parse the search endpoint's news array.
pub fn parse_news(body: &Value) -> Result<Vec<NewsItem>, ProviderError> {
    let entries = match body.get("news").and_then(Value::as_array) {
        Some(e) => e,
        None => return Ok(Vec::new()),
    };

    let items = entries
        .iter()
        .filter_map(|n| {
            // A headline without title or link is useless; anything else is
            // optional.
            let title = n.get("title").and_then(Value::as_str)?.to_string();
            let link = n.get("link").and_then(Value::as_str)?.to_string();
            Some(NewsItem {
                title,
                link,
                publisher: n
                    .get("publisher")
                    .and_then(Value::as_str)
                    .map(str::to_owned),
                published_at: n
                    .get("providerPublishTime")
                    .and_then(Value::as_i64)
                    .and_then(|epoch| DateTime::from_timestamp(epoch, 0)),
            })
        })
        .collect();

    Ok(items)
}

/// Unwrap the provider's `{raw, fmt}` number envelope (or accept a bare
/// number). Empty objects and nulls become `None`.
fn wrapped_number(value: Option<&Value>) -> Option<f64> {
    let value = value?;
    value
        .get("raw")
        .and_then(Value::as_f64)
        .or_else(|| value.as_f64())
        .filter(|n| n.is_finite())
}
