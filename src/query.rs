// =============================================================================
// Query Layer — input normalization and per-tab view assembly
// =============================================================================
//
// One user interaction = one `DashboardQuery`, normalized up front
// (uppercased symbol, range stretched to at least a year), then pushed
// synchronously through fetch → pipeline for each tab. Sections fail
// independently: the profile, statements, and news fields each carry their
// own `Result`, so a dead news endpoint never blanks the chart data. Only
// an empty price history is fatal for a tab, and even that surfaces as a
// `NoData` warning rather than an error.

use std::sync::Arc;

use anyhow::{bail, Result};
use chrono::{Duration, NaiveDate};
use tracing::{info, instrument, warn};

use crate::cache::{HistoryCache, HistoryKey};
use crate::pipeline::{self, IndicatorSet};
use crate::providers::fred::MacroSeriesClient;
use crate::providers::market::MarketDataClient;
use crate::providers::ProviderError;
use crate::settings::Settings;
use crate::types::{CompanyProfile, FinancialStatements, MacroPoint, NewsItem, PriceBar};

/// Minimum span of a query range, in days. Shorter inputs are stretched
/// backward from the end date.
pub const MIN_RANGE_DAYS: i64 = 365;

// =============================================================================
// DashboardQuery
// =============================================================================

/// A normalized user query: uppercase symbol, ordered range of at least
/// [`MIN_RANGE_DAYS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardQuery {
    pub symbol: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DashboardQuery {
    /// Normalize raw user input.
    ///
    /// - trims and uppercases the symbol; an empty symbol is rejected
    /// - swaps an inverted date range
    /// - extends the range backward so it spans at least a year, keeping
    ///   the end date anchored
    pub fn new(raw_symbol: &str, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        let symbol = raw_symbol.trim().to_uppercase();
        if symbol.is_empty() {
            bail!("ticker symbol is empty");
        }

        let (mut start, end) = if start <= end { (start, end) } else { (end, start) };
        if end - start < Duration::days(MIN_RANGE_DAYS) {
            start = end - Duration::days(MIN_RANGE_DAYS);
        }

        Ok(Self { symbol, start, end })
    }
}

// =============================================================================
// View models
// =============================================================================

/// Everything the trading-dashboard tab renders for one symbol.
#[derive(Debug)]
pub struct TradingDashboard {
    pub query: DashboardQuery,
    pub bars: Arc<Vec<PriceBar>>,
    pub indicators: IndicatorSet,
    pub profile: Result<CompanyProfile, ProviderError>,
    pub statements: Result<FinancialStatements, ProviderError>,
    pub news: Result<Vec<NewsItem>, ProviderError>,
}

/// The benchmark-index view for the market-overview tab.
#[derive(Debug)]
pub struct MarketOverview {
    pub symbol: String,
    pub bars: Arc<Vec<PriceBar>>,
    pub indicators: IndicatorSet,
}

/// One named macro series, fetched independently of the others.
#[derive(Debug)]
pub struct MacroSeries {
    pub id: String,
    pub points: Result<Vec<MacroPoint>, ProviderError>,
}

/// The economic-insights tab: every configured series, in display order.
#[derive(Debug)]
pub struct EconomyView {
    pub series: Vec<MacroSeries>,
}

impl EconomyView {
    /// Display panels: series are charted two to a panel.
    pub fn panels(&self) -> impl Iterator<Item = &[MacroSeries]> {
        self.series.chunks(2)
    }
}

// =============================================================================
// Orchestration
// =============================================================================

/// Fetch price history through the memoization cache.
///
/// Only successful non-empty fetches are cached; failures are retried on
/// the next identical query.
pub async fn fetch_history_cached(
    market: &MarketDataClient,
    cache: &HistoryCache,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Arc<Vec<PriceBar>>, ProviderError> {
    let key = HistoryKey {
        symbol: symbol.to_string(),
        start,
        end,
    };

    if let Some(bars) = cache.get(&key) {
        info!(key = %key, count = bars.len(), "price history served from cache");
        return Ok(bars);
    }

    let bars = market.fetch_price_history(symbol, start, end).await?;
    let shared = cache.insert(key, bars);
    info!(cached_queries = cache.len(), "price history cached");
    Ok(shared)
}

/// Build the trading-dashboard view for `query`.
///
/// The price history is the spine of the tab: if it is empty the whole tab
/// reports `NoData`. Profile, statements, and news are fetched after it,
/// one at a time, and each keeps its own per-section `Result`.
#[instrument(skip(market, cache), fields(symbol = %query.symbol))]
pub async fn run_trading_dashboard(
    market: &MarketDataClient,
    cache: &HistoryCache,
    query: &DashboardQuery,
    news_limit: usize,
) -> Result<TradingDashboard, ProviderError> {
    let bars = fetch_history_cached(market, cache, &query.symbol, query.start, query.end).await?;
    let indicators = pipeline::compute(&bars);

    let profile = market.fetch_company_profile(&query.symbol).await;
    if let Err(e) = &profile {
        warn!(symbol = %query.symbol, error = %e, "profile section failed");
    }

    let statements = market.fetch_financial_statements(&query.symbol).await;
    if let Err(e) = &statements {
        warn!(symbol = %query.symbol, error = %e, "statements section failed");
    }

    let news = market.fetch_news(&query.symbol).await.map(|mut items| {
        items.truncate(news_limit);
        items
    });
    if let Err(e) = &news {
        warn!(symbol = %query.symbol, error = %e, "news section failed");
    }

    Ok(TradingDashboard {
        query: query.clone(),
        bars,
        indicators,
        profile,
        statements,
        news,
    })
}

/// Build the market-overview view: the configured benchmark index pushed
/// through the same cache and pipeline as any stock query.
#[instrument(skip(market, cache, settings))]
pub async fn run_market_overview(
    market: &MarketDataClient,
    cache: &HistoryCache,
    settings: &Settings,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<MarketOverview, ProviderError> {
    let symbol = settings.benchmark_symbol.clone();
    let bars = fetch_history_cached(market, cache, &symbol, start, end).await?;
    let indicators = pipeline::compute(&bars);

    Ok(MarketOverview {
        symbol,
        bars,
        indicators,
    })
}

/// Build the economic-insights view. Series are fetched one at a time and
/// fail independently; an empty result for one series never hides the
/// others.
#[instrument(skip(fred, settings))]
pub async fn run_economy(fred: &MacroSeriesClient, settings: &Settings) -> EconomyView {
    let mut series = Vec::with_capacity(settings.macro_series.len());

    for id in &settings.macro_series {
        let points = fred.fetch_macro_series(id).await;
        if let Err(e) = &points {
            warn!(series = %id, error = %e, "macro series fetch failed");
        }
        series.push(MacroSeries {
            id: id.clone(),
            points,
        });
    }

    EconomyView { series }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn symbol_is_trimmed_and_uppercased() {
        let q = DashboardQuery::new("  aapl ", date(2023, 1, 1), date(2024, 1, 1)).unwrap();
        assert_eq!(q.symbol, "AAPL");
    }

    #[test]
    fn empty_symbol_is_rejected() {
        assert!(DashboardQuery::new("   ", date(2023, 1, 1), date(2024, 1, 1)).is_err());
    }

    #[test]
    fn short_range_is_extended_to_a_year() {
        let q = DashboardQuery::new("MSFT", date(2024, 5, 1), date(2024, 6, 1)).unwrap();
        assert_eq!(q.end, date(2024, 6, 1)); // end stays anchored
        assert_eq!(q.end - q.start, Duration::days(MIN_RANGE_DAYS));
    }

    #[test]
    fn long_range_is_untouched() {
        let q = DashboardQuery::new("MSFT", date(2020, 1, 1), date(2024, 1, 1)).unwrap();
        assert_eq!(q.start, date(2020, 1, 1));
        assert_eq!(q.end, date(2024, 1, 1));
    }

    #[test]
    fn inverted_range_is_swapped_then_extended() {
        let q = DashboardQuery::new("MSFT", date(2024, 6, 1), date(2024, 5, 1)).unwrap();
        assert_eq!(q.end, date(2024, 6, 1));
        assert!(q.start < q.end);
        assert!(q.end - q.start >= Duration::days(MIN_RANGE_DAYS));
    }

    #[test]
    fn exactly_one_year_is_kept() {
        let q = DashboardQuery::new("MSFT", date(2023, 6, 1), date(2024, 5, 31)).unwrap();
        // 365 days exactly — no stretching needed.
        assert_eq!(q.start, date(2023, 6, 1));
    }

    #[test]
    fn economy_panels_chunk_in_pairs() {
        let view = EconomyView {
            series: ["GDP", "FEDFUNDS", "CPIAUCNS", "UNRATE"]
                .iter()
                .map(|id| MacroSeries {
                    id: id.to_string(),
                    points: Ok(Vec::new()),
                })
                .collect(),
        };
        let panels: Vec<_> = view.panels().collect();
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[0].len(), 2);
        assert_eq!(panels[0][0].id, "GDP");
        assert_eq!(panels[1][1].id, "UNRATE");
    }

    #[test]
    fn economy_panels_odd_count_leaves_remainder() {
        let view = EconomyView {
            series: vec![
                MacroSeries {
                    id: "GDP".to_string(),
                    points: Ok(Vec::new()),
                },
                MacroSeries {
                    id: "UNRATE".to_string(),
                    points: Err(ProviderError::NoData),
                },
                MacroSeries {
                    id: "FEDFUNDS".to_string(),
                    points: Ok(Vec::new()),
                },
            ],
        };
        let panels: Vec<_> = view.panels().collect();
        assert_eq!(panels.len(), 2);
        assert_eq!(panels[1].len(), 1);
    }
}
