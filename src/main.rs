// =============================================================================
// MarketLens — Main Entry Point
// =============================================================================
//
// Interactive front end over the dashboard engine: prompt for a ticker and
// date range, run the three tab builders, print each section. A failed
// section prints an inline warning and the rest of the output continues —
// resubmitting the input is always the user's next move.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod cache;
mod indicators;
mod pipeline;
mod providers;
mod query;
mod settings;
mod types;

use std::io::{self, BufRead, Write};

use chrono::{NaiveDate, Utc};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::cache::HistoryCache;
use crate::providers::fred::MacroSeriesClient;
use crate::providers::market::MarketDataClient;
use crate::providers::ProviderError;
use crate::query::{DashboardQuery, EconomyView, MarketOverview, TradingDashboard};
use crate::settings::Settings;
use crate::types::CompanyProfile;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── 1. Environment & config ──────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("╔══════════════════════════════════════════════════════════╗");
    info!("║              MarketLens — Starting Up                   ║");
    info!("╚══════════════════════════════════════════════════════════╝");

    let mut settings = Settings::load("settings.json").unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load settings, using defaults");
        Settings::default()
    });
    settings.apply_env();

    if settings.fred_api_key.is_empty() {
        warn!("FRED_API_KEY is not set — the economic-insights tab will fail");
    }

    // ── 2. Clients & cache ───────────────────────────────────────────────
    let market = MarketDataClient::new(settings.market_base_url.clone());
    let fred = MacroSeriesClient::new(
        settings.fred_base_url.clone(),
        settings.fred_api_key.clone(),
    );
    let cache = HistoryCache::new();

    // ── 3. Interactive loop ──────────────────────────────────────────────
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        let Some(raw_symbol) = prompt(&mut lines, "Ticker (blank to quit)")? else {
            break;
        };

        let today = Utc::now().date_naive();
        let start = prompt_date(&mut lines, "Start date [YYYY-MM-DD, blank = 1y ago]")?
            .unwrap_or(today - chrono::Duration::days(query::MIN_RANGE_DAYS));
        let end = prompt_date(&mut lines, "End date   [YYYY-MM-DD, blank = today]")?
            .unwrap_or(today);

        let q = match DashboardQuery::new(&raw_symbol, start, end) {
            Ok(q) => q,
            Err(e) => {
                println!("error: {e}");
                continue;
            }
        };

        // One query = one full synchronous recomputation, tab by tab.
        match query::run_trading_dashboard(&market, &cache, &q, settings.news_limit).await {
            Ok(view) => print_trading_dashboard(&view),
            Err(ProviderError::NoData) => println!(
                "warning: no data available for the given ticker and date range. \
                 Please check the ticker symbol or date range."
            ),
            Err(e) => println!(
                "error: fetching data for {} failed ({e}). Please check the ticker \
                 symbol or try again later.",
                q.symbol
            ),
        }

        match query::run_market_overview(&market, &cache, &settings, q.start, q.end).await {
            Ok(view) => print_market_overview(&view),
            Err(e) => println!("error: fetching {} failed ({e})", settings.benchmark_symbol),
        }

        print_economy(&query::run_economy(&fred, &settings).await);
    }

    info!("MarketLens shut down complete.");
    Ok(())
}

// =============================================================================
// Prompt helpers
// =============================================================================

/// Print a prompt and read one trimmed line; `None` on blank input or EOF.
fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
) -> io::Result<Option<String>> {
    print!("{label}: ");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => {
            let line = line?;
            let trimmed = line.trim();
            Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
        }
        None => Ok(None),
    }
}

/// Prompt for a date; invalid input falls back to the default with a note.
fn prompt_date(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    label: &str,
) -> io::Result<Option<NaiveDate>> {
    let Some(text) = prompt(lines, label)? else {
        return Ok(None);
    };
    match NaiveDate::parse_from_str(&text, "%Y-%m-%d") {
        Ok(date) => Ok(Some(date)),
        Err(_) => {
            println!("note: '{text}' is not a valid date, using the default");
            Ok(None)
        }
    }
}

// =============================================================================
// Section printers
// =============================================================================

fn print_trading_dashboard(view: &TradingDashboard) {
    let name = match &view.profile {
        Ok(p) => p.name.clone(),
        Err(_) => view.query.symbol.clone(),
    };

    println!();
    match view.indicators.latest_close {
        Some(price) => println!("=== {name} — ${price:.2} ==="),
        None => println!("=== {name} ==="),
    }
    println!(
        "{} bars, {} → {}",
        view.bars.len(),
        view.query.start,
        view.query.end
    );

    // ── Stock overview ───────────────────────────────────────────────────
    if let Some(stats) = &view.indicators.stats {
        println!("Yearly Return          {:>10.2}%", stats.yearly_return);
        println!("Annualized Volatility  {:>10.2}%", stats.annualized_volatility);
        println!("Average Daily Return   {:>10.2}%", stats.average_daily_return);
    }
    print_latest_indicators(&view.indicators);

    // ── Company data ─────────────────────────────────────────────────────
    match &view.profile {
        Ok(p) => {
            println!("Sector:   {}", text_or_na(&p.sector));
            println!("Industry: {}", text_or_na(&p.industry));
            println!("Website:  {}", text_or_na(&p.website));
            match p.market_cap {
                Some(cap) => println!("Market Cap: {cap:.0}"),
                None => println!("Market Cap: {}", CompanyProfile::NOT_AVAILABLE),
            }
            match &p.summary {
                Some(summary) => println!("Bio: {summary}"),
                None => println!("Company bio is {}.", CompanyProfile::NOT_AVAILABLE),
            }
        }
        Err(e) => println!("error: company profile unavailable ({e})"),
    }

    match &view.statements {
        Ok(s) => println!(
            "Financials: {} income / {} balance / {} cashflow periods",
            s.income_statement.len(),
            s.balance_sheet.len(),
            s.cashflow.len()
        ),
        Err(e) => println!("error: financials unavailable ({e})"),
    }

    // ── Stock news ───────────────────────────────────────────────────────
    match &view.news {
        Ok(items) if items.is_empty() => println!("No news articles available for this stock."),
        Ok(items) => {
            for item in items {
                let publisher = item.publisher.as_deref().unwrap_or("unknown");
                match item.published_at {
                    Some(at) => println!("  {} — {} ({})", item.title, publisher, at),
                    None => println!("  {} — {}", item.title, publisher),
                }
            }
        }
        Err(e) => println!("error: news unavailable ({e})"),
    }
}

fn print_market_overview(view: &MarketOverview) {
    println!();
    match view.indicators.latest_close {
        Some(price) => println!("=== {} Metrics — ${price:.2} ===", view.symbol),
        None => println!("=== {} Metrics ===", view.symbol),
    }
    if let Some(stats) = &view.indicators.stats {
        println!("Yearly Return          {:>10.2}%", stats.yearly_return);
        println!("Annualized Volatility  {:>10.2}%", stats.annualized_volatility);
        println!("Average Daily Return   {:>10.2}%", stats.average_daily_return);
    }
    print_latest_indicators(&view.indicators);
}

fn print_economy(view: &EconomyView) {
    println!();
    println!("=== Economic Metrics ===");
    for panel in view.panels() {
        for series in panel {
            match &series.points {
                Ok(points) => match points.last() {
                    // Latest observation is the headline figure.
                    Some(last) => println!(
                        "  {:<10} {} observations, latest {} = {:.2}",
                        series.id,
                        points.len(),
                        last.date,
                        last.value
                    ),
                    None => println!("  {:<10} no observations", series.id),
                },
                Err(e) => println!("  {:<10} unavailable ({e})", series.id),
            }
        }
        println!("  ----");
    }
}

fn print_latest_indicators(set: &crate::pipeline::IndicatorSet) {
    println!(
        "SMA50 {}  SMA200 {}  Bands {} / {} / {}  RSI {}",
        num_or_na(latest(&set.sma50)),
        num_or_na(latest(&set.sma200)),
        num_or_na(latest(&set.bands.upper)),
        num_or_na(latest(&set.bands.middle)),
        num_or_na(latest(&set.bands.lower)),
        num_or_na(latest(&set.rsi)),
    );
}

/// Most recent defined value of an aligned series.
fn latest(series: &[Option<f64>]) -> Option<f64> {
    series.iter().rev().flatten().next().copied()
}

fn num_or_na(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{v:.2}"),
        None => CompanyProfile::NOT_AVAILABLE.to_string(),
    }
}

fn text_or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(CompanyProfile::NOT_AVAILABLE)
}
