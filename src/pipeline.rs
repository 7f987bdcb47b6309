// =============================================================================
// Indicator Pipeline
// =============================================================================
//
// One pure pass from an ordered bar sequence to everything the trading
// dashboard and market overview tabs chart or tabulate: the two long SMAs,
// the Bollinger triple, the RSI oscillator, the percent-change column, the
// headline summary statistics, and the latest raw close for the price
// header.
//
// Every derived series is computed from the adjusted close. The only raw
// close that survives is `latest_close`, which backs the big price figure
// next to the company name.

use crate::indicators::bollinger::{bollinger_bands, BollingerBands};
use crate::indicators::returns::{percent_change, summary_stats, SummaryStats};
use crate::indicators::rsi::rolling_rsi;
use crate::indicators::sma::rolling_mean;
use crate::types::PriceBar;

/// Trailing window of the short moving average.
pub const SMA_SHORT_WINDOW: usize = 50;
/// Trailing window of the long moving average.
pub const SMA_LONG_WINDOW: usize = 200;
/// Trailing window of the Bollinger middle band.
pub const BOLLINGER_WINDOW: usize = 20;
/// Band width in standard deviations.
pub const BOLLINGER_NUM_STD: f64 = 2.0;
/// Trailing delta window of the RSI oscillator.
pub const RSI_PERIOD: usize = 14;

/// Every derived series for one query, all date-aligned with the input bars.
#[derive(Debug, Clone)]
pub struct IndicatorSet {
    pub sma50: Vec<Option<f64>>,
    pub sma200: Vec<Option<f64>>,
    pub bands: BollingerBands,
    pub rsi: Vec<Option<f64>>,
    /// Day-over-day fractional change of the adjusted close.
    pub percent_change: Vec<Option<f64>>,
    /// Headline metrics; `None` when fewer than two bars were fetched.
    pub stats: Option<SummaryStats>,
    /// Raw close of the most recent bar, for the price header.
    pub latest_close: Option<f64>,
}

/// Run the full pipeline over `bars`.
///
/// Deterministic and order-sensitive; the caller is responsible for passing
/// bars sorted ascending by date (the providers already guarantee this).
pub fn compute(bars: &[PriceBar]) -> IndicatorSet {
    let adjusted: Vec<f64> = bars.iter().map(|b| b.adjusted_close).collect();

    IndicatorSet {
        sma50: rolling_mean(&adjusted, SMA_SHORT_WINDOW),
        sma200: rolling_mean(&adjusted, SMA_LONG_WINDOW),
        bands: bollinger_bands(&adjusted, BOLLINGER_WINDOW, BOLLINGER_NUM_STD),
        rsi: rolling_rsi(&adjusted, RSI_PERIOD),
        percent_change: percent_change(&adjusted),
        stats: summary_stats(&adjusted),
        latest_close: bars.iter().rev().map(|b| b.close).find(|c| c.is_finite()),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    /// Build a bar sequence from adjusted closes on consecutive dates; the
    /// raw close is offset so tests can tell the two apart.
    fn bars_from(adjusted: &[f64]) -> Vec<PriceBar> {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        adjusted
            .iter()
            .enumerate()
            .map(|(i, &adj)| PriceBar {
                date: start + Duration::days(i as i64),
                open: adj,
                high: adj + 1.0,
                low: adj - 1.0,
                close: adj + 0.25,
                adjusted_close: adj,
                volume: 1_000,
            })
            .collect()
    }

    #[test]
    fn constant_series_collapses_all_bands() {
        // 300 bars pinned at 100: every defined SMA and band value is 100,
        // and the RSI never produces a value.
        let bars = bars_from(&[100.0; 300]);
        let set = compute(&bars);

        for (i, v) in set.sma50.iter().enumerate() {
            match v {
                Some(x) => assert!((x - 100.0).abs() < 1e-10),
                None => assert!(i < 49),
            }
        }
        for (i, v) in set.sma200.iter().enumerate() {
            match v {
                Some(x) => assert!((x - 100.0).abs() < 1e-10),
                None => assert!(i < 199),
            }
        }
        for i in 19..300 {
            assert!((set.bands.upper[i].unwrap() - 100.0).abs() < 1e-10);
            assert!((set.bands.lower[i].unwrap() - 100.0).abs() < 1e-10);
        }
        assert!(set.rsi.iter().all(Option::is_none));

        let stats = set.stats.unwrap();
        assert!(stats.annualized_volatility.abs() < 1e-12);
    }

    #[test]
    fn short_input_leaves_long_windows_undefined() {
        let values: Vec<f64> = (1..=49).map(|x| 100.0 + x as f64).collect();
        let set = compute(&bars_from(&values));
        assert!(set.sma50.iter().all(Option::is_none));
        assert!(set.sma200.iter().all(Option::is_none));
        // The 20-bar bands are still live on 49 bars.
        assert!(set.bands.middle[19].is_some());
    }

    #[test]
    fn series_lengths_match_input() {
        let values: Vec<f64> = (0..260).map(|i| 90.0 + (i as f64 * 0.2).sin()).collect();
        let bars = bars_from(&values);
        let set = compute(&bars);
        assert_eq!(set.sma50.len(), bars.len());
        assert_eq!(set.sma200.len(), bars.len());
        assert_eq!(set.bands.upper.len(), bars.len());
        assert_eq!(set.rsi.len(), bars.len());
        assert_eq!(set.percent_change.len(), bars.len());
    }

    #[test]
    fn rsi_bounded_on_mixed_series() {
        let values: Vec<f64> =
            (0..300).map(|i| 100.0 + (i as f64 * 0.7).sin() * 10.0).collect();
        let set = compute(&bars_from(&values));
        assert!(set.rsi.iter().flatten().any(|_| true));
        for v in set.rsi.iter().flatten() {
            assert!((0.0..=100.0).contains(v));
        }
    }

    #[test]
    fn latest_close_uses_raw_close() {
        // bars_from offsets the raw close by +0.25 from the adjusted close.
        let set = compute(&bars_from(&[100.0, 101.0, 102.0]));
        assert!((set.latest_close.unwrap() - 102.25).abs() < 1e-12);
    }

    #[test]
    fn empty_input_yields_empty_set() {
        let set = compute(&[]);
        assert!(set.sma50.is_empty());
        assert!(set.rsi.is_empty());
        assert!(set.stats.is_none());
        assert!(set.latest_close.is_none());
    }
}
