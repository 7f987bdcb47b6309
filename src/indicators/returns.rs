// =============================================================================
// Daily Returns & Summary Statistics
// =============================================================================
//
// The percent-change series feeds both the raw-data table (as an extra
// column) and the three headline metrics on the overview tab:
//
//   average_daily_return  = mean(Δ) * 100
//   yearly_return         = mean(Δ) * 252 * 100
//   annualized_volatility = stddev(Δ) * sqrt(252) * 100
//
// 252 is the fixed trading-days-per-year constant; there is no
// calendar-aware adjustment. The stddev is the sample deviation (n−1),
// matching the Bollinger computation, and a single available return yields
// zero volatility rather than an undefined one.

use serde::Serialize;

/// Fixed trading-days-per-year constant used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Headline metrics over the full fetched range, all in percent.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SummaryStats {
    pub yearly_return: f64,
    pub annualized_volatility: f64,
    pub average_daily_return: f64,
}

/// Day-over-day fractional change, aligned with the input.
///
/// Index 0 is always `None` (no prior value); an entry whose prior value is
/// zero is also `None` rather than an infinity.
pub fn percent_change(values: &[f64]) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    for i in 1..values.len() {
        let prev = values[i - 1];
        if prev != 0.0 {
            let delta = (values[i] - prev) / prev;
            if delta.is_finite() {
                out[i] = Some(delta);
            }
        }
    }
    out
}

/// Compute the summary statistics over the full series of values.
///
/// Returns `None` when fewer than two values exist (no return can be
/// formed). With exactly one return the volatility is 0.0.
pub fn summary_stats(values: &[f64]) -> Option<SummaryStats> {
    let returns: Vec<f64> = percent_change(values).into_iter().flatten().collect();
    if returns.is_empty() {
        return None;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;

    let std_dev = if returns.len() < 2 {
        0.0
    } else {
        let variance =
            returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
        variance.sqrt()
    };

    Some(SummaryStats {
        yearly_return: mean * TRADING_DAYS_PER_YEAR * 100.0,
        annualized_volatility: std_dev * TRADING_DAYS_PER_YEAR.sqrt() * 100.0,
        average_daily_return: mean * 100.0,
    })
}
