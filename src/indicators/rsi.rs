// =============================================================================
// Relative Strength Index (RSI) — rolling-mean variant
// =============================================================================
//
// Step 1 — day-over-day deltas of the adjusted close.
// Step 2 — split each delta into gain (negatives zeroed) and loss (positives
//          zeroed, then negated).
// Step 3 — avg_gain / avg_loss = plain rolling mean over the trailing
//          `period` deltas (no Wilder smoothing).
// Step 4 — RS  = avg_gain / avg_loss
//          RSI = 100 - 100 / (1 + RS)
//
// Where the rolling average loss is zero the ratio is undefined, and so is
// the RSI: the series carries `None` there. A flat or strictly rising window
// therefore produces no value at all rather than a clamped 50 or 100.

/// Compute the rolling RSI of `values` over a trailing `period` of deltas.
///
/// The returned vector is aligned with `values`: index `i` is `Some` once
/// `i >= period` (a delta needs a prior value, so the earliest defined index
/// is one past the window size) and the trailing average loss is non-zero.
///
/// # Edge cases
/// - `period == 0` => all-`None` series
/// - `values.len() <= period` => all-`None` series of the input length
/// - zero average loss in a window => `None` at that index
pub fn rolling_rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() <= period {
        return out;
    }

    // gains[i] / losses[i] describe the move from values[i] to values[i+1].
    let gains: Vec<f64> = values
        .windows(2)
        .map(|w| (w[1] - w[0]).max(0.0))
        .collect();
    let losses: Vec<f64> = values
        .windows(2)
        .map(|w| (w[0] - w[1]).max(0.0))
        .collect();

    let period_f = period as f64;
    let mut gain_sum: f64 = gains[..period].iter().sum();
    let mut loss_sum: f64 = losses[..period].iter().sum();

    // Delta window ending at delta index d covers values index d + 1.
    for d in (period - 1)..gains.len() {
        if d >= period {
            gain_sum += gains[d] - gains[d - period];
            loss_sum += losses[d] - losses[d - period];
        }
        out[d + 1] = rsi_value(gain_sum / period_f, loss_sum / period_f);
    }

    out
}

/// RSI from the two window averages; `None` when the loss average is zero.
fn rsi_value(avg_gain: f64, avg_loss: f64) -> Option<f64> {
    if avg_loss == 0.0 {
        return None;
    }
    let rs = avg_gain / avg_loss;
    let rsi = 100.0 - 100.0 / (1.0 + rs);
    rsi.is_finite().then_some(rsi)
}
