// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Middle band = rolling SMA, upper/lower = middle ± k * rolling std-dev.
//
// The standard deviation is the *sample* deviation (n−1 divisor). That
// convention is shared with the annualized-volatility computation in
// `returns` and is what every test fixture in this module assumes.

use crate::indicators::sma::rolling_mean;

/// The three Bollinger series, each aligned with the input values.
#[derive(Debug, Clone)]
pub struct BollingerBands {
    pub middle: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

/// Compute Bollinger Bands over `values` with a trailing `window` and a band
/// width of `num_std` standard deviations.
///
/// All three returned series have the same length as `values`, with `None`
/// for the first `window - 1` entries.
///
/// # Edge cases
/// - `window < 2` => all three series all-`None` (sample deviation needs at
///   least two points)
/// - `values.len() < window` => all three series all-`None`
pub fn bollinger_bands(values: &[f64], window: usize, num_std: f64) -> BollingerBands {
    let len = values.len();
    if window < 2 || len < window {
        return BollingerBands {
            middle: vec![None; len],
            upper: vec![None; len],
            lower: vec![None; len],
        };
    }

    let middle = rolling_mean(values, window);
    let sigma = rolling_std(values, window);

    let mut upper = vec![None; len];
    let mut lower = vec![None; len];
    for i in (window - 1)..len {
        // Both series are defined from window-1 onward by construction.
        if let (Some(m), Some(s)) = (middle[i], sigma[i]) {
            upper[i] = Some(m + num_std * s);
            lower[i] = Some(m - num_std * s);
        }
    }

    BollingerBands { middle, upper, lower }
}

/// Rolling sample standard deviation (n−1 divisor), aligned with the input.
pub fn rolling_std(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window < 2 || values.len() < window {
        return out;
    }

    for i in (window - 1)..values.len() {
        let slice = &values[i + 1 - window..=i];
        let mean = slice.iter().sum::<f64>() / window as f64;
        let variance =
            slice.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (window - 1) as f64;
        out[i] = Some(variance.sqrt());
    }

    out
}
