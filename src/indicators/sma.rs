// =============================================================================
// Simple Moving Average (SMA)
// =============================================================================
//
// SMA_t = mean(values[t-window+1 ..= t])
//
// The output is aligned with the input: entry `t` is `None` while fewer than
// `window` values are available, so the first `window - 1` entries of every
// SMA series are always `None`.

/// Compute the rolling arithmetic mean of `values` over a trailing `window`.
///
/// The returned vector has the same length as `values`; index `i` holds
/// `Some(mean)` once `i >= window - 1` and `None` before that.
///
/// # Edge cases
/// - `window == 0` => all-`None` series (no meaningful mean exists)
/// - `values.len() < window` => all-`None` series of the input length
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if window == 0 || values.len() < window {
        return out;
    }

    // Running sum: add the incoming value, drop the one leaving the window.
    let mut sum: f64 = values[..window].iter().sum();
    out[window - 1] = Some(sum / window as f64);

    for i in window..values.len() {
        sum += values[i] - values[i - window];
        out[i] = Some(sum / window as f64);
    }

    out
}

// =============================================================================
// Unit Tests
// =============================================================================
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sma_empty_input() {
        assert!(rolling_mean(&[], 50).is_empty());
    }

    #[test]
    fn sma_window_zero() {
        let out = rolling_mean(&[1.0, 2.0, 3.0], 0);
        assert_eq!(out, vec![None, None, None]);
    }

    #[test]
    fn sma_insufficient_data_is_all_none() {
        // 49 bars against a 50-bar window: nothing is ever emitted.
        let values = vec![10.0; 49];
        let out = rolling_mean(&values, 50);
        assert_eq!(out.len(), 49);
        assert!(out.iter().all(Option::is_none));
    }

    #[test]
    fn sma_leading_entries_undefined() {
        let values: Vec<f64> = (1..=10).map(|x| x as f64).collect();
        let out = rolling_mean(&values, 4);
        assert_eq!(out.len(), 10);
        for (i, v) in out.iter().enumerate() {
            if i < 3 {
                assert!(v.is_none(), "index {i} should be undefined");
            } else {
                assert!(v.is_some(), "index {i} should be defined");
            }
        }
    }

    #[test]
    fn sma_known_values() {
        // 3-period SMA of [1, 2, 3, 4, 5] = [_, _, 2, 3, 4]
        let out = rolling_mean(&[1.0, 2.0, 3.0, 4.0, 5.0], 3);
        assert_eq!(out[2], Some(2.0));
        assert_eq!(out[3], Some(3.0));
        assert_eq!(out[4], Some(4.0));
    }

    #[test]
    fn sma_matches_naive_mean() {
        // Cross-check the running-sum against a direct per-window mean.
        let values: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.73).sin() * 5.0).collect();
        let window = 20;
        let out = rolling_mean(&values, window);
        for i in (window - 1)..values.len() {
            let naive: f64 =
                values[i + 1 - window..=i].iter().sum::<f64>() / window as f64;
            let got = out[i].unwrap();
            assert!((got - naive).abs() < 1e-9, "index {i}: {got} vs {naive}");
        }
    }

    #[test]
    fn sma_constant_series() {
        let values = vec![100.0; 300];
        let out = rolling_mean(&values, 50);
        for v in out.iter().skip(49) {
            assert!((v.unwrap() - 100.0).abs() < 1e-10);
        }
    }
}
