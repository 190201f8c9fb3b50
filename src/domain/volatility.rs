//! Volatility estimator for adaptive brick sizing.
//!
//! TR[i] = max(H[i]-L[i], |H[i]-C[i-1]|, |L[i]-C[i-1]|) for i >= 1; TR[0] is undefined.
//! ATR[i] = mean(TR[i-p+1..=i]), undefined while any value in the window is.
//! Brick size = mean of all defined ATR values, or 1.0 when that is undefined or <= 0.

use crate::domain::bar::true_range;
use crate::domain::error::WrbarsError;

pub const DEFAULT_ATR_PERIOD: usize = 14;
pub const FALLBACK_BRICK_SIZE: f64 = 1.0;

/// True range per index. Index 0 has no previous close and is `None`.
pub fn true_range_series(high: &[f64], low: &[f64], close: &[f64]) -> Vec<Option<f64>> {
    let n = high.len().min(low.len()).min(close.len());
    (0..n)
        .map(|i| {
            if i == 0 {
                None
            } else {
                Some(true_range(high[i], low[i], close[i - 1]))
            }
        })
        .collect()
}

/// Simple trailing mean over `period` values. A window with any undefined
/// value, or one not yet full, is undefined.
pub fn rolling_mean(values: &[Option<f64>], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }
    (0..values.len())
        .map(|i| {
            if i + 1 < period {
                return None;
            }
            let window = &values[i + 1 - period..=i];
            let sum = window.iter().try_fold(0.0, |acc, v| v.map(|x| acc + x))?;
            Some(sum / period as f64)
        })
        .collect()
}

/// Mean of the defined values, `None` if there are none.
fn mean_defined(values: &[Option<f64>]) -> Option<f64> {
    let (sum, count) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

/// Adaptive brick size: the mean of the rolling ATR series.
///
/// Falls back to [`FALLBACK_BRICK_SIZE`] when the series is shorter than
/// `period + 1` or the result is not positive. `period` must be at least 1.
pub fn adaptive_brick_size(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    period: usize,
) -> Result<f64, WrbarsError> {
    if period == 0 {
        return Err(WrbarsError::invalid_parameter("period", "must be at least 1"));
    }

    let tr = true_range_series(high, low, close);
    let atr = rolling_mean(&tr, period);

    match mean_defined(&atr) {
        Some(size) if size > 0.0 && size.is_finite() => {
            tracing::debug!(period, brick_size = size, "derived adaptive brick size");
            Ok(size)
        }
        other => {
            tracing::warn!(
                period,
                bars = tr.len(),
                estimate = ?other,
                "adaptive brick size unavailable, falling back to {}",
                FALLBACK_BRICK_SIZE
            );
            Ok(FALLBACK_BRICK_SIZE)
        }
    }
}
