//! OHLC(V) bar representation.

use serde::Serialize;

/// One interval of a price series. `T` is the opaque ordered time key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bar<T> {
    pub time: T,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl<T> Bar<T> {
    pub fn new(time: T, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            time,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    /// max(high - low, |high - prev_close|, |low - prev_close|)
    pub fn true_range(&self, prev_close: f64) -> f64 {
        true_range(self.high, self.low, prev_close)
    }

    /// high - low
    pub fn height(&self) -> f64 {
        self.high - self.low
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }
}

pub(crate) fn true_range(high: f64, low: f64, prev_close: f64) -> f64 {
    let hl = high - low;
    let hc = (high - prev_close).abs();
    let lc = (low - prev_close).abs();
    hl.max(hc).max(lc)
}
