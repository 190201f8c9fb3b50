#![allow(dead_code)]

use std::io::Write;
use wrbars::PriceSeries;

/// Ordinal-time series from closes; high and low sit half a unit either side.
pub fn series_from_closes(closes: &[f64]) -> PriceSeries<i64> {
    let time: Vec<i64> = (0..closes.len() as i64).collect();
    let high = closes.iter().map(|c| c + 0.5).collect();
    let low = closes.iter().map(|c| c - 0.5).collect();
    PriceSeries::from_columns(time, high, low, closes.to_vec()).unwrap()
}

/// Random-walk style series built from step deltas.
pub fn walk(start: f64, steps: &[f64]) -> Vec<f64> {
    let mut price = start;
    let mut out = Vec::with_capacity(steps.len() + 1);
    out.push(price);
    for step in steps {
        price += step;
        out.push(price);
    }
    out
}

pub fn write_temp_file(content: &str, suffix: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// CSV text with `time,open,high,low,close,volume` rows for the given closes.
pub fn ohlcv_csv(closes: &[f64]) -> String {
    let mut csv = String::from("time,open,high,low,close,volume\n");
    let mut prev = closes.first().copied().unwrap_or_default();
    for (i, c) in closes.iter().enumerate() {
        let high = prev.max(*c) + 0.25;
        let low = prev.min(*c) - 0.25;
        csv.push_str(&format!("{},{},{},{},{},{}\n", 1_700_000_000 + i * 60, prev, high, low, c, 1000 + i));
        prev = *c;
    }
    csv
}
