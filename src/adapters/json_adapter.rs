//! Chart-data JSON writer.
//!
//! Emits the record array a candlestick widget consumes:
//! `[{"time": ..., "open": ..., "high": ..., "low": ..., "close": ...}, ...]`.
//! Integer times are numbers, calendar times are strings.

use crate::domain::error::WrbarsError;
use crate::domain::series::PriceSeries;
use crate::domain::time_key::TimeKey;
use crate::ports::series_sink::SeriesSink;
use serde::Serialize;
use std::io::Write;

#[derive(Serialize)]
struct CandleRecord<'a> {
    time: &'a TimeKey,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSink {
    pub pretty: bool,
}

impl SeriesSink for JsonSink {
    fn write_to(&self, series: &PriceSeries<TimeKey>, out: &mut dyn Write) -> Result<(), WrbarsError> {
        let opens = series.open().unwrap_or(series.close());
        let records: Vec<CandleRecord<'_>> = series
            .time()
            .iter()
            .enumerate()
            .map(|(i, time)| CandleRecord {
                time,
                open: opens[i],
                high: series.high()[i],
                low: series.low()[i],
                close: series.close()[i],
            })
            .collect();

        let result = if self.pretty {
            serde_json::to_writer_pretty(&mut *out, &records)
        } else {
            serde_json::to_writer(&mut *out, &records)
        };
        result.map_err(|e| WrbarsError::Data {
            reason: format!("JSON write error: {}", e),
        })?;
        writeln!(out)?;
        Ok(())
    }
}
