//! CSV file data adapter: reads input series and writes reconstructed bars.

use crate::domain::error::WrbarsError;
use crate::domain::series::{ColumnMap, PriceSeries};
use crate::domain::time_key::TimeKey;
use crate::ports::series_sink::SeriesSink;
use crate::ports::series_source::SeriesSource;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Parses CSV text with a header row.
    pub fn parse(content: &str, columns: &ColumnMap) -> Result<PriceSeries<TimeKey>, WrbarsError> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(content.as_bytes());

        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| WrbarsError::Data {
                reason: format!("CSV header error: {}", e),
            })?
            .iter()
            .map(str::to_string)
            .collect();

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(|e| WrbarsError::Data {
                reason: format!("CSV parse error: {}", e),
            })?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        columns.extract(&headers, &rows)
    }
}

impl SeriesSource for CsvSource {
    fn load(&self, columns: &ColumnMap) -> Result<PriceSeries<TimeKey>, WrbarsError> {
        let content = fs::read_to_string(&self.path).map_err(|e| WrbarsError::Data {
            reason: format!("failed to read {}: {}", self.path.display(), e),
        })?;
        let series = Self::parse(&content, columns)?;
        tracing::debug!(path = %self.path.display(), rows = series.len(), "loaded series");
        Ok(series)
    }
}

/// Writes `time,open,high,low,close` rows.
pub struct CsvSink;

impl SeriesSink for CsvSink {
    fn write_to(&self, series: &PriceSeries<TimeKey>, out: &mut dyn Write) -> Result<(), WrbarsError> {
        let mut wtr = csv::Writer::from_writer(out);
        let to_data = |e: csv::Error| WrbarsError::Data {
            reason: format!("CSV write error: {}", e),
        };

        wtr.write_record(["time", "open", "high", "low", "close"])
            .map_err(to_data)?;
        for bar in series.bars() {
            wtr.write_record([
                bar.time.to_string(),
                bar.open.to_string(),
                bar.high.to_string(),
                bar.low.to_string(),
                bar.close.to_string(),
            ])
            .map_err(to_data)?;
        }
        wtr.flush()?;
        Ok(())
    }
}
