//! Output series port trait.

use crate::domain::error::WrbarsError;
use crate::domain::series::PriceSeries;
use crate::domain::time_key::TimeKey;
use std::io::Write;

/// Writes a reconstructed series as `time, open, high, low, close` records.
pub trait SeriesSink {
    fn write_to(&self, series: &PriceSeries<TimeKey>, out: &mut dyn Write) -> Result<(), WrbarsError>;

    /// Default implementation: renders into memory via `write_to`.
    fn render(&self, series: &PriceSeries<TimeKey>) -> Result<String, WrbarsError> {
        let mut buf = Vec::new();
        self.write_to(series, &mut buf)?;
        String::from_utf8(buf).map_err(|e| WrbarsError::Data {
            reason: format!("output is not UTF-8: {}", e),
        })
    }
}
