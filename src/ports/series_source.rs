//! Input series port trait.

use crate::domain::error::WrbarsError;
use crate::domain::series::{ColumnMap, PriceSeries};
use crate::domain::time_key::TimeKey;

pub trait SeriesSource {
    /// Loads the full ordered series, picking columns by `columns`.
    fn load(&self, columns: &ColumnMap) -> Result<PriceSeries<TimeKey>, WrbarsError>;
}
