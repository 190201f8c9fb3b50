//! Aligned column view over an ordered price series.
//!
//! `PriceSeries` is both the input and output shape of every reconstruction:
//! equal-length `time`, `high`, `low`, `close` columns plus optional `open` and
//! `volume`. Time order is assumed, never re-validated.
//!
//! [`ColumnMap::extract`] turns a header + string-row dataset into a series and
//! is the only place emptiness is rejected.

use crate::domain::bar::Bar;
use crate::domain::error::WrbarsError;
use crate::domain::time_key::TimeKey;

#[derive(Debug, Clone, PartialEq)]
pub struct PriceSeries<T> {
    time: Vec<T>,
    open: Option<Vec<f64>>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Option<Vec<f64>>,
}

fn check_len(column: &str, expected: usize, actual: usize) -> Result<(), WrbarsError> {
    if expected != actual {
        return Err(WrbarsError::ColumnLengthMismatch {
            column: column.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

impl<T> PriceSeries<T> {
    pub fn empty() -> Self {
        Self {
            time: Vec::new(),
            open: None,
            high: Vec::new(),
            low: Vec::new(),
            close: Vec::new(),
            volume: None,
        }
    }

    pub fn from_columns(
        time: Vec<T>,
        high: Vec<f64>,
        low: Vec<f64>,
        close: Vec<f64>,
    ) -> Result<Self, WrbarsError> {
        let n = time.len();
        check_len("high", n, high.len())?;
        check_len("low", n, low.len())?;
        check_len("close", n, close.len())?;
        Ok(Self {
            time,
            open: None,
            high,
            low,
            close,
            volume: None,
        })
    }

    /// Close-only series; high and low mirror close.
    pub fn from_closes(time: Vec<T>, close: Vec<f64>) -> Result<Self, WrbarsError> {
        check_len("close", time.len(), close.len())?;
        let high = close.clone();
        let low = close.clone();
        Self::from_columns(time, high, low, close)
    }

    pub fn with_open(mut self, open: Vec<f64>) -> Result<Self, WrbarsError> {
        check_len("open", self.len(), open.len())?;
        self.open = Some(open);
        Ok(self)
    }

    pub fn with_volume(mut self, volume: Vec<f64>) -> Result<Self, WrbarsError> {
        check_len("volume", self.len(), volume.len())?;
        self.volume = Some(volume);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.time.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    pub fn time(&self) -> &[T] {
        &self.time
    }

    pub fn open(&self) -> Option<&[f64]> {
        self.open.as_deref()
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn close(&self) -> &[f64] {
        &self.close
    }

    pub fn volume(&self) -> Option<&[f64]> {
        self.volume.as_deref()
    }
}

impl<T: Clone> PriceSeries<T> {
    /// Bar at `i`; a missing open column falls back to the close.
    pub fn bar(&self, i: usize) -> Option<Bar<T>> {
        let time = self.time.get(i)?.clone();
        Some(Bar {
            time,
            open: self.open.as_ref().map_or(self.close[i], |o| o[i]),
            high: self.high[i],
            low: self.low[i],
            close: self.close[i],
            volume: self.volume.as_ref().map(|v| v[i]),
        })
    }

    pub fn bars(&self) -> impl Iterator<Item = Bar<T>> + '_ {
        (0..self.len()).filter_map(move |i| self.bar(i))
    }

    pub fn to_bars(&self) -> Vec<Bar<T>> {
        self.bars().collect()
    }
}

impl<T> FromIterator<Bar<T>> for PriceSeries<T> {
    /// Collects bars into columns. Volume is kept only if every bar has one.
    fn from_iter<I: IntoIterator<Item = Bar<T>>>(iter: I) -> Self {
        let mut series = PriceSeries::empty();
        let mut open = Vec::new();
        let mut volume = Vec::new();
        let mut all_volume = true;
        for bar in iter {
            series.time.push(bar.time);
            open.push(bar.open);
            series.high.push(bar.high);
            series.low.push(bar.low);
            series.close.push(bar.close);
            match bar.volume {
                Some(v) if all_volume => volume.push(v),
                _ => all_volume = false,
            }
        }
        series.open = Some(open);
        if all_volume && !series.time.is_empty() {
            series.volume = Some(volume);
        }
        series
    }
}

/// Names of the columns to pull out of a tabular dataset.
///
/// `open` and `volume` are optional: they are read only when the dataset has a
/// header of that name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    pub time: String,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub volume: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            time: "time".into(),
            open: "open".into(),
            high: "high".into(),
            low: "low".into(),
            close: "close".into(),
            volume: "volume".into(),
        }
    }
}

impl ColumnMap {
    fn index_of(headers: &[String], name: &str) -> Option<usize> {
        headers.iter().position(|h| h.trim() == name)
    }

    fn required(headers: &[String], name: &str) -> Result<usize, WrbarsError> {
        Self::index_of(headers, name).ok_or_else(|| WrbarsError::MissingColumn {
            column: name.to_string(),
        })
    }

    /// Extracts an aligned series from `headers` and string `rows`.
    ///
    /// Rejects an empty dataset, missing required columns, ragged rows and
    /// unparsable or non-finite values.
    pub fn extract(
        &self,
        headers: &[String],
        rows: &[Vec<String>],
    ) -> Result<PriceSeries<TimeKey>, WrbarsError> {
        let time_idx = Self::required(headers, &self.time)?;
        let high_idx = Self::required(headers, &self.high)?;
        let low_idx = Self::required(headers, &self.low)?;
        let close_idx = Self::required(headers, &self.close)?;
        let open_idx = Self::index_of(headers, &self.open);
        let volume_idx = Self::index_of(headers, &self.volume);

        if rows.is_empty() {
            return Err(WrbarsError::EmptySeries);
        }

        let mut time = Vec::with_capacity(rows.len());
        let mut high = Vec::with_capacity(rows.len());
        let mut low = Vec::with_capacity(rows.len());
        let mut close = Vec::with_capacity(rows.len());
        let mut open = open_idx.map(|_| Vec::with_capacity(rows.len()));
        let mut volume = volume_idx.map(|_| Vec::with_capacity(rows.len()));

        for (row_no, row) in rows.iter().enumerate() {
            let t = cell(row, time_idx, &self.time, row_no)?
                .parse::<TimeKey>()
                .map_err(|reason| WrbarsError::InvalidValue {
                    column: self.time.clone(),
                    row: row_no,
                    reason,
                })?;
            time.push(t);
            high.push(parse_price(cell(row, high_idx, &self.high, row_no)?, &self.high, row_no)?);
            low.push(parse_price(cell(row, low_idx, &self.low, row_no)?, &self.low, row_no)?);
            close.push(parse_price(cell(row, close_idx, &self.close, row_no)?, &self.close, row_no)?);
            if let (Some(idx), Some(col)) = (open_idx, open.as_mut()) {
                col.push(parse_price(cell(row, idx, &self.open, row_no)?, &self.open, row_no)?);
            }
            if let (Some(idx), Some(col)) = (volume_idx, volume.as_mut()) {
                col.push(parse_price(cell(row, idx, &self.volume, row_no)?, &self.volume, row_no)?);
            }
        }

        let mut series = PriceSeries::from_columns(time, high, low, close)?;
        if let Some(open) = open {
            series = series.with_open(open)?;
        }
        if let Some(volume) = volume {
            series = series.with_volume(volume)?;
        }
        Ok(series)
    }
}

fn cell<'a>(row: &'a [String], idx: usize, column: &str, row_no: usize) -> Result<&'a str, WrbarsError> {
    row.get(idx)
        .map(String::as_str)
        .ok_or_else(|| WrbarsError::InvalidValue {
            column: column.to_string(),
            row: row_no,
            reason: "row is too short".into(),
        })
}

fn parse_price(raw: &str, column: &str, row: usize) -> Result<f64, WrbarsError> {
    let value: f64 = raw.trim().parse().map_err(|e| WrbarsError::InvalidValue {
        column: column.to_string(),
        row,
        reason: format!("{}", e),
    })?;
    if !value.is_finite() {
        return Err(WrbarsError::InvalidValue {
            column: column.to_string(),
            row,
            reason: "value is not finite".into(),
        });
    }
    Ok(value)
}
