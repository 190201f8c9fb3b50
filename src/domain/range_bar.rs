//! Range-bar reconstruction.
//!
//! The first bar opens at the midpoint of the first input bar. The running
//! high/low grows with every input; whenever it spans `range_size` a bar of
//! exactly that height is closed at the extreme that broke away from the open,
//! and the next bar opens there. After each close the accumulator is rebuilt
//! from the new open and the current input's high/low only.
//!
//! One input point closes at most one bar per side. Any excursion left over
//! after that carries into the next point.

use crate::domain::bar::Bar;
use crate::domain::error::WrbarsError;
use crate::domain::series::PriceSeries;

/// Which way to close a bar whose range is reached without either extreme
/// being a full `range_size` away from the open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TieBreak {
    /// Close at the high, like a bullish bar.
    #[default]
    High,
    /// Close at the low, like a bearish bar.
    Low,
}

impl std::str::FromStr for TieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" | "up" => Ok(TieBreak::High),
            "low" | "down" => Ok(TieBreak::Low),
            other => Err(format!("expected high or low, got '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeBarConfig {
    pub range_size: f64,
    pub tie_break: TieBreak,
}

impl RangeBarConfig {
    pub fn new(range_size: f64) -> Self {
        Self {
            range_size,
            tie_break: TieBreak::default(),
        }
    }

    pub fn with_tie_break(self, tie_break: TieBreak) -> Self {
        Self { tie_break, ..self }
    }

    pub fn validate(&self) -> Result<(), WrbarsError> {
        if !(self.range_size.is_finite() && self.range_size > 0.0) {
            return Err(WrbarsError::invalid_parameter(
                "range_size",
                format!("must be a positive number, got {}", self.range_size),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Up,
    Down,
}

struct RangeBarState<T> {
    open: f64,
    high: f64,
    low: f64,
    start: T,
}

impl<T: Clone> RangeBarState<T> {
    fn seed(time: &T, high: f64, low: f64) -> Self {
        let open = (high + low) / 2.0;
        Self {
            open,
            high: open,
            low: open,
            start: time.clone(),
        }
    }

    fn side(&self, config: &RangeBarConfig) -> Side {
        if self.high - self.open >= config.range_size {
            Side::Up
        } else if self.open - self.low >= config.range_size {
            Side::Down
        } else {
            match config.tie_break {
                TieBreak::High => Side::Up,
                TieBreak::Low => Side::Down,
            }
        }
    }

    fn close_bar(&mut self, side: Side, time: &T, range: f64) -> Bar<T> {
        let bar = match side {
            Side::Up => {
                let bar = Bar::new(self.start.clone(), self.open, self.high, self.high - range, self.high);
                self.open = self.high;
                self.low = self.high;
                bar
            }
            Side::Down => {
                let bar = Bar::new(self.start.clone(), self.open, self.low + range, self.low, self.low);
                self.open = self.low;
                self.high = self.low;
                bar
            }
        };
        self.start = time.clone();
        bar
    }

    fn step(&mut self, time: &T, high: f64, low: f64, config: &RangeBarConfig, out: &mut Vec<Bar<T>>) {
        self.high = self.high.max(high);
        self.low = self.low.min(low);

        let mut closed_up = false;
        let mut closed_down = false;
        while self.high - self.low >= config.range_size {
            let side = self.side(config);
            let closed = match side {
                Side::Up => &mut closed_up,
                Side::Down => &mut closed_down,
            };
            if *closed {
                break;
            }
            *closed = true;

            out.push(self.close_bar(side, time, config.range_size));

            self.high = self.open.max(high);
            self.low = self.open.min(low);
        }
    }

    fn partial(&self) -> Bar<T> {
        Bar::new(
            self.start.clone(),
            self.open,
            self.high,
            self.low,
            (self.high + self.low) / 2.0,
        )
    }
}

/// Builds range bars from aligned `time`, `high` and `low` columns.
pub fn range_bars<T: Clone>(
    time: &[T],
    high: &[f64],
    low: &[f64],
    config: &RangeBarConfig,
) -> Result<Vec<Bar<T>>, WrbarsError> {
    config.validate()?;
    for (column, len) in [("high", high.len()), ("low", low.len())] {
        if len != time.len() {
            return Err(WrbarsError::ColumnLengthMismatch {
                column: column.into(),
                expected: time.len(),
                actual: len,
            });
        }
    }
    if time.is_empty() {
        return Ok(Vec::new());
    }

    let mut state = RangeBarState::seed(&time[0], high[0], low[0]);
    let mut bars = Vec::new();
    for ((t, &h), &l) in time.iter().zip(high).zip(low) {
        state.step(t, h, l, config, &mut bars);
    }

    if state.high > state.low {
        bars.push(state.partial());
    }

    if bars.is_empty() {
        let mut bar = state.partial();
        bar.time = time[0].clone();
        bars.push(bar);
    }

    tracing::debug!(
        range_size = config.range_size,
        tie_break = ?config.tie_break,
        bars = time.len(),
        range_bars = bars.len(),
        "range bars complete"
    );
    Ok(bars)
}

/// Reconstructs `series` as range bars. Only high and low drive formation.
pub fn to_range_bars<T: Clone>(
    series: &PriceSeries<T>,
    config: &RangeBarConfig,
) -> Result<PriceSeries<T>, WrbarsError> {
    let bars = range_bars(series.time(), series.high(), series.low(), config)?;
    Ok(bars.into_iter().collect())
}
