//! Renko reconstruction.
//!
//! Anchor starts at round(C[0] / b) * b (ties to even). Each close that moves at
//! least one brick from the anchor emits floor(|diff| / b) bricks in the
//! direction of the move, all stamped with that close's time. Changing
//! direction costs one brick: a single-brick opposite move emits nothing.
//! A series that never forms a brick yields one synthetic summary bar.

use crate::domain::bar::Bar;
use crate::domain::error::WrbarsError;
use crate::domain::series::PriceSeries;
use crate::domain::volatility::{adaptive_brick_size, DEFAULT_ATR_PERIOD};

/// Largest price span, in bricks, a series may cover.
pub const MAX_BRICK_SPAN: f64 = 10_000_000.0;

/// How the brick height is chosen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BrickSizing {
    Fixed(f64),
    /// Mean rolling ATR over `period` bars, see [`adaptive_brick_size`].
    Adaptive { period: usize },
}

impl BrickSizing {
    pub fn adaptive() -> Self {
        BrickSizing::Adaptive {
            period: DEFAULT_ATR_PERIOD,
        }
    }

    /// Rejects a non-positive fixed size or a zero period.
    pub fn validate(&self) -> Result<(), WrbarsError> {
        match *self {
            BrickSizing::Fixed(size) => validate_brick_size(size),
            BrickSizing::Adaptive { period: 0 } => {
                Err(WrbarsError::invalid_parameter("period", "must be at least 1"))
            }
            BrickSizing::Adaptive { .. } => Ok(()),
        }
    }

    /// Resolves the brick height for `series`.
    pub fn resolve<T>(&self, series: &PriceSeries<T>) -> Result<f64, WrbarsError> {
        self.validate()?;
        match *self {
            BrickSizing::Fixed(size) => Ok(size),
            BrickSizing::Adaptive { period } => {
                adaptive_brick_size(series.high(), series.low(), series.close(), period)
            }
        }
    }
}

fn validate_brick_size(size: f64) -> Result<(), WrbarsError> {
    if !(size.is_finite() && size > 0.0) {
        return Err(WrbarsError::invalid_parameter(
            "brick_size",
            format!("must be a positive number, got {}", size),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    fn of(diff: f64) -> Self {
        if diff > 0.0 {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    fn sign(self) -> f64 {
        match self {
            Direction::Up => 1.0,
            Direction::Down => -1.0,
        }
    }
}

struct RenkoState {
    brick_size: f64,
    anchor: f64,
    direction: Option<Direction>,
}

impl RenkoState {
    fn new(first_close: f64, brick_size: f64) -> Self {
        Self {
            brick_size,
            anchor: (first_close / brick_size).round_ties_even() * brick_size,
            direction: None,
        }
    }

    /// Bricks completed by a close at `time`, pushed onto `out`.
    fn step<T: Clone>(&mut self, time: &T, close: f64, out: &mut Vec<Bar<T>>) {
        let diff = close - self.anchor;
        if diff.abs() < self.brick_size {
            return;
        }

        let mut count = (diff.abs() / self.brick_size).floor() as usize;
        let direction = Direction::of(diff);

        if self.direction.is_some_and(|d| d != direction) {
            if count < 2 {
                return;
            }
            count -= 1;
        }

        for _ in 0..count {
            let open = self.anchor;
            let close = open + direction.sign() * self.brick_size;
            out.push(Bar::new(time.clone(), open, open.max(close), open.min(close), close));
            self.anchor = close;
            self.direction = Some(direction);
        }
    }
}

/// Builds Renko bricks from aligned `time` and `close` columns.
pub fn renko_bricks<T: Clone>(
    time: &[T],
    close: &[f64],
    brick_size: f64,
) -> Result<Vec<Bar<T>>, WrbarsError> {
    validate_brick_size(brick_size)?;
    if time.len() != close.len() {
        return Err(WrbarsError::ColumnLengthMismatch {
            column: "close".into(),
            expected: time.len(),
            actual: close.len(),
        });
    }
    if close.is_empty() {
        return Ok(Vec::new());
    }

    let high = close.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let low = close.iter().copied().fold(f64::INFINITY, f64::min);
    if (high - low) / brick_size > MAX_BRICK_SPAN {
        return Err(WrbarsError::invalid_parameter(
            "brick_size",
            format!(
                "{} is too small for a price span of {}, at most {} bricks allowed",
                brick_size,
                high - low,
                MAX_BRICK_SPAN
            ),
        ));
    }

    let mut state = RenkoState::new(close[0], brick_size);
    let mut bricks = Vec::new();
    for (t, &c) in time.iter().zip(close) {
        state.step(t, c, &mut bricks);
    }

    if bricks.is_empty() {
        let last = close[close.len() - 1];
        bricks.push(Bar::new(time[0].clone(), close[0], high, low, last));
        tracing::debug!(brick_size, bars = close.len(), "no brick formed, emitting summary bar");
    } else {
        tracing::debug!(brick_size, bars = close.len(), bricks = bricks.len(), "renko complete");
    }

    Ok(bricks)
}

/// Reconstructs `series` as Renko bricks.
pub fn to_renko<T: Clone>(
    series: &PriceSeries<T>,
    sizing: BrickSizing,
) -> Result<PriceSeries<T>, WrbarsError> {
    let brick_size = sizing.resolve(series)?;
    let bricks = renko_bricks(series.time(), series.close(), brick_size)?;
    Ok(bricks.into_iter().collect())
}
