//! Series-in, series-out transforms.
//!
//! Every reconstruction consumes an ordered [`PriceSeries`] and returns a new
//! one, so transforms can be chained.

use crate::domain::error::WrbarsError;
use crate::domain::range_bar::{to_range_bars, RangeBarConfig};
use crate::domain::renko::{to_renko, BrickSizing};
use crate::domain::series::PriceSeries;
use std::fmt;

pub trait BarTransform<T> {
    fn name(&self) -> String;

    fn apply(&self, series: &PriceSeries<T>) -> Result<PriceSeries<T>, WrbarsError>;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenkoTransform {
    pub sizing: BrickSizing,
}

impl<T: Clone> BarTransform<T> for RenkoTransform {
    fn name(&self) -> String {
        self.to_string()
    }

    fn apply(&self, series: &PriceSeries<T>) -> Result<PriceSeries<T>, WrbarsError> {
        to_renko(series, self.sizing)
    }
}

impl fmt::Display for RenkoTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.sizing {
            BrickSizing::Fixed(size) => write!(f, "RENKO({})", size),
            BrickSizing::Adaptive { period } => write!(f, "RENKO(ATR({}))", period),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeBarTransform {
    pub config: RangeBarConfig,
}

impl<T: Clone> BarTransform<T> for RangeBarTransform {
    fn name(&self) -> String {
        self.to_string()
    }

    fn apply(&self, series: &PriceSeries<T>) -> Result<PriceSeries<T>, WrbarsError> {
        to_range_bars(series, &self.config)
    }
}

impl fmt::Display for RangeBarTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RANGE({})", self.config.range_size)
    }
}

/// Runs `transforms` left to right, feeding each output into the next.
pub fn apply_chain<T>(
    series: &PriceSeries<T>,
    transforms: &[&dyn BarTransform<T>],
) -> Result<PriceSeries<T>, WrbarsError>
where
    T: Clone,
{
    let mut current = series.clone();
    for transform in transforms {
        let next = transform.apply(&current)?;
        tracing::debug!(
            transform = %transform.name(),
            input = current.len(),
            output = next.len(),
            "applied transform"
        );
        current = next;
    }
    Ok(current)
}
