//! wrbars — price-driven bar reconstruction (Renko bricks, range bars).
//!
//! Hexagonal architecture: domain logic in [`domain`], port traits in [`ports`],
//! concrete implementations in [`adapters`].

pub mod domain;
pub mod ports;
pub mod adapters;
pub mod cli;

pub use domain::bar::Bar;
pub use domain::error::WrbarsError;
pub use domain::range_bar::{range_bars, to_range_bars, RangeBarConfig, TieBreak};
pub use domain::renko::{renko_bricks, to_renko, BrickSizing};
pub use domain::series::{ColumnMap, PriceSeries};
pub use domain::time_key::TimeKey;
pub use domain::transform::{apply_chain, BarTransform, RangeBarTransform, RenkoTransform};
pub use domain::volatility::adaptive_brick_size;
