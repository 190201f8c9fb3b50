//! Core domain types and the bar-reconstruction engine.

pub mod bar;
pub mod time_key;
pub mod series;
pub mod volatility;
pub mod renko;
pub mod range_bar;
pub mod transform;
pub mod config_validation;
pub mod error;
