//! Configuration validation.
//!
//! Builds reconstruction parameters from the `[columns]`, `[renko]` and
//! `[range_bar]` sections, rejecting bad values before any computation runs.

use crate::domain::error::WrbarsError;
use crate::domain::range_bar::{RangeBarConfig, TieBreak};
use crate::domain::renko::BrickSizing;
use crate::domain::series::ColumnMap;
use crate::domain::volatility::DEFAULT_ATR_PERIOD;
use crate::ports::config_port::ConfigPort;

/// Column names, each defaulting to its conventional lower-case name.
pub fn build_column_map(config: &dyn ConfigPort) -> ColumnMap {
    let defaults = ColumnMap::default();
    let get = |key: &str, default: String| {
        config
            .get_string("columns", key)
            .filter(|s| !s.trim().is_empty())
            .map(|s| s.trim().to_string())
            .unwrap_or(default)
    };
    ColumnMap {
        time: get("time", defaults.time),
        open: get("open", defaults.open),
        high: get("high", defaults.high),
        low: get("low", defaults.low),
        close: get("close", defaults.close),
        volume: get("volume", defaults.volume),
    }
}

/// `[renko] adaptive = true` selects ATR sizing with `period` (default 14);
/// otherwise `brick_size` is required.
pub fn build_brick_sizing(config: &dyn ConfigPort) -> Result<BrickSizing, WrbarsError> {
    if config.get_bool("renko", "adaptive", false) {
        let period = build_atr_period(config)?;
        return Ok(BrickSizing::Adaptive { period });
    }
    let size = parse_positive(config, "renko", "brick_size")?;
    Ok(BrickSizing::Fixed(size))
}

pub fn build_range_bar_config(config: &dyn ConfigPort) -> Result<RangeBarConfig, WrbarsError> {
    let range_size = parse_positive(config, "range_bar", "range_size")?;
    let tie_break = build_tie_break(config)?;
    Ok(RangeBarConfig {
        range_size,
        tie_break,
    })
}

/// `[range_bar] tie_break`, defaulting to [`TieBreak::High`].
pub fn build_tie_break(config: &dyn ConfigPort) -> Result<TieBreak, WrbarsError> {
    match config.get_string("range_bar", "tie_break") {
        None => Ok(TieBreak::default()),
        Some(s) => s.parse().map_err(|reason| WrbarsError::ConfigInvalid {
            section: "range_bar".to_string(),
            key: "tie_break".to_string(),
            reason,
        }),
    }
}

/// `[renko] period`, defaulting to 14.
pub fn build_atr_period(config: &dyn ConfigPort) -> Result<usize, WrbarsError> {
    let raw = match config.get_string("renko", "period") {
        None => return Ok(DEFAULT_ATR_PERIOD),
        Some(s) => s,
    };
    match raw.trim().parse::<i64>() {
        Ok(p) if p >= 1 => Ok(p as usize),
        _ => Err(WrbarsError::ConfigInvalid {
            section: "renko".to_string(),
            key: "period".to_string(),
            reason: "period must be a positive integer".to_string(),
        }),
    }
}

fn parse_positive(config: &dyn ConfigPort, section: &str, key: &str) -> Result<f64, WrbarsError> {
    let raw = config
        .get_string(section, key)
        .ok_or_else(|| WrbarsError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })?;
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v > 0.0 => Ok(v),
        _ => Err(WrbarsError::ConfigInvalid {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{} must be a positive number", key),
        }),
    }
}
