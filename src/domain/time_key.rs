//! Opaque ordered time keys for input and output bars.
//!
//! The engine never interprets calendar semantics; a key only has to order and
//! to print back the way it was read.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimeKey {
    /// Epoch seconds or an ordinal index.
    Index(i64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl FromStr for TimeKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(i) = s.parse::<i64>() {
            return Ok(TimeKey::Index(i));
        }
        if let Ok(d) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
            return Ok(TimeKey::Date(d));
        }
        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(TimeKey::DateTime(dt));
            }
        }
        Err(format!(
            "unrecognised time value '{}', expected integer, YYYY-MM-DD or YYYY-MM-DD HH:MM:SS",
            s
        ))
    }
}

impl fmt::Display for TimeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimeKey::Index(i) => write!(f, "{}", i),
            TimeKey::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            TimeKey::DateTime(dt) => write!(f, "{}", dt.format(DATETIME_FORMATS[0])),
        }
    }
}

/// Integers serialize as numbers, calendar keys as strings.
impl Serialize for TimeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TimeKey::Index(i) => serializer.serialize_i64(*i),
            other => serializer.collect_str(other),
        }
    }
}

impl From<i64> for TimeKey {
    fn from(i: i64) -> Self {
        TimeKey::Index(i)
    }
}
