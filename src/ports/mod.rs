//! Port traits at the edges of the engine.

pub mod config_port;
pub mod series_sink;
pub mod series_source;
