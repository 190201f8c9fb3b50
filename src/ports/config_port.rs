//! Configuration access port trait.
//!
//! Lookups are by INI-style `[section] key`. `get_bool` falls back to
//! `default` when the key is missing or does not parse; numeric keys are read
//! as strings so that missing and malformed values can be reported apart.

pub trait ConfigPort {
    fn get_string(&self, section: &str, key: &str) -> Option<String>;
    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool;
}
