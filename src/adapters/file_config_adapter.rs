//! INI file configuration adapter.

use crate::domain::error::WrbarsError;
use crate::ports::config_port::ConfigPort;
use configparser::ini::Ini;
use std::path::Path;

#[derive(Debug)]
pub struct FileConfigAdapter {
    config: Ini,
}

impl FileConfigAdapter {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, WrbarsError> {
        let path = path.as_ref();
        let mut config = Ini::new();
        config.load(path).map_err(|reason| WrbarsError::ConfigParse {
            file: path.display().to_string(),
            reason,
        })?;
        Ok(Self { config })
    }

    pub fn from_string(content: &str) -> Result<Self, WrbarsError> {
        let mut config = Ini::new();
        config
            .read(content.to_string())
            .map_err(|reason| WrbarsError::ConfigParse {
                file: "<string>".to_string(),
                reason,
            })?;
        Ok(Self { config })
    }

    /// An adapter with no sections; every lookup falls back to its default.
    pub fn empty() -> Self {
        Self { config: Ini::new() }
    }

    fn parse_bool(value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Some(true),
            "false" | "no" | "off" | "0" => Some(false),
            _ => None,
        }
    }
}

impl ConfigPort for FileConfigAdapter {
    fn get_string(&self, section: &str, key: &str) -> Option<String> {
        self.config.get(section, key)
    }

    fn get_bool(&self, section: &str, key: &str, default: bool) -> bool {
        self.config
            .get(section, key)
            .as_deref()
            .and_then(Self::parse_bool)
            .unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FULL: &str = r#"
[columns]
time = date
close = adj_close

[renko]
brick_size = 2.5
adaptive = false
period = 10

[range_bar]
range_size = 3
tie_break = low
"#;

    #[test]
    fn from_string_parses_sections() {
        let adapter = FileConfigAdapter::from_string(FULL).unwrap();
        assert_eq!(adapter.get_string("columns", "time"), Some("date".to_string()));
        assert_eq!(adapter.get_string("range_bar", "tie_break"), Some("low".to_string()));
    }

    #[test]
    fn get_string_returns_none_for_missing_key() {
        let adapter = FileConfigAdapter::from_string(FULL).unwrap();
        assert_eq!(adapter.get_string("renko", "missing"), None);
        assert_eq!(adapter.get_string("missing_section", "key"), None);
    }

    #[test]
    fn get_bool_accepts_common_spellings() {
        let adapter =
            FileConfigAdapter::from_string("[renko]\na = true\nb = Yes\nc = on\nd = 0\ne = no\n").unwrap();
        assert!(adapter.get_bool("renko", "a", false));
        assert!(adapter.get_bool("renko", "b", false));
        assert!(adapter.get_bool("renko", "c", false));
        assert!(!adapter.get_bool("renko", "d", true));
        assert!(!adapter.get_bool("renko", "e", true));
    }

    #[test]
    fn get_bool_returns_default_for_missing_or_garbage() {
        let adapter = FileConfigAdapter::from_string("[renko]\nadaptive = maybe\n").unwrap();
        assert!(adapter.get_bool("renko", "adaptive", true));
        assert!(!adapter.get_bool("renko", "missing", false));
    }

    #[test]
    fn empty_adapter_has_no_keys() {
        let adapter = FileConfigAdapter::empty();
        assert_eq!(adapter.get_string("renko", "brick_size"), None);
        assert!(!adapter.get_bool("renko", "adaptive", false));
    }

    #[test]
    fn from_file_reads_config() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", FULL).unwrap();
        let adapter = FileConfigAdapter::from_file(file.path()).unwrap();
        assert_eq!(adapter.get_string("renko", "brick_size"), Some("2.5".to_string()));
    }

    #[test]
    fn from_file_missing_is_config_parse_error() {
        let err = FileConfigAdapter::from_file("/nonexistent/path/wrbars.ini").unwrap_err();
        assert!(matches!(err, WrbarsError::ConfigParse { ref file, .. } if file.contains("wrbars.ini")));
    }

    #[test]
    fn loaded_adapter_debug_output() {
        let result = FileConfigAdapter::from_string("[renko]\nbrick_size = 2\n");
        let text = format!("{:?}", result);
        assert!(text.starts_with("Ok(FileConfigAdapter"));
    }
}
