//! Domain error types.

/// Top-level error type for wrbars.
#[derive(Debug, thiserror::Error)]
pub enum WrbarsError {
    #[error("invalid parameter {name}: {reason}")]
    InvalidParameter { name: String, reason: String },

    #[error("column {column} has {actual} values, expected {expected}")]
    ColumnLengthMismatch {
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("missing column {column}")]
    MissingColumn { column: String },

    #[error("input series is empty")]
    EmptySeries,

    #[error("invalid value in column {column} at row {row}: {reason}")]
    InvalidValue {
        column: String,
        row: usize,
        reason: String,
    },

    #[error("config parse error in {file}: {reason}")]
    ConfigParse { file: String, reason: String },

    #[error("missing config key [{section}] {key}")]
    ConfigMissing { section: String, key: String },

    #[error("invalid config value [{section}] {key}: {reason}")]
    ConfigInvalid {
        section: String,
        key: String,
        reason: String,
    },

    #[error("data error: {reason}")]
    Data { reason: String },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl WrbarsError {
    pub fn invalid_parameter(name: &str, reason: impl Into<String>) -> Self {
        WrbarsError::InvalidParameter {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<&WrbarsError> for std::process::ExitCode {
    fn from(err: &WrbarsError) -> Self {
        let code: u8 = match err {
            WrbarsError::Io(_) => 1,
            WrbarsError::ConfigParse { .. }
            | WrbarsError::ConfigMissing { .. }
            | WrbarsError::ConfigInvalid { .. } => 2,
            WrbarsError::InvalidParameter { .. } => 3,
            WrbarsError::ColumnLengthMismatch { .. }
            | WrbarsError::MissingColumn { .. }
            | WrbarsError::EmptySeries
            | WrbarsError::InvalidValue { .. }
            | WrbarsError::Data { .. } => 4,
        };
        std::process::ExitCode::from(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_parameter_message() {
        let err = WrbarsError::invalid_parameter("brick_size", "must be positive");
        assert_eq!(err.to_string(), "invalid parameter brick_size: must be positive");
    }

    #[test]
    fn length_mismatch_message() {
        let err = WrbarsError::ColumnLengthMismatch {
            column: "high".into(),
            expected: 5,
            actual: 4,
        };
        assert_eq!(err.to_string(), "column high has 4 values, expected 5");
    }

    #[test]
    fn config_invalid_message() {
        let err = WrbarsError::ConfigInvalid {
            section: "range_bar".into(),
            key: "tie_break".into(),
            reason: "expected high or low".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid config value [range_bar] tie_break: expected high or low"
        );
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: WrbarsError = io.into();
        assert!(matches!(err, WrbarsError::Io(_)));
    }
}
