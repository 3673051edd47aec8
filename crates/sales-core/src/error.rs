use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the game sales analysis.
#[derive(Error, Debug)]
pub enum SalesError {
    /// The input file could not be opened or read from disk.
    #[error("Failed to read file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The header row lacks one or more required columns.
    #[error("Missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A row could not be read as CSV.
    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    /// A cell held a value that does not fit its column type.
    #[error("Invalid value {value:?} in column {column} at row {row}: {reason}")]
    InvalidField {
        /// 1-based data row number (the header is row 0).
        row: usize,
        column: String,
        value: String,
        reason: String,
    },

    /// A report could not be serialized to JSON.
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An error originating from the terminal / TUI layer.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SalesError {
    /// Build an [`SalesError::InvalidField`] for `column` at data row `row`.
    pub fn invalid_field(
        row: usize,
        column: &str,
        value: &str,
        reason: impl Into<String>,
    ) -> Self {
        SalesError::InvalidField {
            row,
            column: column.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    /// `true` for errors raised while reading or typing the input data.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            SalesError::MissingColumns(_) | SalesError::Csv(_) | SalesError::InvalidField { .. }
        )
    }
}

/// Convenience alias used throughout the sales crates.
pub type Result<T> = std::result::Result<T, SalesError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_access() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = SalesError::FileAccess {
            path: PathBuf::from("/datasets/games.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/datasets/games.csv"));
        assert!(msg.contains("no such file"));
        assert!(!err.is_parse_error());
    }

    #[test]
    fn test_error_display_missing_columns() {
        let err = SalesError::MissingColumns(vec!["platform".to_string(), "genre".to_string()]);
        assert_eq!(err.to_string(), "Missing required columns: platform, genre");
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_error_display_invalid_field() {
        let err = SalesError::invalid_field(12, "user_score", "abc", "not a number");
        assert_eq!(
            err.to_string(),
            "Invalid value \"abc\" in column user_score at row 12: not a number"
        );
        assert!(err.is_parse_error());
    }

    #[test]
    fn test_error_display_terminal() {
        let err = SalesError::Terminal("crossterm failure".to_string());
        assert_eq!(err.to_string(), "Terminal error: crossterm failure");
    }

    #[test]
    fn test_error_display_config() {
        let err = SalesError::Config("--top must be at least 1".to_string());
        assert_eq!(err.to_string(), "Configuration error: --top must be at least 1");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SalesError = io_err.into();
        assert!(err.to_string().contains("denied"));
        assert!(!err.is_parse_error());
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: SalesError = json_err.into();
        assert!(err.to_string().contains("Failed to serialize JSON"));
    }
}
