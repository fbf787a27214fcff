use std::path::PathBuf;
use thiserror::Error;

/// All errors produced by the sunburst pipeline.
#[derive(Error, Debug)]
pub enum SunburstError {
    /// A dataset file could not be opened or read from disk.
    #[error("Failed to read dataset {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV record or header could not be parsed.
    #[error("Failed to parse CSV: {0}")]
    CsvParse(#[from] csv::Error),

    /// A JSON document (configuration or raw rows) could not be parsed.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The expected data directory does not exist.
    #[error("Data path not found: {0}")]
    DataPathNotFound(PathBuf),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Convenience alias used throughout the sunburst crates.
pub type Result<T> = std::result::Result<T, SunburstError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = SunburstError::FileRead {
            path: PathBuf::from("/data/movies.csv"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read dataset"));
        assert!(msg.contains("/data/movies.csv"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_config() {
        let err = SunburstError::Config("value_fields.hours is empty".to_string());
        let msg = err.to_string();
        assert_eq!(msg, "Configuration error: value_fields.hours is empty");
    }

    #[test]
    fn test_error_display_data_path_not_found() {
        let err = SunburstError::DataPathNotFound(PathBuf::from("/missing/dir"));
        let msg = err.to_string();
        assert_eq!(msg, "Data path not found: /missing/dir");
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: SunburstError = io_err.into();
        let msg = err.to_string();
        assert!(msg.contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: SunburstError = json_err.into();
        let msg = err.to_string();
        assert!(msg.contains("Failed to parse JSON"));
    }
}
