//! Error types for the analysis core

use thiserror::Error;

/// Errors raised by configuration loading and analysis
///
/// Token-level problems (malformed records, unlocatable surfaces) are never
/// reported here; they degrade in place and processing continues.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Input that cannot be analyzed at all
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The decision source could not produce a verdict
    #[error("Decision source error: {0}")]
    DecisionSource(String),

    /// Thread pool construction or parallel execution failure
    #[error("Parallel processing failed: {0}")]
    ParallelError(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_error_display() {
        let error = Error::Configuration("window must be greater than 0".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: window must be greater than 0"
        );
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "stdin closed");
        let error: Error = io.into();
        assert!(matches!(error, Error::Io(_)));
        assert!(error.to_string().contains("stdin closed"));
    }

    #[test]
    fn test_json_error_conversion() {
        let parse = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: Error = parse.into();
        assert!(error.to_string().starts_with("JSON error:"));
    }
}
