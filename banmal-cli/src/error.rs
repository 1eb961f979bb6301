//! Error handling for the CLI application

use std::fmt;

/// CLI-specific failures
#[derive(Debug)]
pub enum CliError {
    /// File not found or inaccessible
    FileNotFound(String),
    /// Invalid file pattern
    InvalidPattern(String),
    /// Configuration error
    ConfigError(String),
    /// Input record that is not a valid document
    InvalidRecord { path: String, line: usize, message: String },
    /// Processing error from core
    ProcessingError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::FileNotFound(path) => write!(f, "File not found: {path}"),
            CliError::InvalidPattern(pattern) => write!(f, "Invalid file pattern: {pattern}"),
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
            CliError::InvalidRecord {
                path,
                line,
                message,
            } => write!(f, "Invalid record at {path}:{line}: {message}"),
            CliError::ProcessingError(msg) => write!(f, "Processing error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

impl From<banmal_core::Error> for CliError {
    fn from(error: banmal_core::Error) -> Self {
        match error {
            banmal_core::Error::Configuration(msg) => CliError::ConfigError(msg),
            other => CliError::ProcessingError(other.to_string()),
        }
    }
}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;
