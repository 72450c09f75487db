//! Error types for the policy tracker.

use thiserror::Error;

/// Input rejected before any statement is built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field or flag was missing or empty.
    #[error("{0} is required")]
    Required(&'static str),

    /// A numeric flag was zero or negative.
    #[error("{0} must be a positive integer")]
    NotPositive(&'static str),

    /// A date field was not a `YYYY-MM-DD` calendar date.
    #[error("{label} must be a date in YYYY-MM-DD form, got '{value}'")]
    InvalidDate { label: &'static str, value: String },
}

/// The main error type for policy tracker operations.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Input validation failed.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Connection error.
    #[error("Database connection failed: {0}")]
    Connection(String),

    /// Statement execution error.
    #[error("query failed: {0}")]
    Execution(String),

    /// A result column could not be decoded.
    #[error("Unexpected column value: {0}")]
    Decode(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The export file could not be created.
    #[error("Unable to open output file {}: {source}", path.display())]
    OutputFile {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for policy tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;
