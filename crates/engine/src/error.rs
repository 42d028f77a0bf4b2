//! Error types for the validation engine

use thiserror::Error;

/// Result type alias using the engine [`Error`]
pub type Result<T> = std::result::Result<T, Error>;

/// Engine error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Memory key '{0}' is not registered")]
    Lookup(String),

    #[error("'{0}' condition is not implemented")]
    UnrecognizedCondition(String),

    #[error("'{0}' validation is not implemented")]
    UnrecognizedValidation(String),

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("Invalid match pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Expected '{actual}' {phrase} '{expected}'")]
    Assertion {
        phrase: String,
        expected: String,
        actual: String,
    },

    #[error(
        "Timed out after {timeout_ms} ms waiting for '{phrase}': expected '{expected}', last actual '{actual}'"
    )]
    PollTimeout {
        phrase: String,
        timeout_ms: u64,
        expected: String,
        actual: String,
    },

    #[error("{failed} soft assertion(s) failed:\n{report}")]
    SoftFailures { failed: usize, report: String },

    #[error("Driver error: {0}")]
    Driver(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
