//! Error types for pathdig configuration and input parsing.
//!
//! Path resolution itself never fails: a missing key resolves to the
//! caller's default. These errors cover misconfiguration only.

use thiserror::Error;

/// Errors raised while building resolvers and filters, or parsing input.
#[derive(Error, Debug)]
pub enum PathError {
    /// The input string was not valid JSON.
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// A comparison tag outside `=`, `!=`, `>`, `>=`, `<`, `<=`.
    #[error("Unknown comparison operator: '{0}'")]
    UnknownComparison(String),

    /// Path separators must be at least one character long.
    #[error("Path separator must not be empty")]
    EmptySeparator,

    /// A filter expression lacking an operator or a path.
    #[error("Invalid filter expression '{expr}': {message}")]
    InvalidFilter { expr: String, message: String },
}

/// Convenience alias used throughout pathdig-core.
pub type Result<T> = std::result::Result<T, PathError>;
