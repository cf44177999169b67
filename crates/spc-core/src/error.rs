//! Error types for statistical process control
//!
//! Provides a unified error type for all spc crates. Every variant is
//! recoverable: callers surface it to the user and keep running.

use serde::Serialize;
use thiserror::Error;

/// Core error type for chart analysis
#[derive(Error, Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum Error {
    /// The tabular parser reported a structural failure (ragged rows, bad quoting)
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Not enough valid numeric points for the requested chart
    #[error("Insufficient data: expected at least {expected} valid points, got {actual}")]
    InsufficientData { expected: usize, actual: usize },

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A selected column does not exist in the loaded table
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    /// Nothing has been loaded, or the loaded table is empty
    #[error("No data: {0}")]
    NoData(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

// Helper functions for common error patterns

impl Error {
    /// Create an error for a point count below a chart's minimum
    pub fn insufficient(expected: usize, actual: usize) -> Self {
        Self::InsufficientData { expected, actual }
    }

    /// Create an error for a column name missing from the table
    pub fn unknown_column(name: &str) -> Self {
        Self::UnknownColumn(format!("'{name}' is not a column of the loaded data"))
    }

    /// Create an error for empty input
    pub fn empty_input(context: &str) -> Self {
        Self::NoData(format!("{context} is empty"))
    }

    /// Short machine-readable name of the error kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedInput(_) => "malformed_input",
            Self::InsufficientData { .. } => "insufficient_data",
            Self::InvalidParameter(_) => "invalid_parameter",
            Self::UnknownColumn(_) => "unknown_column",
            Self::NoData(_) => "no_data",
        }
    }
}
