//! Error types for the data-loader crate.
//!
//! Every variant carries enough context (file path, offending id) to be
//! reported to an operator without a backtrace.

use thiserror::Error;

/// Errors that can occur while loading the movie catalog
#[derive(Error, Debug)]
pub enum DataLoadError {
    /// File could not be found or opened
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// The catalog file is not a JSON array of movie records
    ///
    /// `line` and `column` come straight from serde_json so the operator can
    /// jump to the broken record.
    #[error("Parse error at line {line}, column {column} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        column: usize,
        reason: String,
    },

    /// Two records share the same identifier
    #[error("Duplicate movie id {id} in {file}")]
    DuplicateId { file: String, id: u32 },

    /// Data validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, DataLoadError>;
