//! I/O error types.

use thiserror::Error;

/// Result type for I/O operations.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error types.
#[derive(Error, Debug)]
pub enum Error {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV reading or writing error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Unexpected file layout.
    #[error("invalid file format: {0}")]
    InvalidFormat(String),

    /// A data line could not be parsed.
    #[error("line {line}: {message}")]
    ParseError { line: u64, message: String },

    /// Core library error.
    #[error("core error: {0}")]
    CoreError(#[from] stringfrag_core::Error),
}
