//! Error types for the jobdash library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for jobdash operations.
#[derive(Debug, Error)]
pub enum DashError {
    /// Error reading or accessing a file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Neither the primary nor the fallback encoding could decode the file.
    #[error("Could not decode '{path}' as {encoding}")]
    Decode { path: PathBuf, encoding: String },

    /// Empty file or no columns to load.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Spreadsheet credentials missing or unreadable.
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// The spreadsheet API rejected a request.
    #[error("Spreadsheet API error ({status}): {message}")]
    Sheets { status: u16, message: String },

    /// Transport-level HTTP failure.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing edits back to the source failed.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

/// Result type alias for jobdash operations.
pub type Result<T> = std::result::Result<T, DashError>;
