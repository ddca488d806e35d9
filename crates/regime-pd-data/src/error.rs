//! Error types for data operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading and preparing loan data.
#[derive(Debug, Error)]
pub enum DataError {
    /// Input file does not exist
    #[error("File not found: {}", path.display())]
    FileNotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// A required column could not be resolved from the raw headers
    #[error("No {missing} column found. Columns: {available:?}")]
    Schema {
        /// Logical name of the column that is missing
        missing: String,
        /// Column names actually present in the file
        available: Vec<String>,
    },

    /// Cell-level parsing error (dates, numbers)
    #[error("Data parsing error: {0}")]
    Parse(String),

    /// More than one macro observation for the same calendar month
    #[error("Duplicate macro observation for month {month}")]
    DuplicateMonth {
        /// Month in `YYYY-MM` form
        month: String,
    },

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),
}
