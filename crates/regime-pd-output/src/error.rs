//! Error types for reporting.

use thiserror::Error;

/// Errors raised while summarising or plotting.
#[derive(Debug, Error)]
pub enum OutputError {
    /// Input slices disagree in length
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected length
        expected: usize,
        /// Actual length
        actual: usize,
    },

    /// Nothing to summarise or plot
    #[error("Empty input: {0}")]
    Empty(String),

    /// Samples too degenerate for density estimation
    #[error("Degenerate sample: {0}")]
    Degenerate(String),

    /// Drawing backend failure
    #[error("Plotting error: {0}")]
    Plot(String),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for reporting operations.
pub type Result<T> = std::result::Result<T, OutputError>;

pub(crate) fn check_len(expected: usize, actual: usize) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(OutputError::DimensionMismatch { expected, actual })
    }
}
