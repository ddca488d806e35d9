//! Error types for feature construction.

use regime_pd_data::DataError;
use thiserror::Error;

/// Errors raised while building feature matrices.
#[derive(Debug, Error)]
pub enum FeatureError {
    /// Column access or frame operation failed
    #[error(transparent)]
    Data(#[from] DataError),

    /// Matrix assembly failed
    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),

    /// Default target is missing on a row
    #[error("Missing default target on row {row}")]
    MissingTarget {
        /// Row index in the source frame
        row: usize,
    },

    /// Matrices or vectors disagree in size
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected size
        expected: usize,
        /// Actual size
        actual: usize,
    },
}

/// Result type for feature operations.
pub type Result<T> = std::result::Result<T, FeatureError>;
