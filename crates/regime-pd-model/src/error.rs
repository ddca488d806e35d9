//! Error types for model fitting and evaluation.

use regime_pd_data::DataError;
use regime_pd_features::FeatureError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by the PD models.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Feature construction failed
    #[error(transparent)]
    Features(#[from] FeatureError),

    /// Frame access failed
    #[error(transparent)]
    Data(#[from] DataError),

    /// Labels contain a single class, so the metric or fit is undefined
    #[error("Only one class present in the labels ({positives} positives of {total})")]
    SingleClass {
        /// Number of positive labels
        positives: usize,
        /// Number of labels
        total: usize,
    },

    /// Inputs disagree in size
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch {
        /// Expected size
        expected: usize,
        /// Actual size
        actual: usize,
    },

    /// Input contains NaN or infinite values
    #[error("Non-finite value in {0}")]
    NonFinite(String),

    /// Not enough rows to fit or evaluate
    #[error("Empty input: {0}")]
    Empty(String),

    /// The Newton system could not be solved
    #[error("Singular Hessian at iteration {iteration}")]
    Singular {
        /// Solver iteration
        iteration: usize,
    },

    /// Invalid solver parameter
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Model artifact not found
    #[error("Model artifact not found: {}", path.display())]
    ArtifactNotFound {
        /// Expected artifact path
        path: PathBuf,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for model operations.
pub type Result<T> = std::result::Result<T, ModelError>;
