//! Error type of the end-to-end pipeline.

use regime_pd_data::DataError;
use regime_pd_features::FeatureError;
use regime_pd_model::ModelError;
use regime_pd_output::{ExportError, OutputError};
use std::path::PathBuf;
use thiserror::Error;

/// Result type for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors raised while running the pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Loading or preparing data failed
    #[error(transparent)]
    Data(#[from] DataError),

    /// Building features failed
    #[error(transparent)]
    Features(#[from] FeatureError),

    /// Fitting, scoring or persisting a model failed
    #[error(transparent)]
    Model(#[from] ModelError),

    /// Summarising or plotting failed
    #[error(transparent)]
    Output(#[from] OutputError),

    /// Writing a table failed
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Configuration file does not exist
    #[error("Config file not found: {}", path.display())]
    ConfigNotFound {
        /// Path that was requested
        path: PathBuf,
    },

    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Polars error
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
