#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/regime-pd/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod artifact;
pub mod baseline;
pub mod error;
pub mod evaluate;
mod linalg;
pub mod logistic;
pub mod metrics;
pub mod regime;
#[cfg(test)]
mod test_support;

pub use artifact::{
    BASELINE_MODEL_FILE, ModelKind, REGIME_AWARE_MODEL_FILE, TrainedModel, load_trained_model,
};
pub use baseline::train_baseline_model;
pub use error::{ModelError, Result};
pub use evaluate::ModelEvaluation;
pub use logistic::{FitReport, LogisticConfig, LogisticRegression};
pub use metrics::{mean, percentile, roc_auc};
pub use regime::train_regime_aware_model;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
