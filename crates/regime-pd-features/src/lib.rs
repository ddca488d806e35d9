#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/regime-pd/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod build;
pub mod encoder;
pub mod error;
pub mod impute;
pub mod matrix;
pub mod regime;

pub use build::{FeatureBuilder, build_features, complete_feature_rows, default_target};
pub use encoder::CategoryEncoder;
pub use error::{FeatureError, Result};
pub use impute::{ImputationMode, MeanImputer, impute_train_test};
pub use matrix::FeatureMatrix;
pub use regime::{REGIME_STRESS, add_regime_features, regime_stress_indicator};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
