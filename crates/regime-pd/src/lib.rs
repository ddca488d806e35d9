#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/regime-pd/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod report;
pub mod score;

// Re-export the sub-crates
pub use regime_pd_data as data;
pub use regime_pd_features as features;
pub use regime_pd_model as model;
pub use regime_pd_output as output;

pub use analysis::{RegimeRiskAnalysis, analyze_regime_risk, complete_loans};
pub use config::PipelineConfig;
pub use error::{PipelineError, Result};
pub use pipeline::{PipelineReport, PreparedData, evaluate_models, run_pipeline};
pub use report::{build_figures, write_figures};
pub use score::{PD_COLUMN, ScoredFile, score_loans};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
