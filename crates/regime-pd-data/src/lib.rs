#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/regime-pd/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod clean;
pub mod columns;
pub mod error;
pub mod load;
pub mod merge;
pub mod regime;
pub mod split;

pub use clean::clean_loans;
pub use error::{DataError, Result};
pub use load::{load_loans, load_macro};
pub use merge::merge_loans_with_macro;
pub use regime::{Regime, RegimeRule, assign_macro_regime};
pub use split::{DEFAULT_TRAIN_END_DATE, parse_cutoff, time_based_split};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
