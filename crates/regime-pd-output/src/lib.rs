#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/regime-pd/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod deciles;
pub mod density;
pub mod error;
pub mod export;
pub mod figures;
pub mod scored;
pub mod style;
pub mod summary;
pub mod timeline;

pub use deciles::{DECILES, DecileStat, DecileTable, assign_buckets};
pub use density::{DensityCurve, GaussianKde, regime_density_curves};
pub use error::{OutputError, Result};
pub use export::{ExportError, ExportFormat, Exporter};
pub use figures::{Figure, ReportFigures, save_figure};
pub use scored::ScoredLoans;
pub use style::FigureStyle;
pub use summary::{RegimeRiskRow, RegimeRiskSummary};
pub use timeline::{DefaultRateGrid, MonthlyCount, monthly_issuance};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
