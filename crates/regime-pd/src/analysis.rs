//! Full-sample regime risk analysis.
//!
//! The baseline model is fitted on every loan whose numeric features are all
//! present and scored in-sample. The resulting PDs are then compared across
//! macro regimes.

use crate::{PipelineConfig, Result};
use polars::prelude::*;
use regime_pd_data::regime::regime_values;
use regime_pd_features::{complete_feature_rows, default_target};
use regime_pd_model::{ModelKind, TrainedModel};
use regime_pd_output::{RegimeRiskSummary, ScoredLoans};
use tracing::info;

/// In-sample PDs of the full-sample baseline and their regime summary.
#[derive(Debug, Clone)]
pub struct RegimeRiskAnalysis {
    /// Baseline fitted on the complete rows
    pub model: TrainedModel,
    /// The complete rows
    pub loans: DataFrame,
    /// PD, regime and outcome of every complete row
    pub scored: ScoredLoans,
    /// Per-regime statistics
    pub summary: RegimeRiskSummary,
}

/// Keep the loans whose numeric features are all present.
///
/// # Errors
/// Fails if a feature column is missing.
pub fn complete_loans(loans: &DataFrame) -> Result<DataFrame> {
    let mask = complete_feature_rows(loans)?;
    let kept = loans.filter(&BooleanChunked::from_slice("complete".into(), &mask))?;
    info!(
        kept = kept.height(),
        dropped = loans.height() - kept.height(),
        "selected complete feature rows"
    );
    Ok(kept)
}

/// Fit the baseline on all complete rows and summarise in-sample PDs by
/// regime.
///
/// # Errors
/// Feature or fitting failures, or no complete row having a regime.
pub fn analyze_regime_risk(
    loans: &DataFrame,
    config: &PipelineConfig,
) -> Result<RegimeRiskAnalysis> {
    let loans = complete_loans(loans)?;
    let model = TrainedModel::fit(
        ModelKind::Baseline,
        &loans,
        &config.baseline,
        config.imputation,
    )?;
    let pd = model.predict_frame(&loans)?;

    let scored = ScoredLoans::new(
        regime_values(&loans)?,
        pd.to_vec(),
        default_target(&loans)?.to_vec(),
    )?;
    let summary = RegimeRiskSummary::from_scored(&scored)?;
    info!(
        uplift = summary.relative_mean_pd_uplift(),
        "regime risk summary"
    );

    Ok(RegimeRiskAnalysis {
        model,
        loans,
        scored,
        summary,
    })
}
