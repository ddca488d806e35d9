//! Train/test evaluation of both PD models.

use crate::{PipelineConfig, Result};
use polars::prelude::DataFrame;
use regime_pd_data::{
    assign_macro_regime, clean_loans, load_loans, load_macro, merge_loans_with_macro,
    time_based_split,
};
use regime_pd_model::{ModelEvaluation, train_baseline_model, train_regime_aware_model};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::info;

/// Loans ready for modelling, together with the macro series they were
/// labelled from.
#[derive(Debug, Clone)]
pub struct PreparedData {
    /// Cleaned loans with `unemployment_rate` and `regime`
    pub loans: DataFrame,
    /// Monthly `date` / `unemployment_rate` observations
    pub macro_observations: DataFrame,
}

impl PreparedData {
    /// Load, clean, merge and label the configured input files.
    ///
    /// # Errors
    /// Any data loading or preparation error.
    pub fn load(config: &PipelineConfig) -> Result<Self> {
        let raw = load_loans(&config.loans_path)?;
        let cleaned = clean_loans(&raw)?;
        let macro_observations = load_macro(&config.macro_path)?;
        Self::from_frames(&cleaned, macro_observations, config)
    }

    /// Merge already cleaned loans with macro observations and label regimes.
    ///
    /// # Errors
    /// Merge or labelling failures.
    pub fn from_frames(
        cleaned_loans: &DataFrame,
        macro_observations: DataFrame,
        config: &PipelineConfig,
    ) -> Result<Self> {
        let merged = merge_loans_with_macro(cleaned_loans, &macro_observations)?;
        let loans = assign_macro_regime(&merged, &config.regime_rule())?;
        info!(
            loans = loans.height(),
            macro_months = macro_observations.height(),
            "prepared data"
        );
        Ok(Self {
            loans,
            macro_observations,
        })
    }
}

/// Out-of-sample results of both models.
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Loans issued up to the cutoff
    pub train_rows: usize,
    /// Loans issued after the cutoff
    pub test_rows: usize,
    /// Baseline model and its test scores
    pub baseline: ModelEvaluation,
    /// Regime-aware model and its test scores
    pub regime_aware: ModelEvaluation,
}

impl PipelineReport {
    /// Write both model artifacts under `models_dir`.
    ///
    /// # Errors
    /// I/O or serialisation failures.
    pub fn save_models(&self, models_dir: &Path) -> Result<Vec<PathBuf>> {
        [&self.baseline, &self.regime_aware]
            .into_iter()
            .map(|evaluation| {
                let path = models_dir.join(evaluation.model.kind().file_name());
                evaluation.model.save(&path)?;
                Ok(path)
            })
            .collect()
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Baseline PD AUC: {:.4}", self.baseline.auc)?;
        write!(f, "Regime-aware PD AUC: {:.4}", self.regime_aware.auc)
    }
}

/// Split prepared loans at the configured cutoff and evaluate both models.
///
/// # Errors
/// Split, feature or fitting failures, including a test set with a single
/// class.
pub fn evaluate_models(loans: &DataFrame, config: &PipelineConfig) -> Result<PipelineReport> {
    let (train, test) = time_based_split(loans, config.train_end()?)?;

    let baseline = train_baseline_model(&train, &test, &config.baseline, config.imputation)?;
    let regime_aware =
        train_regime_aware_model(&train, &test, &config.regime_aware, config.imputation)?;

    Ok(PipelineReport {
        train_rows: train.height(),
        test_rows: test.height(),
        baseline,
        regime_aware,
    })
}

/// Run the full train/test pipeline from the configured input files.
///
/// # Errors
/// Configuration, data, feature or fitting failures.
pub fn run_pipeline(config: &PipelineConfig) -> Result<PipelineReport> {
    config.validate()?;
    let data = PreparedData::load(config)?;
    evaluate_models(&data.loans, config)
}
