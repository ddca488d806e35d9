//! Baseline PD model: loan features only.

use crate::Result;
use crate::artifact::ModelKind;
use crate::evaluate::{ModelEvaluation, fit_and_evaluate};
use crate::logistic::LogisticConfig;
use polars::prelude::DataFrame;
use regime_pd_features::ImputationMode;

/// Train the baseline model on `train` and report its ROC-AUC on `test`.
///
/// Numeric features and drop-first grade/term indicators, mean imputation,
/// L2 logistic regression (see [`LogisticConfig::baseline`]).
///
/// # Errors
/// See [`fit_and_evaluate`].
pub fn train_baseline_model(
    train: &DataFrame,
    test: &DataFrame,
    config: &LogisticConfig,
    imputation: ImputationMode,
) -> Result<ModelEvaluation> {
    fit_and_evaluate(ModelKind::Baseline, train, test, config, imputation)
}
