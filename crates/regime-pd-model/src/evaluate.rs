//! Fit-then-score evaluation shared by both model variants.

use crate::artifact::{ModelKind, TrainedModel};
use crate::logistic::LogisticConfig;
use crate::metrics::roc_auc;
use crate::Result;
use ndarray::Array1;
use polars::prelude::DataFrame;
use regime_pd_features::{ImputationMode, default_target};
use tracing::info;

/// A fitted model together with its out-of-sample scores.
#[derive(Debug, Clone)]
pub struct ModelEvaluation {
    /// Model fitted on the training frame
    pub model: TrainedModel,
    /// Predicted PD for each test row
    pub test_pd: Array1<f64>,
    /// Observed default flag for each test row
    pub test_target: Array1<f64>,
    /// ROC-AUC of `test_pd` against `test_target`
    pub auc: f64,
}

/// Fit `kind` on `train` and score `test`.
///
/// # Errors
/// Fitting failures, or [`crate::ModelError::SingleClass`] when the test
/// labels contain one class only.
pub fn fit_and_evaluate(
    kind: ModelKind,
    train: &DataFrame,
    test: &DataFrame,
    config: &LogisticConfig,
    imputation: ImputationMode,
) -> Result<ModelEvaluation> {
    let model = TrainedModel::fit(kind, train, config, imputation)?;
    let test_pd = model.predict_frame(test)?;
    let test_target = default_target(test)?;
    let auc = roc_auc(&test_target, &test_pd)?;

    info!(%kind, test_rows = test.height(), auc, "evaluated PD model");
    Ok(ModelEvaluation {
        model,
        test_pd,
        test_target,
        auc,
    })
}
