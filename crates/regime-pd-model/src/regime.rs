//! Regime-aware PD model.
//!
//! Adds a stress indicator and one interaction per base feature, letting both
//! the baseline level of risk and every feature's effect shift under stress.

use crate::Result;
use crate::artifact::ModelKind;
use crate::evaluate::{ModelEvaluation, fit_and_evaluate};
use crate::logistic::LogisticConfig;
use polars::prelude::DataFrame;
use regime_pd_features::ImputationMode;

/// Train the regime-aware model on `train` and report its ROC-AUC on `test`.
///
/// Both frames need a `regime` column; loans without a regime are treated as
/// not stressed.
///
/// # Errors
/// See [`fit_and_evaluate`].
pub fn train_regime_aware_model(
    train: &DataFrame,
    test: &DataFrame,
    config: &LogisticConfig,
    imputation: ImputationMode,
) -> Result<ModelEvaluation> {
    fit_and_evaluate(ModelKind::RegimeAware, train, test, config, imputation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ModelError;
    use crate::baseline::train_baseline_model;
    use crate::test_support::synthetic_loans;

    #[test]
    fn test_regime_aware_uses_stress() {
        let train = synthetic_loans(3_000, 30);
        let test = synthetic_loans(1_500, 40);

        let baseline = train_baseline_model(
            &train,
            &test,
            &LogisticConfig::baseline(),
            ImputationMode::TrainingMean,
        )
        .unwrap();
        let aware = train_regime_aware_model(
            &train,
            &test,
            &LogisticConfig::regime_aware(),
            ImputationMode::TrainingMean,
        )
        .unwrap();

        let base_width = baseline.model.feature_names().len();
        assert_eq!(aware.model.feature_names().len(), 2 * base_width + 1);
        assert!(aware.auc > 0.6, "auc {}", aware.auc);

        let stress_effect = aware
            .model
            .named_coefficients()
            .find(|(name, _)| *name == "regime_stress")
            .map(|(_, w)| w)
            .unwrap();
        assert!(stress_effect.is_finite());
    }

    #[test]
    fn test_requires_regime_column() {
        let train = synthetic_loans(200, 1).drop("regime").unwrap();
        let test = synthetic_loans(100, 2);
        let err = train_regime_aware_model(
            &train,
            &test,
            &LogisticConfig::regime_aware(),
            ImputationMode::TrainingMean,
        )
        .unwrap_err();
        assert!(matches!(err, ModelError::Features(_)));
    }
}
