//! Fitted PD models and their JSON artifacts.
//!
//! A [`TrainedModel`] carries everything needed to score a new loan frame:
//! the category levels of the training data, the imputation means and the
//! regression coefficients. Saved artifacts can be loaded and used without
//! retraining.

use crate::logistic::{LogisticConfig, LogisticRegression};
use crate::{ModelError, Result};
use ndarray::Array1;
use polars::prelude::DataFrame;
use regime_pd_features::{
    FeatureBuilder, FeatureMatrix, ImputationMode, MeanImputer, add_regime_features,
    default_target, regime_stress_indicator,
};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, info, warn};

/// File name of the baseline model artifact.
pub const BASELINE_MODEL_FILE: &str = "baseline_pd_model.json";

/// File name of the regime-aware model artifact.
pub const REGIME_AWARE_MODEL_FILE: &str = "regime_aware_pd_model.json";

/// Model variant.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum ModelKind {
    /// Loan features only
    #[display("baseline")]
    Baseline,
    /// Loan features, stress indicator and feature × stress interactions
    #[display("regime-aware")]
    RegimeAware,
}

impl ModelKind {
    /// Solver configuration for this variant.
    pub const fn default_config(self) -> LogisticConfig {
        match self {
            Self::Baseline => LogisticConfig::baseline(),
            Self::RegimeAware => LogisticConfig::regime_aware(),
        }
    }

    /// Artifact file name for this variant.
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Baseline => BASELINE_MODEL_FILE,
            Self::RegimeAware => REGIME_AWARE_MODEL_FILE,
        }
    }

    /// Design matrix of `frame` for this variant.
    ///
    /// # Errors
    /// Fails if a feature column (or `regime`, for the regime-aware variant)
    /// is missing.
    pub fn design(self, builder: &FeatureBuilder, frame: &DataFrame) -> Result<FeatureMatrix> {
        let base = builder.transform(frame)?;
        match self {
            Self::Baseline => Ok(base),
            Self::RegimeAware => {
                let stress = regime_stress_indicator(frame)?;
                Ok(add_regime_features(&base, &stress)?)
            }
        }
    }
}

/// A fitted model ready for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedModel {
    kind: ModelKind,
    features: FeatureBuilder,
    feature_names: Vec<String>,
    imputation: ImputationMode,
    imputer: MeanImputer,
    regression: LogisticRegression,
}

impl TrainedModel {
    /// Fit a model of the given kind on a labelled training frame.
    ///
    /// # Errors
    /// Feature construction or solver failures.
    pub fn fit(
        kind: ModelKind,
        train: &DataFrame,
        config: &LogisticConfig,
        imputation: ImputationMode,
    ) -> Result<Self> {
        let features = FeatureBuilder::fit(train)?;
        let design = kind.design(&features, train)?;
        let target = default_target(train)?;

        let (imputer, filled) = MeanImputer::fit_transform(design.values());
        let regression = LogisticRegression::fit(&filled, &target, config)?;

        let report = regression.report();
        if !report.converged {
            // Expected for the baseline; the regime-aware fit should settle.
            match kind {
                ModelKind::Baseline => debug!(%kind, "PD model stopped at the iteration cap"),
                ModelKind::RegimeAware => warn!(
                    %kind,
                    max_iter = config.max_iter,
                    "PD model did not converge"
                ),
            }
        }
        info!(
            %kind,
            rows = design.nrows(),
            features = design.ncols(),
            converged = report.converged,
            iterations = report.iterations,
            "fitted PD model"
        );

        Ok(Self {
            kind,
            features,
            feature_names: design.names().to_vec(),
            imputation,
            imputer,
            regression,
        })
    }

    /// Model variant.
    pub const fn kind(&self) -> ModelKind {
        self.kind
    }

    /// Feature builder fitted on the training frame.
    pub const fn features(&self) -> &FeatureBuilder {
        &self.features
    }

    /// Names of the model inputs, in coefficient order.
    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// How frames are imputed at scoring time.
    pub const fn imputation(&self) -> ImputationMode {
        self.imputation
    }

    /// Imputer fitted on the training design matrix.
    pub const fn imputer(&self) -> &MeanImputer {
        &self.imputer
    }

    /// Underlying regression.
    pub const fn regression(&self) -> &LogisticRegression {
        &self.regression
    }

    /// Coefficients paired with their feature names.
    pub fn named_coefficients(&self) -> impl Iterator<Item = (&str, f64)> {
        self.feature_names
            .iter()
            .map(String::as_str)
            .zip(self.regression.coefficients().iter().copied())
    }

    /// Unimputed design matrix of `frame`.
    ///
    /// # Errors
    /// Fails if a required column is missing.
    pub fn design_matrix(&self, frame: &DataFrame) -> Result<FeatureMatrix> {
        self.kind.design(&self.features, frame)
    }

    /// Predicted probability of default for every row of `frame`.
    ///
    /// # Errors
    /// Fails if a required column is missing.
    pub fn predict_frame(&self, frame: &DataFrame) -> Result<Array1<f64>> {
        let design = self.design_matrix(frame)?;
        let filled = match self.imputation {
            ImputationMode::TrainingMean => self.imputer.transform(design.values())?,
            ImputationMode::PerFrame => MeanImputer::fit_transform(design.values()).1,
        };
        self.regression.predict_proba(&filled)
    }

    /// Write the model as pretty-printed JSON, creating parent directories.
    ///
    /// # Errors
    /// I/O or serialisation failures.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(writer, self)?;
        info!(kind = %self.kind, path = %path.display(), "saved model artifact");
        Ok(())
    }

    /// Read a model written by [`TrainedModel::save`].
    ///
    /// # Errors
    /// [`ModelError::ArtifactNotFound`] when the file does not exist; JSON
    /// errors for malformed files; [`ModelError::DimensionMismatch`] when the
    /// stored names, means and coefficients disagree.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ModelError::ArtifactNotFound {
                path: path.to_path_buf(),
            });
        }
        let model: Self = serde_json::from_reader(BufReader::new(File::open(path)?))?;

        let expected = model.feature_names.len();
        for actual in [
            model.regression.n_features(),
            model.imputer.means().len(),
        ] {
            if actual != expected {
                return Err(ModelError::DimensionMismatch { expected, actual });
            }
        }
        Ok(model)
    }
}

/// Load the baseline model saved under `models_dir`.
///
/// # Errors
/// See [`TrainedModel::load`].
pub fn load_trained_model(models_dir: impl AsRef<Path>) -> Result<TrainedModel> {
    TrainedModel::load(models_dir.as_ref().join(BASELINE_MODEL_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::synthetic_loans;
    use approx::assert_relative_eq;
    use tempfile::TempDir;

    #[test]
    fn test_kind_metadata() {
        assert_eq!(ModelKind::Baseline.default_config().max_iter, 2000);
        assert_eq!(ModelKind::RegimeAware.default_config().max_iter, 3000);
        assert_eq!(ModelKind::Baseline.file_name(), "baseline_pd_model.json");
        assert_eq!(ModelKind::RegimeAware.to_string(), "regime-aware");
    }

    #[test]
    fn test_fit_records_feature_names() {
        let loans = synthetic_loans(400, 1);
        let model = TrainedModel::fit(
            ModelKind::RegimeAware,
            &loans,
            &LogisticConfig::regime_aware(),
            ImputationMode::TrainingMean,
        )
        .unwrap();

        let names = model.feature_names();
        assert_eq!(names.len(), model.regression().n_features());
        assert!(names.contains(&"regime_stress".to_string()));
        assert!(names.contains(&"int_rate_x_stress".to_string()));
        assert_eq!(model.named_coefficients().count(), names.len());
    }

    #[test]
    fn test_save_load_round_trip() {
        let loans = synthetic_loans(300, 2);
        let model = TrainedModel::fit(
            ModelKind::Baseline,
            &loans,
            &LogisticConfig::baseline(),
            ImputationMode::TrainingMean,
        )
        .unwrap();

        let dir = TempDir::new().unwrap();
        model.save(dir.path().join("nested").join(BASELINE_MODEL_FILE)).unwrap();
        let loaded = load_trained_model(dir.path().join("nested")).unwrap();

        assert_eq!(loaded.kind(), ModelKind::Baseline);
        assert_eq!(loaded.feature_names(), model.feature_names());
        let original = model.predict_frame(&loans).unwrap();
        let restored = loaded.predict_frame(&loans).unwrap();
        for (a, b) in original.iter().zip(restored.iter()) {
            assert_relative_eq!(a, b, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_iteration_cap_still_yields_model() {
        let loans = synthetic_loans(300, 3);
        let model = TrainedModel::fit(
            ModelKind::Baseline,
            &loans,
            &LogisticConfig::baseline().with_max_iter(1),
            ImputationMode::TrainingMean,
        )
        .unwrap();

        assert!(!model.regression().report().converged);
        let pd = model.predict_frame(&loans).unwrap();
        assert_eq!(pd.len(), loans.height());
        assert!(pd.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn test_load_missing_artifact() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            load_trained_model(dir.path()),
            Err(ModelError::ArtifactNotFound { .. })
        ));
    }
}
