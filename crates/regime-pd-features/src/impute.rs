//! Mean imputation of missing feature values.

use crate::{FeatureError, Result};
use ndarray::{Array2, Axis};
use serde::{Deserialize, Serialize};

/// Which data the imputation means are computed from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImputationMode {
    /// Means learned on the training matrix are applied everywhere
    #[default]
    TrainingMean,
    /// Every matrix is imputed with its own column means
    PerFrame,
}

/// Column-wise mean imputer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeanImputer {
    means: Vec<f64>,
}

impl MeanImputer {
    /// Learn the mean of the observed values of each column.
    ///
    /// A column with no observed value gets a mean of `0.0`.
    pub fn fit(x: &Array2<f64>) -> Self {
        let means = x
            .axis_iter(Axis(1))
            .map(|column| {
                let (sum, count) = column
                    .iter()
                    .filter(|v| !v.is_nan())
                    .fold((0.0_f64, 0usize), |(s, c), v| (s + v, c + 1));
                if count == 0 { 0.0 } else { sum / count as f64 }
            })
            .collect();
        Self { means }
    }

    /// Learned column means.
    pub fn means(&self) -> &[f64] {
        &self.means
    }

    /// Replace `NaN` cells with the learned means.
    ///
    /// # Errors
    /// [`FeatureError::DimensionMismatch`] when the column count differs from
    /// the fitted one.
    pub fn transform(&self, x: &Array2<f64>) -> Result<Array2<f64>> {
        if x.ncols() != self.means.len() {
            return Err(FeatureError::DimensionMismatch {
                expected: self.means.len(),
                actual: x.ncols(),
            });
        }
        Ok(self.fill(x))
    }

    /// Fit on `x` and impute it.
    pub fn fit_transform(x: &Array2<f64>) -> (Self, Array2<f64>) {
        let imputer = Self::fit(x);
        let filled = imputer.fill(x);
        (imputer, filled)
    }

    fn fill(&self, x: &Array2<f64>) -> Array2<f64> {
        let mut filled = x.clone();
        for (mut column, mean) in filled.axis_iter_mut(Axis(1)).zip(&self.means) {
            column.mapv_inplace(|v| if v.is_nan() { *mean } else { v });
        }
        filled
    }
}

/// Impute a train/test pair.
///
/// The returned imputer is always the one fitted on `train`; with
/// [`ImputationMode::PerFrame`] the test matrix is imputed with its own means.
///
/// # Errors
/// Fails when the matrices have different column counts.
pub fn impute_train_test(
    mode: ImputationMode,
    train: &Array2<f64>,
    test: &Array2<f64>,
) -> Result<(MeanImputer, Array2<f64>, Array2<f64>)> {
    let (imputer, train_filled) = MeanImputer::fit_transform(train);
    let test_filled = match mode {
        ImputationMode::TrainingMean => imputer.transform(test)?,
        ImputationMode::PerFrame => MeanImputer::fit(test).transform(test)?,
    };
    Ok((imputer, train_filled, test_filled))
}
