//! Design matrix construction.

use crate::encoder::CategoryEncoder;
use crate::{FeatureError, FeatureMatrix, Result};
use ndarray::{Array1, Array2, Axis, concatenate};
use polars::prelude::DataFrame;
use regime_pd_data::columns::{
    CATEGORICAL_FEATURES, DEFAULT, NUMERIC_FEATURES, float_values, int_values,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Builds the model matrix: numeric features first, then category indicators.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureBuilder {
    encoder: CategoryEncoder,
}

impl FeatureBuilder {
    /// Learn category levels from `df`.
    ///
    /// # Errors
    /// Fails if a categorical column is missing.
    pub fn fit(df: &DataFrame) -> Result<Self> {
        Ok(Self {
            encoder: CategoryEncoder::fit(df, &CATEGORICAL_FEATURES)?,
        })
    }

    /// The fitted category encoder.
    pub const fn encoder(&self) -> &CategoryEncoder {
        &self.encoder
    }

    /// Column names produced by [`FeatureBuilder::transform`].
    pub fn feature_names(&self) -> Vec<String> {
        NUMERIC_FEATURES
            .iter()
            .map(|name| name.to_string())
            .chain(self.encoder.feature_names())
            .collect()
    }

    /// Build the feature matrix of `df` using the fitted levels.
    ///
    /// Missing numeric values become `NaN`.
    ///
    /// # Errors
    /// Fails if a feature column is missing.
    pub fn transform(&self, df: &DataFrame) -> Result<FeatureMatrix> {
        let numeric = numeric_block(df)?;
        let indicators = self.encoder.transform(df)?;
        let values = concatenate(Axis(1), &[numeric.view(), indicators.view()])?;

        debug!(
            rows = values.nrows(),
            columns = values.ncols(),
            "built feature matrix"
        );
        FeatureMatrix::new(self.feature_names(), values)
    }
}

fn numeric_block(df: &DataFrame) -> Result<Array2<f64>> {
    let mut block = Array2::from_elem((df.height(), NUMERIC_FEATURES.len()), f64::NAN);
    for (j, name) in NUMERIC_FEATURES.iter().enumerate() {
        for (i, value) in float_values(df, name)?.into_iter().enumerate() {
            if let Some(v) = value {
                block[[i, j]] = v;
            }
        }
    }
    Ok(block)
}

/// The binary `default` target as floats.
///
/// # Errors
/// [`FeatureError::MissingTarget`] when a row has no target.
pub fn default_target(df: &DataFrame) -> Result<Array1<f64>> {
    int_values(df, DEFAULT)?
        .into_iter()
        .enumerate()
        .map(|(row, value)| {
            value
                .map(f64::from)
                .ok_or(FeatureError::MissingTarget { row })
        })
        .collect()
}

/// Build features for modelling.
///
/// Category levels are learned from `df` itself. Returns the feature matrix
/// and the aligned default target, both with one row per input row.
///
/// # Errors
/// Fails if a feature or target column is missing.
pub fn build_features(df: &DataFrame) -> Result<(FeatureMatrix, Array1<f64>)> {
    let features = FeatureBuilder::fit(df)?.transform(df)?;
    let target = default_target(df)?;
    Ok((features, target))
}

/// Rows whose raw numeric features are all present.
///
/// Categorical features never make a row incomplete: a missing level encodes
/// as all-zero indicators.
///
/// # Errors
/// Fails if a feature column is missing.
pub fn complete_feature_rows(df: &DataFrame) -> Result<Vec<bool>> {
    let mut complete = vec![true; df.height()];
    for name in NUMERIC_FEATURES {
        for (keep, value) in complete.iter_mut().zip(float_values(df, name)?) {
            *keep &= value.is_some_and(|v| !v.is_nan());
        }
    }
    Ok(complete)
}
