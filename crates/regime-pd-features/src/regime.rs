//! Regime interaction features.

use crate::{FeatureError, FeatureMatrix, Result};
use ndarray::{Array1, Array2};
use polars::prelude::DataFrame;
use regime_pd_data::Regime;
use regime_pd_data::regime::regime_values;

/// Name of the stress indicator column.
pub const REGIME_STRESS: &str = "regime_stress";

/// Suffix appended to interaction columns.
pub const STRESS_SUFFIX: &str = "_x_stress";

/// `1.0` for loans issued under `Stress`, `0.0` otherwise (including loans
/// without a regime).
///
/// # Errors
/// Fails if the frame has no `regime` column.
pub fn regime_stress_indicator(df: &DataFrame) -> Result<Array1<f64>> {
    Ok(regime_values(df)?
        .into_iter()
        .map(|regime| if regime == Some(Regime::Stress) { 1.0 } else { 0.0 })
        .collect())
}

/// Extend base features with the stress indicator and feature × stress
/// interactions.
///
/// Output columns: base columns, `regime_stress`, then `{name}_x_stress` for
/// every base column. A missing base value yields a missing interaction.
///
/// # Errors
/// Fails when the indicator length differs from the row count.
pub fn add_regime_features(base: &FeatureMatrix, stress: &Array1<f64>) -> Result<FeatureMatrix> {
    if stress.len() != base.nrows() {
        return Err(FeatureError::DimensionMismatch {
            expected: base.nrows(),
            actual: stress.len(),
        });
    }

    let width = base.ncols();
    let mut extra = Array2::<f64>::zeros((base.nrows(), width + 1));
    extra.column_mut(0).assign(stress);
    for (j, column) in base.values().columns().into_iter().enumerate() {
        let mut target = extra.column_mut(j + 1);
        target.assign(&(&column * stress));
    }

    let names = std::iter::once(REGIME_STRESS.to_string())
        .chain(base.names().iter().map(|name| format!("{name}{STRESS_SUFFIX}")))
        .collect();
    base.hstack(&FeatureMatrix::new(names, extra)?)
}
