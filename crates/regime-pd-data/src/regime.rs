//! Macroeconomic regime labelling.
//!
//! A loan is issued in a `Stress` regime when the unemployment rate of its
//! issue month is strictly above a threshold, otherwise in `Expansion`. Loans
//! without a macro observation get no regime.

use crate::columns::{REGIME, UNEMPLOYMENT_RATE, string_values};
use crate::{DataError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::info;

/// Default unemployment threshold (percent) separating the two regimes.
pub const DEFAULT_UNEMPLOYMENT_THRESHOLD: f64 = 6.0;

/// Macroeconomic regime.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
pub enum Regime {
    /// Unemployment at or below the threshold
    Expansion,
    /// Unemployment above the threshold
    Stress,
}

impl Regime {
    /// Both regimes, in reporting order.
    pub const ALL: [Self; 2] = [Self::Expansion, Self::Stress];

    /// Label stored in the `regime` column.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Expansion => "Expansion",
            Self::Stress => "Stress",
        }
    }
}

impl FromStr for Regime {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Expansion" => Ok(Self::Expansion),
            "Stress" => Ok(Self::Stress),
            other => Err(DataError::Parse(format!("unknown regime {other:?}"))),
        }
    }
}

/// Threshold rule mapping an unemployment rate to a [`Regime`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegimeRule {
    /// Unemployment rate above which the economy is considered stressed
    pub unemployment_threshold: f64,
}

impl Default for RegimeRule {
    fn default() -> Self {
        Self::new(DEFAULT_UNEMPLOYMENT_THRESHOLD)
    }
}

impl RegimeRule {
    /// Create a rule with the given threshold.
    pub const fn new(unemployment_threshold: f64) -> Self {
        Self {
            unemployment_threshold,
        }
    }

    /// Classify a single observation. Missing (or NaN) rates have no regime.
    pub fn classify(&self, unemployment_rate: Option<f64>) -> Option<Regime> {
        unemployment_rate
            .filter(|rate| !rate.is_nan())
            .map(|rate| {
                if rate > self.unemployment_threshold {
                    Regime::Stress
                } else {
                    Regime::Expansion
                }
            })
    }

    /// The same rule as a polars expression producing the `regime` column.
    pub fn expr(&self) -> Expr {
        let rate = || col(UNEMPLOYMENT_RATE);
        let threshold = self.unemployment_threshold;
        when(rate().is_not_nan().and(rate().gt(lit(threshold))))
            .then(lit(Regime::Stress.as_str()))
            .when(rate().is_not_nan().and(rate().lt_eq(lit(threshold))))
            .then(lit(Regime::Expansion.as_str()))
            .otherwise(lit(NULL))
            .alias(REGIME)
    }
}

/// Assign the macroeconomic regime based on unemployment rate.
///
/// # Errors
/// Fails if the frame has no `unemployment_rate` column.
pub fn assign_macro_regime(df: &DataFrame, rule: &RegimeRule) -> Result<DataFrame> {
    let labelled = df.clone().lazy().with_column(rule.expr()).collect()?;

    let regimes = regime_values(&labelled)?;
    let stress = regimes.iter().filter(|r| **r == Some(Regime::Stress)).count();
    let unlabelled = regimes.iter().filter(|r| r.is_none()).count();
    info!(
        threshold = rule.unemployment_threshold,
        stress,
        expansion = regimes.len() - stress - unlabelled,
        unlabelled,
        "assigned macro regimes"
    );
    Ok(labelled)
}

/// Read the `regime` column as typed values.
///
/// # Errors
/// Fails when the column is missing or holds an unknown label.
pub fn regime_values(df: &DataFrame) -> Result<Vec<Option<Regime>>> {
    string_values(df, REGIME)?
        .into_iter()
        .map(|label| label.as_deref().map(Regime::from_str).transpose())
        .collect()
}
