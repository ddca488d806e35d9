//! Loans paired with their predicted PDs.

use crate::error::check_len;
use crate::{OutputError, Result};
use regime_pd_data::Regime;

/// Predicted PD, realised outcome and regime of each scored loan.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredLoans {
    regimes: Vec<Option<Regime>>,
    pd: Vec<f64>,
    defaults: Vec<f64>,
}

impl ScoredLoans {
    /// Pair aligned columns.
    ///
    /// # Errors
    /// [`OutputError::DimensionMismatch`] for unequal lengths and
    /// [`OutputError::Degenerate`] if a PD is not finite.
    pub fn new(regimes: Vec<Option<Regime>>, pd: Vec<f64>, defaults: Vec<f64>) -> Result<Self> {
        check_len(regimes.len(), pd.len())?;
        check_len(regimes.len(), defaults.len())?;
        if let Some(row) = pd.iter().position(|p| !p.is_finite()) {
            return Err(OutputError::Degenerate(format!(
                "predicted PD at row {row} is not finite"
            )));
        }
        Ok(Self {
            regimes,
            pd,
            defaults,
        })
    }

    /// Number of loans.
    pub fn len(&self) -> usize {
        self.pd.len()
    }

    /// Whether no loans were scored.
    pub fn is_empty(&self) -> bool {
        self.pd.is_empty()
    }

    /// Regime of each loan.
    pub fn regimes(&self) -> &[Option<Regime>] {
        &self.regimes
    }

    /// Predicted PD of each loan.
    pub fn pd(&self) -> &[f64] {
        &self.pd
    }

    /// Default indicator of each loan.
    pub fn defaults(&self) -> &[f64] {
        &self.defaults
    }

    /// Predicted PDs and outcomes of the loans in `regime`.
    pub fn in_regime(&self, regime: Regime) -> (Vec<f64>, Vec<f64>) {
        self.regimes
            .iter()
            .zip(self.pd.iter().zip(&self.defaults))
            .filter(|(r, _)| **r == Some(regime))
            .map(|(_, (pd, default))| (*pd, *default))
            .unzip()
    }
}
