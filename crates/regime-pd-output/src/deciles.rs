//! Predicted-PD deciles by regime.
//!
//! Loans are ranked into ten equal-frequency buckets of predicted PD (1 is the
//! safest) over the whole scored sample. Each regime is then described by how
//! its loans spread over the buckets and how often they default in each one.

use crate::{OutputError, Result, ScoredLoans};
use regime_pd_data::Regime;
use regime_pd_model::{mean, percentile};
use serde::{Deserialize, Serialize};

/// Number of PD buckets.
pub const DECILES: u8 = 10;

/// Bucket edges at equally spaced quantiles of `values`.
///
/// Returns `buckets + 1` edges from the minimum to the maximum, or `None` for
/// an empty slice.
pub fn quantile_edges(values: &[f64], buckets: u8) -> Option<Vec<f64>> {
    let buckets = buckets.max(1);
    (0..=buckets)
        .map(|k| percentile(values, 100.0 * f64::from(k) / f64::from(buckets)))
        .collect()
}

/// Bucket (1-based) of every value, with right-closed intervals.
///
/// Repeated edges leave the buckets between them empty rather than failing.
///
/// # Errors
/// [`OutputError::Empty`] for an empty slice.
pub fn assign_buckets(values: &[f64], buckets: u8) -> Result<Vec<u8>> {
    let edges = quantile_edges(values, buckets)
        .ok_or_else(|| OutputError::Empty("no values to bucket".to_string()))?;
    let inner = &edges[1..edges.len() - 1];
    Ok(values
        .iter()
        .map(|v| 1 + inner.iter().filter(|edge| v > edge).count() as u8)
        .collect())
}

/// Composition and realised default rate of one (regime, decile) cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecileStat {
    /// Regime
    pub regime: Regime,
    /// PD decile, 1 to 10
    pub decile: u8,
    /// Loans of the regime in this decile
    pub count: usize,
    /// Share of the regime's loans in this decile
    pub share: f64,
    /// Observed default rate, `None` when the cell is empty
    pub default_rate: Option<f64>,
}

/// Decile statistics for both regimes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecileTable {
    stats: Vec<DecileStat>,
}

impl DecileTable {
    /// Rank scored loans into PD deciles and tabulate them per regime.
    ///
    /// Loans without a regime take part in the ranking but not in the table.
    ///
    /// # Errors
    /// [`OutputError::Empty`] when nothing was scored.
    pub fn from_scored(scored: &ScoredLoans) -> Result<Self> {
        let deciles = assign_buckets(scored.pd(), DECILES)?;

        let mut stats = Vec::new();
        for regime in Regime::ALL {
            let members: Vec<(u8, f64)> = scored
                .regimes()
                .iter()
                .zip(deciles.iter().zip(scored.defaults()))
                .filter(|(r, _)| **r == Some(regime))
                .map(|(_, (decile, default))| (*decile, *default))
                .collect();
            if members.is_empty() {
                continue;
            }

            for decile in 1..=DECILES {
                let outcomes: Vec<f64> = members
                    .iter()
                    .filter(|(d, _)| *d == decile)
                    .map(|(_, default)| *default)
                    .collect();
                stats.push(DecileStat {
                    regime,
                    decile,
                    count: outcomes.len(),
                    share: outcomes.len() as f64 / members.len() as f64,
                    default_rate: mean(&outcomes),
                });
            }
        }
        Ok(Self { stats })
    }

    /// All cells, grouped by regime then decile.
    pub fn stats(&self) -> &[DecileStat] {
        &self.stats
    }

    /// Cells of one regime, by decile.
    pub fn regime(&self, regime: Regime) -> impl Iterator<Item = &DecileStat> {
        self.stats.iter().filter(move |stat| stat.regime == regime)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_buckets_are_equal_frequency() {
        let values: Vec<f64> = (0..100).map(f64::from).collect();
        let buckets = assign_buckets(&values, DECILES).unwrap();

        for decile in 1..=DECILES {
            assert_eq!(buckets.iter().filter(|b| **b == decile).count(), 10);
        }
        assert_eq!(buckets[0], 1);
        assert_eq!(buckets[99], 10);
    }

    #[test]
    fn test_buckets_with_ties() {
        let buckets = assign_buckets(&[0.5; 20], DECILES).unwrap();
        assert!(buckets.iter().all(|b| *b == 1));
        assert!(assign_buckets(&[], DECILES).is_err());
    }

    #[test]
    fn test_decile_table() {
        let n = 200;
        let pd: Vec<f64> = (0..n).map(|i| f64::from(i) / f64::from(n)).collect();
        // Stress loans sit in the riskier half.
        let regimes = (0..n)
            .map(|i| Some(if i >= n / 2 { Regime::Stress } else { Regime::Expansion }))
            .collect();
        let defaults = (0..n).map(|i| f64::from(u8::from(i % 4 == 0))).collect();
        let scored = ScoredLoans::new(regimes, pd, defaults).unwrap();

        let table = DecileTable::from_scored(&scored).unwrap();
        assert_eq!(table.stats().len(), 20);

        let stress: Vec<&DecileStat> = table.regime(Regime::Stress).collect();
        assert_eq!(stress.len(), 10);
        assert_eq!(stress[0].count, 0);
        assert_eq!(stress[0].default_rate, None);
        assert_relative_eq!(stress[9].share, 0.2);
        let total: f64 = stress.iter().map(|s| s.share).sum();
        assert_relative_eq!(total, 1.0, epsilon = 1e-12);

        let expansion: Vec<&DecileStat> = table.regime(Regime::Expansion).collect();
        assert_relative_eq!(expansion[0].default_rate.unwrap(), 0.25);
    }
}
