//! Gaussian kernel density estimates of predicted PD.

use crate::{OutputError, Result, ScoredLoans};
use regime_pd_data::Regime;
use regime_pd_model::mean;
use std::f64::consts::PI;
use tracing::warn;

/// Points on each density curve.
pub const GRID_POINTS: usize = 200;

/// Bandwidths the curve extends beyond the sample range on each side.
const CUT: f64 = 3.0;

/// Gaussian kernel density estimate with Scott's bandwidth.
#[derive(Debug, Clone, PartialEq)]
pub struct GaussianKde {
    samples: Vec<f64>,
    bandwidth: f64,
}

impl GaussianKde {
    /// Fit a density to `samples`.
    ///
    /// The bandwidth is the sample standard deviation times `n^(-1/5)`.
    ///
    /// # Errors
    /// [`OutputError::Degenerate`] with fewer than two samples or zero
    /// spread.
    pub fn new(samples: &[f64]) -> Result<Self> {
        let n = samples.len();
        if n < 2 {
            return Err(OutputError::Degenerate(format!("{n} samples")));
        }
        let centre = samples.iter().sum::<f64>() / n as f64;
        let variance =
            samples.iter().map(|x| (x - centre).powi(2)).sum::<f64>() / (n - 1) as f64;
        let bandwidth = variance.sqrt() * (n as f64).powf(-0.2);
        if !(bandwidth.is_finite() && bandwidth > 0.0) {
            return Err(OutputError::Degenerate("samples have no spread".to_string()));
        }
        Ok(Self {
            samples: samples.to_vec(),
            bandwidth,
        })
    }

    /// Kernel bandwidth.
    pub const fn bandwidth(&self) -> f64 {
        self.bandwidth
    }

    /// Density at `x`.
    pub fn evaluate(&self, x: f64) -> f64 {
        let norm = 1.0 / (self.samples.len() as f64 * self.bandwidth * (2.0 * PI).sqrt());
        self.samples
            .iter()
            .map(|s| {
                let z = (x - s) / self.bandwidth;
                (-0.5 * z * z).exp()
            })
            .sum::<f64>()
            * norm
    }

    /// `(x, density)` pairs over the sample range widened by three
    /// bandwidths.
    pub fn curve(&self, points: usize) -> Vec<(f64, f64)> {
        let (lo, hi) = self
            .samples
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), x| {
                (lo.min(*x), hi.max(*x))
            });
        linspace(lo - CUT * self.bandwidth, hi + CUT * self.bandwidth, points)
            .into_iter()
            .map(|x| (x, self.evaluate(x)))
            .collect()
    }
}

/// `points` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: f64, end: f64, points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (points - 1) as f64;
            (0..points).map(|i| start + step * i as f64).collect()
        }
    }
}

/// PD density and realised default rate of one regime.
#[derive(Debug, Clone, PartialEq)]
pub struct DensityCurve {
    /// Regime
    pub regime: Regime,
    /// `(pd, density)` pairs
    pub points: Vec<(f64, f64)>,
    /// Share of the regime's loans that defaulted
    pub observed_default_rate: f64,
}

/// Density curves for every regime with enough distinct PDs.
///
/// Regimes whose PDs cannot support a density are skipped with a warning.
pub fn regime_density_curves(scored: &ScoredLoans) -> Vec<DensityCurve> {
    Regime::ALL
        .into_iter()
        .filter_map(|regime| {
            let (pd, defaults) = scored.in_regime(regime);
            let observed_default_rate = mean(&defaults)?;
            match GaussianKde::new(&pd) {
                Ok(kde) => Some(DensityCurve {
                    regime,
                    points: kde.curve(GRID_POINTS),
                    observed_default_rate,
                }),
                Err(e) => {
                    warn!(%regime, error = %e, "skipping PD density");
                    None
                }
            }
        })
        .collect()
}
