//! L2-regularised binary logistic regression.
//!
//! Minimises
//!
//! ```text
//! 0.5 * ||w||² + C * Σᵢ [log(1 + exp(ηᵢ)) - yᵢ ηᵢ],   ηᵢ = b + xᵢ·w
//! ```
//!
//! with an unpenalised intercept `b`. Columns are standardised internally and
//! the penalty is rescaled accordingly, so the minimiser is the one of the
//! problem above on the original columns. The solver is a damped Newton
//! method with an Armijo backtracking line search.

use crate::linalg::solve_spd;
use crate::{ModelError, Result};
use ndarray::{Array1, Array2, ArrayView1, Axis, Slice};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Armijo sufficient-decrease constant.
const ARMIJO: f64 = 1e-4;

/// Smallest line-search step before giving up on an iteration.
const MIN_STEP: f64 = 1e-10;

/// Solver configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogisticConfig {
    /// Inverse regularisation strength
    pub c: f64,
    /// Maximum Newton iterations
    pub max_iter: usize,
    /// Relative step tolerance for convergence
    pub tol: f64,
}

impl Default for LogisticConfig {
    fn default() -> Self {
        Self::baseline()
    }
}

impl LogisticConfig {
    /// Configuration used for the baseline model.
    pub const fn baseline() -> Self {
        Self {
            c: 1.0,
            max_iter: 2000,
            tol: 1e-8,
        }
    }

    /// Configuration used for the regime-aware model.
    pub const fn regime_aware() -> Self {
        Self {
            c: 1.0,
            max_iter: 3000,
            tol: 1e-8,
        }
    }

    /// Override the iteration bound.
    pub const fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = max_iter;
        self
    }

    fn validate(&self) -> Result<()> {
        if !(self.c.is_finite() && self.c > 0.0) {
            return Err(ModelError::InvalidParameter(format!(
                "C must be positive, got {}",
                self.c
            )));
        }
        if self.max_iter == 0 {
            return Err(ModelError::InvalidParameter(
                "max_iter must be at least 1".to_string(),
            ));
        }
        if !(self.tol.is_finite() && self.tol > 0.0) {
            return Err(ModelError::InvalidParameter(format!(
                "tol must be positive, got {}",
                self.tol
            )));
        }
        Ok(())
    }
}

/// Outcome of a fit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitReport {
    /// Whether the step tolerance was reached
    pub converged: bool,
    /// Newton iterations performed
    pub iterations: usize,
    /// Final objective value
    pub objective: f64,
    /// Largest absolute gradient component seen at the last iteration
    pub gradient_norm: f64,
}

/// Fitted logistic regression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    coefficients: Vec<f64>,
    intercept: f64,
    report: FitReport,
}

/// Numerically stable logistic function.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let exp_z = z.exp();
        exp_z / (1.0 + exp_z)
    }
}

/// `log(1 + exp(z))` without overflow.
fn softplus(z: f64) -> f64 {
    if z > 0.0 {
        z + (-z).exp().ln_1p()
    } else {
        z.exp().ln_1p()
    }
}

/// Standardised design with a leading intercept column.
struct Design {
    z: Array2<f64>,
    means: Array1<f64>,
    scales: Array1<f64>,
}

impl Design {
    fn new(x: &Array2<f64>) -> Self {
        let (n, p) = x.dim();
        let means = x
            .mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(p));
        let mut scales = x.std_axis(Axis(0), 0.0);
        for (scale, mean) in scales.iter_mut().zip(means.iter()) {
            if *scale <= f64::EPSILON * mean.abs().max(1.0) {
                *scale = 1.0;
            }
        }

        let mut z = Array2::<f64>::ones((n, p + 1));
        let mut body = z.slice_axis_mut(Axis(1), Slice::from(1..));
        body.assign(x);
        body -= &means;
        body /= &scales;
        Self { z, means, scales }
    }

    /// Penalty weights on the standardised coefficients (intercept free).
    fn penalty(&self) -> Array1<f64> {
        let mut d = Array1::<f64>::zeros(self.scales.len() + 1);
        for (dj, scale) in d.iter_mut().skip(1).zip(self.scales.iter()) {
            *dj = 1.0 / (scale * scale);
        }
        d
    }
}

fn objective(
    z: &Array2<f64>,
    y: &Array1<f64>,
    penalty: &Array1<f64>,
    c: f64,
    beta: &Array1<f64>,
) -> f64 {
    let eta = z.dot(beta);
    let loss: f64 = eta
        .iter()
        .zip(y.iter())
        .map(|(&e, &yi)| softplus(e) - yi * e)
        .sum();
    let ridge: f64 = penalty
        .iter()
        .zip(beta.iter())
        .map(|(d, b)| d * b * b)
        .sum();
    c * loss + 0.5 * ridge
}

fn validate_inputs(x: &Array2<f64>, y: &Array1<f64>) -> Result<()> {
    if x.nrows() == 0 {
        return Err(ModelError::Empty("training matrix has no rows".to_string()));
    }
    if y.len() != x.nrows() {
        return Err(ModelError::DimensionMismatch {
            expected: x.nrows(),
            actual: y.len(),
        });
    }
    if x.iter().any(|v| !v.is_finite()) {
        return Err(ModelError::NonFinite("feature matrix".to_string()));
    }
    if y.iter().any(|&v| v != 0.0 && v != 1.0) {
        return Err(ModelError::InvalidParameter(
            "labels must be 0 or 1".to_string(),
        ));
    }
    let positives = y.iter().filter(|&&v| v == 1.0).count();
    if positives == 0 || positives == y.len() {
        return Err(ModelError::SingleClass {
            positives,
            total: y.len(),
        });
    }
    Ok(())
}

impl LogisticRegression {
    /// Fit the model.
    ///
    /// Not reaching the tolerance within `max_iter` iterations is logged and
    /// reported in [`FitReport::converged`]; the current estimate is returned.
    ///
    /// # Errors
    /// Empty or non-finite input, labels outside `{0, 1}`, a single class,
    /// invalid configuration, or a Newton system that cannot be solved.
    pub fn fit(x: &Array2<f64>, y: &Array1<f64>, config: &LogisticConfig) -> Result<Self> {
        config.validate()?;
        validate_inputs(x, y)?;

        let design = Design::new(x);
        let z = &design.z;
        let penalty = design.penalty();
        let c = config.c;

        let mut beta = Array1::<f64>::zeros(z.ncols());
        let mut current = objective(z, y, &penalty, c, &beta);
        let mut converged = false;
        let mut iterations = 0;
        let mut gradient_norm = f64::INFINITY;

        for iteration in 1..=config.max_iter {
            iterations = iteration;

            let probabilities = z.dot(&beta).mapv(sigmoid);
            let residuals = &probabilities - y;
            let gradient = z.t().dot(&residuals) * c + &penalty * &beta;
            gradient_norm = gradient.iter().fold(0.0_f64, |m, g| m.max(g.abs()));
            if gradient_norm == 0.0 {
                converged = true;
                break;
            }

            let weights = probabilities.mapv(|p| c * p * (1.0 - p));
            let weighted = z * &weights.insert_axis(Axis(1));
            let mut hessian = z.t().dot(&weighted);
            hessian.diag_mut().zip_mut_with(&penalty, |h, d| *h += d);

            let direction = solve_spd(&hessian, &-&gradient)
                .ok_or(ModelError::Singular { iteration })?;
            let slope = gradient.dot(&direction);

            let slack = 10.0 * f64::EPSILON * current.abs();
            let mut step = 1.0;
            let mut accepted = None;
            while step >= MIN_STEP {
                let candidate = &beta + &(&direction * step);
                let value = objective(z, y, &penalty, c, &candidate);
                if value <= current + ARMIJO * step * slope + slack {
                    accepted = Some((candidate, value));
                    break;
                }
                step *= 0.5;
            }

            let Some((next, value)) = accepted else {
                debug!(iteration, objective = current, "line search stalled");
                break;
            };

            let change = (&next - &beta).iter().fold(0.0_f64, |m, v| m.max(v.abs()));
            let size = next.iter().fold(0.0_f64, |m, v| m.max(v.abs()));
            beta = next;
            current = value;
            debug!(iteration, objective = current, step, change, "newton step");

            if change <= config.tol * (1.0 + size) {
                converged = true;
                break;
            }
        }

        if !converged {
            debug!(
                iterations,
                max_iter = config.max_iter,
                gradient_norm,
                "logistic regression did not converge"
            );
        }

        let mut coefficients = Vec::with_capacity(design.scales.len());
        let mut intercept = beta[0];
        for ((b, scale), mean) in beta
            .iter()
            .skip(1)
            .zip(design.scales.iter())
            .zip(design.means.iter())
        {
            let w = b / scale;
            intercept -= w * mean;
            coefficients.push(w);
        }

        Ok(Self {
            coefficients,
            intercept,
            report: FitReport {
                converged,
                iterations,
                objective: current,
                gradient_norm,
            },
        })
    }

    /// Coefficients on the original feature scale.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Intercept.
    pub const fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Fit diagnostics.
    pub const fn report(&self) -> &FitReport {
        &self.report
    }

    /// Number of features the model expects.
    pub fn n_features(&self) -> usize {
        self.coefficients.len()
    }

    /// Log-odds for each row of `x`.
    ///
    /// # Errors
    /// [`ModelError::DimensionMismatch`] when `x` has the wrong width.
    pub fn decision_function(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        if x.ncols() != self.coefficients.len() {
            return Err(ModelError::DimensionMismatch {
                expected: self.coefficients.len(),
                actual: x.ncols(),
            });
        }
        Ok(x.dot(&ArrayView1::from(&self.coefficients[..])) + self.intercept)
    }

    /// Probability of the positive class for each row of `x`.
    ///
    /// # Errors
    /// [`ModelError::DimensionMismatch`] when `x` has the wrong width.
    pub fn predict_proba(&self, x: &Array2<f64>) -> Result<Array1<f64>> {
        Ok(self.decision_function(x)?.mapv(sigmoid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    /// Synthetic data with known signal on very different scales.
    fn synthetic(n: usize, seed: u64) -> (Array2<f64>, Array1<f64>) {
        let mut rng = StdRng::seed_from_u64(seed);
        let mut x = Array2::<f64>::zeros((n, 3));
        let mut y = Array1::<f64>::zeros(n);
        for i in 0..n {
            let amount: f64 = rng.gen_range(1_000.0..40_000.0);
            let rate: f64 = rng.gen_range(5.0..30.0);
            let flag = if rng.gen_bool(0.3) { 1.0 } else { 0.0 };
            x[[i, 0]] = amount;
            x[[i, 1]] = rate;
            x[[i, 2]] = flag;
            let eta = -4.0 + 0.00002 * amount + 0.15 * rate + 0.5 * flag;
            y[i] = if rng.r#gen::<f64>() < sigmoid(eta) { 1.0 } else { 0.0 };
        }
        (x, y)
    }

    /// Gradient of the unscaled objective at a fitted model.
    fn raw_gradient(
        model: &LogisticRegression,
        x: &Array2<f64>,
        y: &Array1<f64>,
        c: f64,
    ) -> Vec<f64> {
        let residuals = model.predict_proba(x).unwrap() - y;
        let mut gradient = vec![c * residuals.sum()];
        for (j, w) in model.coefficients().iter().enumerate() {
            gradient.push(c * x.column(j).dot(&residuals) + w);
        }
        gradient
    }

    #[test]
    fn test_design_standardises_behind_intercept() {
        let x = array![[1.0, 5.0], [3.0, 5.0], [5.0, 5.0]];
        let design = Design::new(&x);

        assert_eq!(design.z.dim(), (3, 3));
        assert!(design.z.column(0).iter().all(|&v| v == 1.0));
        assert_relative_eq!(design.means[0], 3.0);
        assert_relative_eq!(design.z[[0, 1]], -design.z[[2, 1]]);
        assert_relative_eq!(design.z[[1, 1]], 0.0);
        // constant column keeps unit scale and centres to zero
        assert_relative_eq!(design.scales[1], 1.0);
        assert!(design.z.column(2).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_fit_reaches_stationary_point() {
        let (x, y) = synthetic(2_000, 7);
        let config = LogisticConfig::baseline();
        let model = LogisticRegression::fit(&x, &y, &config).unwrap();

        assert!(model.report().converged);
        assert!(model.report().iterations < 50);

        let gradient = raw_gradient(&model, &x, &y, config.c);
        // Scale each component by its column magnitude.
        let scales = [1.0, 40_000.0, 30.0, 1.0];
        for (g, scale) in gradient.iter().zip(scales) {
            assert!((g / scale).abs() < 1e-4, "gradient component {g}");
        }
        assert!(model.coefficients()[1] > 0.0);
    }

    #[test]
    fn test_stronger_penalty_shrinks_coefficients() {
        let (x, y) = synthetic(1_000, 11);
        let loose = LogisticRegression::fit(&x, &y, &LogisticConfig::baseline()).unwrap();
        let tight_config = LogisticConfig {
            c: 1e-4,
            ..LogisticConfig::baseline()
        };
        let tight = LogisticRegression::fit(&x, &y, &tight_config).unwrap();
        assert!(tight.coefficients()[2].abs() < loose.coefficients()[2].abs());
    }

    #[test]
    fn test_separable_data_stays_finite() {
        let x = array![[-2.0], [-1.0], [1.0], [2.0]];
        let y = array![0.0, 0.0, 1.0, 1.0];
        let model = LogisticRegression::fit(&x, &y, &LogisticConfig::baseline()).unwrap();

        assert!(model.report().converged);
        assert!(model.coefficients()[0].is_finite());
        let p = model.predict_proba(&x).unwrap();
        assert!(p[0] < 0.5 && p[3] > 0.5);
        // Symmetric data: intercept is zero.
        assert_relative_eq!(model.intercept(), 0.0, epsilon = 1e-8);
    }

    #[test]
    fn test_constant_column_gets_zero_weight() {
        let x = array![[1.0, 5.0], [2.0, 5.0], [3.0, 5.0], [4.0, 5.0], [2.5, 5.0]];
        let y = array![0.0, 1.0, 0.0, 1.0, 1.0];
        let model = LogisticRegression::fit(&x, &y, &LogisticConfig::baseline()).unwrap();
        assert_relative_eq!(model.coefficients()[1], 0.0, epsilon = 1e-10);
    }

    #[test]
    fn test_iteration_cap_is_not_fatal() {
        let (x, y) = synthetic(500, 3);
        let config = LogisticConfig::baseline().with_max_iter(1);
        let model = LogisticRegression::fit(&x, &y, &config).unwrap();
        assert!(!model.report().converged);
        assert_eq!(model.report().iterations, 1);
    }

    #[test]
    fn test_single_class_is_rejected() {
        let x = array![[1.0], [2.0]];
        let y = array![0.0, 0.0];
        assert!(matches!(
            LogisticRegression::fit(&x, &y, &LogisticConfig::default()),
            Err(ModelError::SingleClass {
                positives: 0,
                total: 2
            })
        ));
    }

    #[test]
    fn test_rejects_bad_input() {
        let y = array![0.0, 1.0];
        let nan = array![[1.0], [f64::NAN]];
        assert!(matches!(
            LogisticRegression::fit(&nan, &y, &LogisticConfig::default()),
            Err(ModelError::NonFinite(_))
        ));

        let short = array![[1.0]];
        assert!(matches!(
            LogisticRegression::fit(&short, &y, &LogisticConfig::default()),
            Err(ModelError::DimensionMismatch { .. })
        ));

        let bad_c = LogisticConfig {
            c: 0.0,
            ..LogisticConfig::default()
        };
        assert!(LogisticRegression::fit(&array![[1.0], [2.0]], &y, &bad_c).is_err());
    }

    #[test]
    fn test_predict_width_mismatch() {
        let x = array![[-1.0], [1.0], [0.5], [-0.5]];
        let y = array![0.0, 1.0, 1.0, 0.0];
        let model = LogisticRegression::fit(&x, &y, &LogisticConfig::default()).unwrap();
        assert!(model.predict_proba(&array![[1.0, 2.0]]).is_err());
    }

    #[test]
    fn test_sigmoid_is_stable() {
        assert_relative_eq!(sigmoid(0.0), 0.5);
        assert_relative_eq!(sigmoid(800.0), 1.0);
        assert_relative_eq!(sigmoid(-800.0), 0.0);
        assert_relative_eq!(softplus(800.0), 800.0);
        assert!(softplus(-800.0) >= 0.0);
    }
}
