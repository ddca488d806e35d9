//! Dense symmetric positive definite solves.

use ndarray::{Array1, Array2};

/// Relative diagonal jitter tried when a factorisation fails.
const JITTER_STEPS: [f64; 4] = [1e-12, 1e-10, 1e-8, 1e-6];

/// Lower-triangular Cholesky factor of `a`, or `None` if `a` is not
/// numerically positive definite.
fn cholesky(a: &Array2<f64>) -> Option<Array2<f64>> {
    let n = a.nrows();
    let mut l = Array2::<f64>::zeros((n, n));

    for j in 0..n {
        let mut diag = a[[j, j]];
        for k in 0..j {
            diag -= l[[j, k]] * l[[j, k]];
        }
        if !diag.is_finite() || diag <= 0.0 {
            return None;
        }
        let pivot = diag.sqrt();
        l[[j, j]] = pivot;

        for i in (j + 1)..n {
            let mut sum = a[[i, j]];
            for k in 0..j {
                sum -= l[[i, k]] * l[[j, k]];
            }
            l[[i, j]] = sum / pivot;
        }
    }
    Some(l)
}

fn solve_factored(l: &Array2<f64>, b: &Array1<f64>) -> Array1<f64> {
    let n = b.len();

    // L y = b
    let mut y = Array1::<f64>::zeros(n);
    for i in 0..n {
        let mut sum = b[i];
        for k in 0..i {
            sum -= l[[i, k]] * y[k];
        }
        y[i] = sum / l[[i, i]];
    }

    // Lᵀ x = y
    let mut x = Array1::<f64>::zeros(n);
    for i in (0..n).rev() {
        let mut sum = y[i];
        for k in (i + 1)..n {
            sum -= l[[k, i]] * x[k];
        }
        x[i] = sum / l[[i, i]];
    }
    x
}

/// Solve `a x = b` for symmetric positive definite `a`.
///
/// When `a` is only semi-definite a small multiple of its mean diagonal is
/// added before retrying. Returns `None` if every attempt fails.
pub(crate) fn solve_spd(a: &Array2<f64>, b: &Array1<f64>) -> Option<Array1<f64>> {
    if let Some(l) = cholesky(a) {
        return Some(solve_factored(&l, b));
    }

    let n = a.nrows();
    let scale = (a.diag().sum() / n.max(1) as f64).abs().max(1.0);
    JITTER_STEPS.iter().find_map(|step| {
        let mut jittered = a.clone();
        jittered.diag_mut().mapv_inplace(|d| d + step * scale);
        cholesky(&jittered).map(|l| solve_factored(&l, b))
    })
}
