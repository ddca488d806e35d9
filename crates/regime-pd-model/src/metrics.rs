//! Discrimination and distribution metrics.

use crate::{ModelError, Result};
use ndarray::Array1;
use std::cmp::Ordering;

/// Area under the ROC curve.
///
/// Computed as the normalised Mann–Whitney statistic: the probability that a
/// random positive scores above a random negative, with ties counting half.
///
/// # Errors
/// [`ModelError::SingleClass`] when only one class is present,
/// [`ModelError::DimensionMismatch`] for unequal lengths and
/// [`ModelError::NonFinite`] for NaN scores.
pub fn roc_auc(y_true: &Array1<f64>, scores: &Array1<f64>) -> Result<f64> {
    if y_true.len() != scores.len() {
        return Err(ModelError::DimensionMismatch {
            expected: y_true.len(),
            actual: scores.len(),
        });
    }
    if scores.iter().any(|s| s.is_nan()) {
        return Err(ModelError::NonFinite("scores".to_string()));
    }

    let positives = y_true.iter().filter(|&&y| y == 1.0).count();
    let negatives = y_true.len() - positives;
    if positives == 0 || negatives == 0 {
        return Err(ModelError::SingleClass {
            positives,
            total: y_true.len(),
        });
    }

    let mut order: Vec<usize> = (0..scores.len()).collect();
    order.sort_by(|&a, &b| scores[a].partial_cmp(&scores[b]).unwrap_or(Ordering::Equal));

    // Sum of (1-based, tie-averaged) ranks of the positives.
    let mut positive_rank_sum = 0.0;
    let mut start = 0;
    while start < order.len() {
        let mut end = start + 1;
        while end < order.len() && scores[order[end]] == scores[order[start]] {
            end += 1;
        }
        let average_rank = (start + end + 1) as f64 / 2.0;
        let tied_positives = order[start..end]
            .iter()
            .filter(|&&i| y_true[i] == 1.0)
            .count();
        positive_rank_sum += average_rank * tied_positives as f64;
        start = end;
    }

    let n_pos = positives as f64;
    let n_neg = negatives as f64;
    Ok((positive_rank_sum - n_pos * (n_pos + 1.0) / 2.0) / (n_pos * n_neg))
}

/// Arithmetic mean, `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Percentile `q` (0–100) with linear interpolation between order statistics.
///
/// Returns `None` for an empty slice or `q` outside `[0, 100]`.
pub fn percentile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() || !(0.0..=100.0).contains(&q) {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let position = (sorted.len() - 1) as f64 * q / 100.0;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}
