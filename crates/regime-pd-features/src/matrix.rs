//! Named design matrix.

use crate::{FeatureError, Result};
use ndarray::{Array2, ArrayView1, Axis, concatenate};

/// Dense feature matrix with one name per column.
///
/// Missing values are stored as `NaN` until imputed.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureMatrix {
    names: Vec<String>,
    values: Array2<f64>,
}

impl FeatureMatrix {
    /// Pair a matrix with its column names.
    ///
    /// # Errors
    /// [`FeatureError::DimensionMismatch`] when the name count differs from
    /// the column count.
    pub fn new(names: Vec<String>, values: Array2<f64>) -> Result<Self> {
        if names.len() != values.ncols() {
            return Err(FeatureError::DimensionMismatch {
                expected: values.ncols(),
                actual: names.len(),
            });
        }
        Ok(Self { names, values })
    }

    /// Column names, in matrix order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Underlying values.
    pub const fn values(&self) -> &Array2<f64> {
        &self.values
    }

    /// Consume the matrix, returning names and values.
    pub fn into_parts(self) -> (Vec<String>, Array2<f64>) {
        (self.names, self.values)
    }

    /// Number of rows.
    pub fn nrows(&self) -> usize {
        self.values.nrows()
    }

    /// Number of columns.
    pub fn ncols(&self) -> usize {
        self.values.ncols()
    }

    /// Position of a named column.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// View of a named column.
    pub fn column(&self, name: &str) -> Option<ArrayView1<'_, f64>> {
        self.column_index(name)
            .map(|index| self.values.column(index))
    }

    /// Append the columns of `other` to the right of this matrix.
    ///
    /// # Errors
    /// Fails when the row counts differ.
    pub fn hstack(&self, other: &Self) -> Result<Self> {
        if self.nrows() != other.nrows() {
            return Err(FeatureError::DimensionMismatch {
                expected: self.nrows(),
                actual: other.nrows(),
            });
        }
        let values = concatenate(Axis(1), &[self.values.view(), other.values.view()])?;
        let names = self.names.iter().chain(&other.names).cloned().collect();
        Self::new(names, values)
    }

    /// Keep only the rows where `mask` is true.
    ///
    /// # Errors
    /// Fails when the mask length differs from the row count.
    pub fn filter_rows(&self, mask: &[bool]) -> Result<Self> {
        if mask.len() != self.nrows() {
            return Err(FeatureError::DimensionMismatch {
                expected: self.nrows(),
                actual: mask.len(),
            });
        }
        let rows: Vec<usize> = (0..mask.len()).filter(|&i| mask[i]).collect();
        Ok(Self {
            names: self.names.clone(),
            values: self.values.select(Axis(0), &rows),
        })
    }

    /// Number of missing (`NaN`) cells.
    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_nan()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_checks_names() {
        let err = FeatureMatrix::new(names(&["a"]), array![[1.0, 2.0]]).unwrap_err();
        assert!(matches!(
            err,
            FeatureError::DimensionMismatch {
                expected: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_hstack() {
        let left = FeatureMatrix::new(names(&["a"]), array![[1.0], [2.0]]).unwrap();
        let right = FeatureMatrix::new(names(&["b", "c"]), array![[3.0, 4.0], [5.0, 6.0]]).unwrap();

        let joined = left.hstack(&right).unwrap();
        assert_eq!(joined.names(), &names(&["a", "b", "c"])[..]);
        assert_eq!(joined.values(), &array![[1.0, 3.0, 4.0], [2.0, 5.0, 6.0]]);
        assert_eq!(joined.column("c").unwrap().to_vec(), vec![4.0, 6.0]);
    }

    #[test]
    fn test_hstack_row_mismatch() {
        let left = FeatureMatrix::new(names(&["a"]), array![[1.0], [2.0]]).unwrap();
        let right = FeatureMatrix::new(names(&["b"]), array![[3.0]]).unwrap();
        assert!(left.hstack(&right).is_err());
    }

    #[test]
    fn test_filter_rows_and_missing() {
        let values = array![[1.0, f64::NAN], [2.0, 3.0], [f64::NAN, 4.0]];
        let matrix = FeatureMatrix::new(names(&["a", "b"]), values).unwrap();
        assert_eq!(matrix.missing_count(), 2);

        let kept = matrix.filter_rows(&[false, true, true]).unwrap();
        assert_eq!(kept.nrows(), 2);
        assert_eq!(kept.column("b").unwrap().to_vec(), vec![3.0, 4.0]);
    }
}
