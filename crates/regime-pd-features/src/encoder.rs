//! One-hot encoding of categorical loan attributes.
//!
//! Levels are learned once, sorted lexicographically, and the first level of
//! each column is the dropped reference. Encoding another frame with the same
//! encoder always produces the same columns in the same order.

use crate::Result;
use ndarray::Array2;
use polars::prelude::DataFrame;
use regime_pd_data::columns::string_values;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Fitted levels of one categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryLevels {
    /// Source column name
    pub column: String,
    /// Distinct levels in sorted order; the first one is the reference
    pub levels: Vec<String>,
}

impl CategoryLevels {
    /// Reference (dropped) level.
    pub fn reference(&self) -> Option<&str> {
        self.levels.first().map(String::as_str)
    }

    /// Levels that get an indicator column.
    pub fn encoded(&self) -> &[String] {
        self.levels.get(1..).unwrap_or_default()
    }
}

/// Drop-first one-hot encoder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryEncoder {
    categories: Vec<CategoryLevels>,
}

fn normalise(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl CategoryEncoder {
    /// Learn the distinct non-null levels of each column.
    ///
    /// Values are trimmed before comparison; blank cells count as missing.
    ///
    /// # Errors
    /// Fails if a column is absent from the frame.
    pub fn fit(df: &DataFrame, columns: &[&str]) -> Result<Self> {
        let categories = columns
            .iter()
            .map(|column| -> Result<CategoryLevels> {
                let levels: BTreeSet<String> = string_values(df, column)?
                    .into_iter()
                    .filter_map(normalise)
                    .collect();
                Ok(CategoryLevels {
                    column: column.to_string(),
                    levels: levels.into_iter().collect(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { categories })
    }

    /// Fitted levels per column.
    pub fn categories(&self) -> &[CategoryLevels] {
        &self.categories
    }

    /// Names of the indicator columns, `{column}_{level}`.
    pub fn feature_names(&self) -> Vec<String> {
        self.categories
            .iter()
            .flat_map(|category| {
                category
                    .encoded()
                    .iter()
                    .map(move |level| format!("{}_{level}", category.column))
            })
            .collect()
    }

    /// Encode a frame with the fitted levels.
    ///
    /// Null and unseen values encode to all zeros.
    ///
    /// # Errors
    /// Fails if a fitted column is absent from the frame.
    pub fn transform(&self, df: &DataFrame) -> Result<Array2<f64>> {
        let width: usize = self.categories.iter().map(|c| c.encoded().len()).sum();
        let mut encoded = Array2::zeros((df.height(), width));

        let mut offset = 0;
        for category in &self.categories {
            let levels = category.encoded();
            for (row, value) in string_values(df, &category.column)?
                .into_iter()
                .map(normalise)
                .enumerate()
            {
                let hit = value
                    .as_ref()
                    .and_then(|v| levels.iter().position(|level| level == v));
                if let Some(position) = hit {
                    encoded[[row, offset + position]] = 1.0;
                }
            }
            offset += levels.len();
        }
        Ok(encoded)
    }
}
