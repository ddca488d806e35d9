//! Month-level alignment of loans with the macro series.

use crate::columns::{DATE, ISSUE_DATE, UNEMPLOYMENT_RATE, date_values, month_key, month_start};
use crate::{DataError, Result};
use polars::prelude::*;
use tracing::info;

const ROW_INDEX: &str = "__row_index";
const ISSUE_MONTH: &str = "issue_month";
const MONTH: &str = "month";

fn month_keys(df: &DataFrame, date_column: &str) -> Result<Vec<Option<i32>>> {
    Ok(date_values(df, date_column)?
        .into_iter()
        .map(|date| date.map(month_key))
        .collect())
}

/// Merge loan-level data with macroeconomic indicators.
///
/// Each loan receives the `unemployment_rate` of the macro observation in its
/// issue month, or null when that month is not covered. Rows are never dropped
/// and keep their original order.
///
/// # Errors
/// [`DataError::DuplicateMonth`] if the macro frame has several observations
/// for one month (the join would duplicate loans).
pub fn merge_loans_with_macro(loans: &DataFrame, macro_df: &DataFrame) -> Result<DataFrame> {
    let mut left = loans.clone();
    left.with_column(Series::new(ISSUE_MONTH.into(), month_keys(loans, ISSUE_DATE)?))?;

    let mut right = macro_df.select([UNEMPLOYMENT_RATE])?;
    right.with_column(Series::new(MONTH.into(), month_keys(macro_df, DATE)?))?;

    let mut keep: Vec<Expr> = loans
        .get_column_names()
        .iter()
        .map(|name| col(name.to_string()))
        .collect();
    keep.push(col(UNEMPLOYMENT_RATE));

    let merged = left
        .lazy()
        .with_row_index(ROW_INDEX, None)
        .join(
            right.lazy(),
            [col(ISSUE_MONTH)],
            [col(MONTH)],
            JoinArgs::new(JoinType::Left),
        )
        .sort([ROW_INDEX], SortMultipleOptions::default())
        .select(keep)
        .collect()?;

    if merged.height() != loans.height() {
        let month = duplicated_month(macro_df)?.unwrap_or_else(|| "unknown".to_string());
        return Err(DataError::DuplicateMonth { month });
    }

    let rates = merged.column(UNEMPLOYMENT_RATE)?;
    let matched = rates.len() - rates.null_count();
    info!(
        rows = merged.height(),
        matched,
        unmatched = merged.height() - matched,
        "merged loans with macro series"
    );
    Ok(merged)
}

fn duplicated_month(macro_df: &DataFrame) -> Result<Option<String>> {
    let mut keys: Vec<i32> = month_keys(macro_df, DATE)?.into_iter().flatten().collect();
    keys.sort_unstable();
    Ok(keys
        .windows(2)
        .find(|pair| pair[0] == pair[1])
        .and_then(|pair| month_start(pair[0]))
        .map(|date| date.format("%Y-%m").to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{LOAN_STATUS, date_series, float_values, string_values};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loans(dates: &[NaiveDate]) -> DataFrame {
        let ids: Vec<String> = (0..dates.len()).map(|i| format!("loan-{i}")).collect();
        DataFrame::new(vec![
            Column::new(LOAN_STATUS.into(), ids),
            date_series(ISSUE_DATE, dates).unwrap().into(),
        ])
        .unwrap()
    }

    fn macro_frame(dates: &[NaiveDate], rates: &[f64]) -> DataFrame {
        DataFrame::new(vec![
            date_series(DATE, dates).unwrap().into(),
            Column::new(UNEMPLOYMENT_RATE.into(), rates.to_vec()),
        ])
        .unwrap()
    }

    #[test]
    fn test_merge_matches_by_month() {
        let loans = loans(&[date(2015, 3, 1), date(2015, 1, 1), date(2016, 7, 1)]);
        // Macro dates mid-month still align with the issue month.
        let macro_df = macro_frame(&[date(2015, 1, 15), date(2015, 3, 31)], &[5.7, 5.4]);

        let merged = merge_loans_with_macro(&loans, &macro_df).unwrap();

        assert_eq!(merged.height(), 3);
        assert_eq!(
            float_values(&merged, UNEMPLOYMENT_RATE).unwrap(),
            vec![Some(5.4), Some(5.7), None]
        );
        // Original order is preserved.
        assert_eq!(
            string_values(&merged, LOAN_STATUS).unwrap(),
            vec![
                Some("loan-0".to_string()),
                Some("loan-1".to_string()),
                Some("loan-2".to_string())
            ]
        );
    }

    #[test]
    fn test_merge_drops_helper_columns() {
        let loans = loans(&[date(2015, 1, 1)]);
        let macro_df = macro_frame(&[date(2015, 1, 1)], &[5.7]);
        let merged = merge_loans_with_macro(&loans, &macro_df).unwrap();

        let names: Vec<String> = merged
            .get_column_names()
            .iter()
            .map(|n| n.to_string())
            .collect();
        assert_eq!(names, vec![LOAN_STATUS, ISSUE_DATE, UNEMPLOYMENT_RATE]);
    }

    #[test]
    fn test_merge_rejects_duplicate_months() {
        let loans = loans(&[date(2015, 1, 1)]);
        let macro_df = macro_frame(&[date(2015, 1, 1), date(2015, 1, 20)], &[5.7, 5.8]);
        let err = merge_loans_with_macro(&loans, &macro_df).unwrap_err();
        assert!(matches!(err, DataError::DuplicateMonth { ref month } if month == "2015-01"));
    }
}
