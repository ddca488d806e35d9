//! Raw CSV loading.
//!
//! Both loaders read every column as text and convert the columns they need
//! explicitly, so that type problems surface as errors naming the offending
//! cell instead of as silently inferred schemas.

use crate::columns::{
    DATE, NUMERIC_FEATURES, REQUIRED_LOAN_COLUMNS, UNEMPLOYMENT_RATE, date_series, month_key,
    string_values,
};
use crate::{DataError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use std::collections::HashSet;
use std::path::Path;
use tracing::info;

/// Accepted names of the macro date column, checked in priority order
/// (case-insensitive, after trimming whitespace).
pub const DATE_ALIASES: [&str; 2] = ["date", "observation_date"];

/// Name of the unemployment rate column in FRED exports.
pub const UNRATE: &str = "UNRATE";

/// Date formats accepted for macro observations.
const MACRO_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(DataError::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Scan a CSV with every column typed as text.
fn scan_text_csv(path: &Path) -> Result<LazyFrame> {
    Ok(LazyCsvReader::new(path)
        .with_has_header(true)
        .with_infer_schema_length(Some(0))
        .finish()?)
}

/// Parse a numeric cell. Whitespace and a trailing `%` are ignored. Blanks and
/// non-finite values such as `NaN` or `inf` are missing values.
pub(crate) fn parse_numeric_cell(
    column: &str,
    row: usize,
    cell: Option<&str>,
) -> Result<Option<f64>> {
    let Some(text) = cell else {
        return Ok(None);
    };
    let trimmed = text.trim().trim_end_matches('%').trim_end();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse::<f64>()
        .map(|value| value.is_finite().then_some(value))
        .map_err(|_| {
            DataError::Parse(format!(
                "column {column}, row {row}: cannot parse {text:?} as a number"
            ))
        })
}

fn numeric_series(df: &DataFrame, name: &str) -> Result<Series> {
    let values = string_values(df, name)?
        .iter()
        .enumerate()
        .map(|(row, cell)| parse_numeric_cell(name, row, cell.as_deref()))
        .collect::<Result<Vec<_>>>()?;
    Ok(Series::new(name.into(), values))
}

/// Load LendingClub loan-level data.
///
/// Only [`REQUIRED_LOAN_COLUMNS`] are kept; a file lacking any of them fails
/// with the polars column-not-found error. Numeric columns come back as
/// nullable `Float64`, everything else as `String`.
///
/// # Errors
/// [`DataError::FileNotFound`] when `path` does not exist, [`DataError::Parse`]
/// for non-numeric text in a numeric column.
pub fn load_loans(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    ensure_exists(path)?;

    let selection: Vec<Expr> = REQUIRED_LOAN_COLUMNS.iter().map(|name| col(*name)).collect();
    let mut loans = scan_text_csv(path)?.select(selection).collect()?;

    for name in NUMERIC_FEATURES {
        let parsed = numeric_series(&loans, name)?;
        loans.with_column(parsed)?;
    }

    info!(rows = loans.height(), path = %path.display(), "loaded loan file");
    Ok(loans)
}

/// Raw header names resolved for the macro file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacroSchema {
    /// Raw header of the date column
    pub date_column: String,
    /// Raw header of the unemployment rate column
    pub unrate_column: String,
}

impl MacroSchema {
    /// Resolve the date and unemployment columns from raw headers.
    ///
    /// # Errors
    /// [`DataError::Schema`] listing the (trimmed) headers when either column
    /// cannot be found.
    pub fn resolve(headers: &[String]) -> Result<Self> {
        let available: Vec<String> = headers.iter().map(|h| h.trim().to_string()).collect();

        let date_column = DATE_ALIASES
            .iter()
            .find_map(|alias| {
                headers
                    .iter()
                    .find(|header| header.trim().eq_ignore_ascii_case(alias))
            })
            .ok_or_else(|| DataError::Schema {
                missing: "date".to_string(),
                available: available.clone(),
            })?;

        let unrate_column = headers
            .iter()
            .find(|header| header.trim() == UNRATE)
            .ok_or_else(|| DataError::Schema {
                missing: UNRATE.to_string(),
                available,
            })?;

        Ok(Self {
            date_column: date_column.clone(),
            unrate_column: unrate_column.clone(),
        })
    }
}

/// Parse a macro observation date.
pub fn parse_macro_date(text: &str) -> Option<NaiveDate> {
    let trimmed = text.trim();
    MACRO_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .or_else(|| NaiveDate::parse_from_str(&format!("{trimmed}-01"), "%Y-%m-%d").ok())
}

/// Load FRED macroeconomic data.
///
/// Returns a frame with exactly two columns, `date` (`Date`) and
/// `unemployment_rate` (`Float64`), one row per month.
///
/// # Errors
/// [`DataError::FileNotFound`], [`DataError::Schema`] when the date or
/// `UNRATE` column is absent, [`DataError::Parse`] for malformed cells and
/// [`DataError::DuplicateMonth`] when a month appears twice.
pub fn load_macro(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    ensure_exists(path)?;

    let raw = scan_text_csv(path)?.collect()?;
    let headers: Vec<String> = raw
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();
    let schema = MacroSchema::resolve(&headers)?;

    let raw_dates = string_values(&raw, &schema.date_column)?;
    let raw_rates = string_values(&raw, &schema.unrate_column)?;

    let mut dates = Vec::with_capacity(raw.height());
    let mut rates = Vec::with_capacity(raw.height());
    let mut seen_months = HashSet::new();

    for (row, (raw_date, raw_rate)) in raw_dates.iter().zip(&raw_rates).enumerate() {
        let text = raw_date.as_deref().unwrap_or_default();
        let date = parse_macro_date(text).ok_or_else(|| {
            DataError::Parse(format!("column {DATE}, row {row}: invalid date {text:?}"))
        })?;
        if !seen_months.insert(month_key(date)) {
            return Err(DataError::DuplicateMonth {
                month: date.format("%Y-%m").to_string(),
            });
        }
        dates.push(date);
        rates.push(parse_numeric_cell(UNEMPLOYMENT_RATE, row, raw_rate.as_deref())?);
    }

    let macro_df = DataFrame::new(vec![
        date_series(DATE, &dates)?.into(),
        Column::new(UNEMPLOYMENT_RATE.into(), rates),
    ])?;

    info!(rows = macro_df.height(), path = %path.display(), "loaded macro file");
    Ok(macro_df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    #[rstest]
    #[case(&["DATE", "UNRATE"], "DATE")]
    #[case(&["observation_date", "UNRATE"], "observation_date")]
    #[case(&[" Date ", " UNRATE "], " Date ")]
    #[case(&["observation_date", "date", "UNRATE"], "date")]
    fn test_resolve_date_alias(#[case] names: &[&str], #[case] expected: &str) {
        let schema = MacroSchema::resolve(&headers(names)).unwrap();
        assert_eq!(schema.date_column, expected);
    }

    #[test]
    fn test_resolve_requires_literal_unrate() {
        let err = MacroSchema::resolve(&headers(&["date", "unrate"])).unwrap_err();
        match err {
            DataError::Schema { missing, available } => {
                assert_eq!(missing, UNRATE);
                assert_eq!(available, vec!["date", "unrate"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_resolve_reports_available_columns() {
        let err = MacroSchema::resolve(&headers(&["period ", "UNRATE"])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("No date column found"));
        assert!(message.contains("\"period\""));
        assert!(message.contains("\"UNRATE\""));
    }

    #[rstest]
    #[case("2015-01-01", 2015, 1, 1)]
    #[case(" 2015/02/01 ", 2015, 2, 1)]
    #[case("03/01/2015", 2015, 3, 1)]
    #[case("2015-04", 2015, 4, 1)]
    fn test_parse_macro_date(#[case] text: &str, #[case] y: i32, #[case] m: u32, #[case] d: u32) {
        assert_eq!(parse_macro_date(text), NaiveDate::from_ymd_opt(y, m, d));
    }

    #[test]
    fn test_parse_macro_date_rejects_garbage() {
        assert_eq!(parse_macro_date("Q1 2015"), None);
    }

    #[rstest]
    #[case(Some("13.56"), Some(13.56))]
    #[case(Some(" 13.56%"), Some(13.56))]
    #[case(Some(""), None)]
    #[case(Some("   "), None)]
    #[case(None, None)]
    #[case(Some("NaN"), None)]
    #[case(Some("nan"), None)]
    #[case(Some("-inf"), None)]
    fn test_parse_numeric_cell(#[case] cell: Option<&str>, #[case] expected: Option<f64>) {
        assert_eq!(parse_numeric_cell("int_rate", 0, cell).unwrap(), expected);
    }

    #[test]
    fn test_parse_numeric_cell_rejects_text() {
        let err = parse_numeric_cell("dti", 7, Some("n/a")).unwrap_err();
        assert!(err.to_string().contains("row 7"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_loans("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, DataError::FileNotFound { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }
}
