//! Column names and typed column access.
//!
//! Every stage of the pipeline refers to columns through the constants in this
//! module. The accessors pull a column out of a [`DataFrame`] as plain Rust
//! values so that modelling code can work on vectors instead of expressions.

use crate::Result;
use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

/// Raw loan status.
pub const LOAN_STATUS: &str = "loan_status";
/// Raw issue month text, e.g. `Jan-2015`.
pub const ISSUE_D: &str = "issue_d";
/// Parsed issue date (first day of the issue month).
pub const ISSUE_DATE: &str = "issue_date";
/// Loan amount.
pub const LOAN_AMNT: &str = "loan_amnt";
/// Interest rate.
pub const INT_RATE: &str = "int_rate";
/// Annual income.
pub const ANNUAL_INC: &str = "annual_inc";
/// Debt-to-income ratio.
pub const DTI: &str = "dti";
/// Credit grade.
pub const GRADE: &str = "grade";
/// Loan term.
pub const TERM: &str = "term";
/// Binary default target.
pub const DEFAULT: &str = "default";
/// Macro observation date.
pub const DATE: &str = "date";
/// Unemployment rate in percent.
pub const UNEMPLOYMENT_RATE: &str = "unemployment_rate";
/// Macro regime label.
pub const REGIME: &str = "regime";

/// Numeric model features, in model-matrix order.
pub const NUMERIC_FEATURES: [&str; 4] = [LOAN_AMNT, INT_RATE, ANNUAL_INC, DTI];

/// Categorical model features, in model-matrix order.
pub const CATEGORICAL_FEATURES: [&str; 2] = [GRADE, TERM];

/// Columns read from the raw loan file.
pub const REQUIRED_LOAN_COLUMNS: [&str; 8] = [
    LOAN_STATUS,
    ISSUE_D,
    LOAN_AMNT,
    INT_RATE,
    ANNUAL_INC,
    DTI,
    GRADE,
    TERM,
];

/// Days between 0001-01-01 (CE) and 1970-01-01.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Convert a date to the polars physical representation (days since epoch).
pub fn date_to_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

/// Convert days since epoch back to a date.
pub fn days_to_date(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
}

/// Calendar month key used to align loans and macro observations.
pub fn month_key(date: NaiveDate) -> i32 {
    date.year() * 12 + date.month0() as i32
}

/// First day of the month identified by a [`month_key`].
pub fn month_start(key: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(key.div_euclid(12), key.rem_euclid(12) as u32 + 1, 1)
}

/// Extract a column as optional `f64` values.
pub fn float_values(df: &DataFrame, name: &str) -> Result<Vec<Option<f64>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Float64)?;
    Ok(series.f64()?.into_iter().collect())
}

/// Extract a column as optional owned strings.
pub fn string_values(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::String)?;
    Ok(series
        .str()?
        .into_iter()
        .map(|value| value.map(str::to_owned))
        .collect())
}

/// Extract an integer column as optional `i32` values.
pub fn int_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i32>>> {
    let series = df
        .column(name)?
        .as_materialized_series()
        .cast(&DataType::Int32)?;
    Ok(series.i32()?.into_iter().collect())
}

/// Extract a `Date` column as optional [`NaiveDate`] values.
pub fn date_values(df: &DataFrame, name: &str) -> Result<Vec<Option<NaiveDate>>> {
    Ok(int_values(df, name)?
        .into_iter()
        .map(|days| days.and_then(days_to_date))
        .collect())
}

/// Build a polars `Date` series from dates.
pub fn date_series(name: &str, dates: &[NaiveDate]) -> Result<Series> {
    let days: Vec<i32> = dates.iter().map(|date| date_to_days(*date)).collect();
    Ok(Series::new(name.into(), days).cast(&DataType::Date)?)
}
