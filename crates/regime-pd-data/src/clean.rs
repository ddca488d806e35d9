//! Loan cleaning and target construction.

use crate::columns::{DEFAULT, ISSUE_D, ISSUE_DATE, LOAN_STATUS, date_series, string_values};
use crate::{DataError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use tracing::info;

/// Status of a loan repaid in full.
pub const FULLY_PAID: &str = "Fully Paid";

/// Status of a loan written off; the positive (default) class.
pub const CHARGED_OFF: &str = "Charged Off";

/// Parse a `Mon-YYYY` issue month (e.g. `Jan-2015`) to the first day of
/// that month.
///
/// # Errors
/// [`DataError::Parse`] when the text does not match the format.
pub fn parse_issue_month(text: &str) -> Result<NaiveDate> {
    let trimmed = text.trim();
    NaiveDate::parse_from_str(&format!("01-{trimmed}"), "%d-%b-%Y")
        .map_err(|e| DataError::Parse(format!("invalid issue month {text:?}: {e}")))
}

/// Clean LendingClub data and construct the default target.
///
/// Keeps loans with a known outcome (`Fully Paid` / `Charged Off`) in their
/// original order, adds `default` (1 for `Charged Off`) and parses `issue_d`
/// into `issue_date`.
///
/// # Errors
/// [`DataError::Parse`] when a kept row has a missing or malformed `issue_d`.
pub fn clean_loans(loans: &DataFrame) -> Result<DataFrame> {
    let status = || col(LOAN_STATUS);

    let mut resolved = loans
        .clone()
        .lazy()
        .filter(status().eq(lit(FULLY_PAID)).or(status().eq(lit(CHARGED_OFF))))
        .with_column(
            when(status().eq(lit(CHARGED_OFF)))
                .then(lit(1i32))
                .otherwise(lit(0i32))
                .alias(DEFAULT),
        )
        .collect()?;

    let issue_dates = string_values(&resolved, ISSUE_D)?
        .iter()
        .enumerate()
        .map(|(row, value)| match value {
            Some(text) => parse_issue_month(text),
            None => Err(DataError::Parse(format!("row {row}: missing {ISSUE_D}"))),
        })
        .collect::<Result<Vec<_>>>()?;
    resolved.with_column(date_series(ISSUE_DATE, &issue_dates)?)?;

    info!(
        kept = resolved.height(),
        dropped = loans.height() - resolved.height(),
        "cleaned loans"
    );
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::int_values;
    use rstest::rstest;

    #[rstest]
    #[case("Jan-2015", 2015, 1)]
    #[case("Dec-2016", 2016, 12)]
    #[case(" Jul-2018 ", 2018, 7)]
    fn test_parse_issue_month(#[case] text: &str, #[case] year: i32, #[case] month: u32) {
        assert_eq!(
            parse_issue_month(text).unwrap(),
            NaiveDate::from_ymd_opt(year, month, 1).unwrap()
        );
    }

    #[rstest]
    #[case("2015-01")]
    #[case("January 2015")]
    #[case("Foo-2015")]
    #[case("")]
    fn test_parse_issue_month_rejects(#[case] text: &str) {
        assert!(matches!(parse_issue_month(text), Err(DataError::Parse(_))));
    }

    #[test]
    fn test_clean_keeps_resolved_outcomes() {
        let loans = df!(
            LOAN_STATUS => ["Fully Paid", "Charged Off", "Current"],
            ISSUE_D => ["Jan-2015", "Feb-2015", "Mar-2015"]
        )
        .unwrap();

        let cleaned = clean_loans(&loans).unwrap();
        assert_eq!(cleaned.height(), 2);
        assert_eq!(
            int_values(&cleaned, DEFAULT).unwrap(),
            vec![Some(0), Some(1)]
        );
        assert_eq!(
            string_values(&cleaned, LOAN_STATUS).unwrap(),
            vec![Some(FULLY_PAID.to_string()), Some(CHARGED_OFF.to_string())]
        );
    }

    #[test]
    fn test_clean_ignores_bad_dates_on_dropped_rows() {
        let loans = df!(
            LOAN_STATUS => ["Current", "Fully Paid"],
            ISSUE_D => ["garbage", "Jun-2016"]
        )
        .unwrap();
        let cleaned = clean_loans(&loans).unwrap();
        assert_eq!(cleaned.height(), 1);
    }

    #[test]
    fn test_clean_fails_on_malformed_issue_date() {
        let loans = df!(
            LOAN_STATUS => ["Fully Paid"],
            ISSUE_D => ["2015-01-01"]
        )
        .unwrap();
        assert!(matches!(clean_loans(&loans), Err(DataError::Parse(_))));
    }
}
