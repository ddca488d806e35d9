//! Time-based train/test split.

use crate::columns::{ISSUE_DATE, date_to_days};
use crate::{DataError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use tracing::info;

/// Last issue date included in the training set.
pub const DEFAULT_TRAIN_END_DATE: &str = "2016-12-31";

/// Parse a `YYYY-MM-DD` cutoff date.
///
/// # Errors
/// [`DataError::Parse`] for any other format.
pub fn parse_cutoff(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d")
        .map_err(|e| DataError::Parse(format!("invalid cutoff date {text:?}: {e}")))
}

/// Split data into train/test based on `issue_date`.
///
/// Rows issued on or before `train_end` go to train, later rows to test. No
/// shuffling: both halves keep the input order.
///
/// # Errors
/// [`DataError::Parse`] if a row has no `issue_date`, since it would belong to
/// neither side.
pub fn time_based_split(df: &DataFrame, train_end: NaiveDate) -> Result<(DataFrame, DataFrame)> {
    let cutoff = date_to_days(train_end);
    let issue_day = || col(ISSUE_DATE).cast(DataType::Int32);

    let train = df
        .clone()
        .lazy()
        .filter(issue_day().lt_eq(lit(cutoff)))
        .collect()?;
    let test = df
        .clone()
        .lazy()
        .filter(issue_day().gt(lit(cutoff)))
        .collect()?;

    if train.height() + test.height() != df.height() {
        return Err(DataError::Parse(format!(
            "{} rows have no {ISSUE_DATE}",
            df.height() - train.height() - test.height()
        )));
    }

    info!(
        cutoff = %train_end,
        train = train.height(),
        test = test.height(),
        "time-based split"
    );
    Ok((train, test))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::columns::{date_series, date_values};

    fn frame(dates: &[NaiveDate]) -> DataFrame {
        DataFrame::new(vec![date_series(ISSUE_DATE, dates).unwrap().into()]).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_cutoff() {
        assert_eq!(parse_cutoff("2016-12-31").unwrap(), date(2016, 12, 31));
        assert!(parse_cutoff("31/12/2016").is_err());
    }

    #[test]
    fn test_split_is_a_partition() {
        let dates = [
            date(2015, 1, 1),
            date(2017, 1, 1),
            date(2016, 12, 31),
            date(2016, 12, 1),
            date(2018, 3, 1),
        ];
        let (train, test) = time_based_split(&frame(&dates), date(2016, 12, 31)).unwrap();

        assert_eq!(train.height() + test.height(), dates.len());
        assert_eq!(
            date_values(&train, ISSUE_DATE).unwrap(),
            vec![
                Some(date(2015, 1, 1)),
                Some(date(2016, 12, 31)),
                Some(date(2016, 12, 1))
            ]
        );
        assert_eq!(
            date_values(&test, ISSUE_DATE).unwrap(),
            vec![Some(date(2017, 1, 1)), Some(date(2018, 3, 1))]
        );
    }

    #[test]
    fn test_cutoff_is_inclusive_on_train_side() {
        let (train, test) =
            time_based_split(&frame(&[date(2016, 12, 31)]), date(2016, 12, 31)).unwrap();
        assert_eq!(train.height(), 1);
        assert_eq!(test.height(), 0);
    }
}
