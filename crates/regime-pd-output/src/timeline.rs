//! Monthly aggregates of issuance and defaults.

use crate::error::check_len;
use crate::{OutputError, Result};
use chrono::{Datelike, NaiveDate};
use regime_pd_data::Regime;
use regime_pd_data::columns::{month_key, month_start};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::RangeInclusive;

/// Loans issued in one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyCount {
    /// First day of the month
    pub month: NaiveDate,
    /// Loans issued
    pub count: usize,
}

/// Fractional year of a date, used as a plotting coordinate.
pub fn year_fraction(date: NaiveDate) -> f64 {
    let days_in_year = NaiveDate::from_ymd_opt(date.year(), 12, 31).map_or(365, |d| d.ordinal());
    f64::from(date.year()) + f64::from(date.ordinal0()) / f64::from(days_in_year)
}

/// Every month key from the earliest to the latest date.
fn month_range(keys: impl Iterator<Item = i32> + Clone) -> Option<RangeInclusive<i32>> {
    Some(keys.clone().min()?..=keys.max()?)
}

/// Loans issued per month, with empty months in between reported as zero.
pub fn monthly_issuance(dates: &[NaiveDate]) -> Vec<MonthlyCount> {
    let mut counts = BTreeMap::new();
    for date in dates {
        *counts.entry(month_key(*date)).or_insert(0_usize) += 1;
    }
    let Some(range) = month_range(counts.keys().copied()) else {
        return Vec::new();
    };
    range
        .filter_map(|key| {
            Some(MonthlyCount {
                month: month_start(key)?,
                count: counts.get(&key).copied().unwrap_or(0),
            })
        })
        .collect()
}

/// Observed default rate per regime and month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultRateGrid {
    months: Vec<NaiveDate>,
    regimes: Vec<Regime>,
    rates: Vec<Vec<Option<f64>>>,
}

impl DefaultRateGrid {
    /// Tabulate default rates over every month between the first and last
    /// issue date, for each regime that occurs. Cells without loans are
    /// `None`; loans without a regime are ignored.
    ///
    /// # Errors
    /// [`OutputError::DimensionMismatch`] for unequal lengths and
    /// [`OutputError::Empty`] when no loan has a regime.
    pub fn new(
        dates: &[NaiveDate],
        regimes: &[Option<Regime>],
        defaults: &[f64],
    ) -> Result<Self> {
        check_len(dates.len(), regimes.len())?;
        check_len(dates.len(), defaults.len())?;

        // (regime, month key) -> (defaults, loans)
        let mut cells: BTreeMap<(Regime, i32), (f64, usize)> = BTreeMap::new();
        for ((date, regime), default) in dates.iter().zip(regimes).zip(defaults) {
            if let Some(regime) = regime {
                let cell = cells.entry((*regime, month_key(*date))).or_default();
                cell.0 += default;
                cell.1 += 1;
            }
        }

        let range = month_range(cells.keys().map(|(_, key)| *key))
            .ok_or_else(|| OutputError::Empty("no loan has a macro regime".to_string()))?;
        let keys: Vec<i32> = range.collect();
        let present: Vec<Regime> = Regime::ALL
            .into_iter()
            .filter(|regime| cells.keys().any(|(r, _)| r == regime))
            .collect();

        let rates = present
            .iter()
            .map(|regime| {
                keys.iter()
                    .map(|key| {
                        cells
                            .get(&(*regime, *key))
                            .map(|(sum, n)| sum / *n as f64)
                    })
                    .collect()
            })
            .collect();

        Ok(Self {
            months: keys.into_iter().filter_map(month_start).collect(),
            regimes: present,
            rates,
        })
    }

    /// Months covered, in order.
    pub fn months(&self) -> &[NaiveDate] {
        &self.months
    }

    /// Regimes with at least one loan, in regime order.
    pub fn regimes(&self) -> &[Regime] {
        &self.regimes
    }

    /// Rates of one regime, aligned with [`DefaultRateGrid::months`].
    pub fn rates(&self, regime: Regime) -> Option<&[Option<f64>]> {
        let row = self.regimes.iter().position(|r| *r == regime)?;
        self.rates.get(row).map(Vec::as_slice)
    }

    /// Highest rate in the grid.
    pub fn max_rate(&self) -> Option<f64> {
        self.rates
            .iter()
            .flatten()
            .flatten()
            .copied()
            .reduce(f64::max)
    }
}
