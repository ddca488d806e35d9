//! Synthetic loan frames for unit tests.

use crate::logistic::sigmoid;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const GRADES: [&str; 5] = ["A", "B", "C", "D", "E"];

/// Labelled loans whose default probability rises with grade, rate and stress.
pub(crate) fn synthetic_loans(n: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);

    let mut amount = Vec::with_capacity(n);
    let mut rate = Vec::with_capacity(n);
    let mut income = Vec::with_capacity(n);
    let mut dti = Vec::with_capacity(n);
    let mut grade = Vec::with_capacity(n);
    let mut term = Vec::with_capacity(n);
    let mut regime = Vec::with_capacity(n);
    let mut default = Vec::with_capacity(n);

    for _ in 0..n {
        let g = rng.gen_range(0..GRADES.len());
        let r = 6.0 + 4.0 * g as f64 + rng.gen_range(-1.5..1.5);
        let long = rng.gen_bool(0.3);
        let stress = rng.gen_bool(0.4);
        let ratio: f64 = rng.gen_range(0.0..35.0);

        let eta = -3.0 + 0.12 * (r - 12.0) + 0.9 * f64::from(u8::from(stress))
            + 0.4 * f64::from(u8::from(long))
            + 0.02 * ratio;
        let defaulted = rng.r#gen::<f64>() < sigmoid(eta);

        amount.push(rng.gen_range(1_000.0..35_000.0));
        rate.push(r);
        income.push(rng.gen_range(20_000.0..150_000.0));
        dti.push(if rng.gen_bool(0.05) { None } else { Some(ratio) });
        grade.push(GRADES[g]);
        term.push(if long { " 60 months" } else { " 36 months" });
        regime.push(if stress { "Stress" } else { "Expansion" });
        default.push(i32::from(defaulted));
    }

    df!(
        "loan_amnt" => amount,
        "int_rate" => rate,
        "annual_inc" => income,
        "dti" => dti,
        "grade" => grade,
        "term" => term,
        "regime" => regime,
        "default" => default
    )
    .unwrap()
}
