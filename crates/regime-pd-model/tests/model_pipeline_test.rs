//! Split, fit, evaluate and persist both model variants.

use approx::assert_relative_eq;
use chrono::NaiveDate;
use polars::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use regime_pd_data::columns::{ISSUE_DATE, date_series};
use regime_pd_data::{RegimeRule, assign_macro_regime, parse_cutoff, time_based_split};
use regime_pd_features::ImputationMode;
use regime_pd_model::{
    LogisticConfig, ModelKind, TrainedModel, load_trained_model, train_baseline_model,
    train_regime_aware_model,
};
use tempfile::TempDir;

/// Loans issued monthly from 2014 to 2018 with unemployment falling over time.
fn loans(n: usize, seed: u64) -> DataFrame {
    let mut rng = StdRng::seed_from_u64(seed);
    let grades = ["A", "B", "C", "D"];

    let mut dates = Vec::with_capacity(n);
    let mut unemployment = Vec::with_capacity(n);
    let mut rate = Vec::with_capacity(n);
    let mut grade = Vec::with_capacity(n);
    let mut default = Vec::with_capacity(n);

    for i in 0..n {
        let month = (i % 60) as u32;
        let date = NaiveDate::from_ymd_opt(2014 + (month / 12) as i32, month % 12 + 1, 1).unwrap();
        let unrate = 7.5 - 0.06 * f64::from(month);
        let g = rng.gen_range(0..grades.len());
        let r = 7.0 + 5.0 * g as f64 + rng.gen_range(-2.0..2.0);
        let eta = -3.5 + 0.15 * (r - 12.0) + if unrate > 6.0 { 0.8 } else { 0.0 };
        let p = 1.0 / (1.0 + (-eta).exp());

        dates.push(date);
        unemployment.push(unrate);
        rate.push(r);
        grade.push(grades[g]);
        default.push(i32::from(rng.r#gen::<f64>() < p));
    }

    let mut df = df!(
        "loan_amnt" => vec![10_000.0; n],
        "int_rate" => rate,
        "annual_inc" => vec![60_000.0; n],
        "dti" => vec![Some(15.0); n],
        "grade" => grade,
        "term" => vec![" 36 months"; n],
        "default" => default,
        "unemployment_rate" => unemployment
    )
    .unwrap();
    df.with_column(date_series(ISSUE_DATE, &dates).unwrap()).unwrap();
    assign_macro_regime(&df, &RegimeRule::default()).unwrap()
}

#[test]
fn test_train_evaluate_and_reload() {
    let labelled = loans(6_000, 99);
    let (train, test) = time_based_split(&labelled, parse_cutoff("2016-12-31").unwrap()).unwrap();
    assert_eq!(train.height() + test.height(), labelled.height());

    let baseline = train_baseline_model(
        &train,
        &test,
        &LogisticConfig::baseline(),
        ImputationMode::TrainingMean,
    )
    .unwrap();
    let aware = train_regime_aware_model(
        &train,
        &test,
        &LogisticConfig::regime_aware(),
        ImputationMode::TrainingMean,
    )
    .unwrap();

    assert!(baseline.auc > 0.6, "baseline auc {}", baseline.auc);
    assert!(aware.auc > 0.6, "regime-aware auc {}", aware.auc);

    let dir = TempDir::new().unwrap();
    baseline
        .model
        .save(dir.path().join(ModelKind::Baseline.file_name()))
        .unwrap();
    aware
        .model
        .save(dir.path().join(ModelKind::RegimeAware.file_name()))
        .unwrap();

    let reloaded = load_trained_model(dir.path()).unwrap();
    let rescored = reloaded.predict_frame(&test).unwrap();
    for (a, b) in rescored.iter().zip(baseline.test_pd.iter()) {
        assert_relative_eq!(a, b, epsilon = 1e-12);
    }

    let aware_reloaded =
        TrainedModel::load(dir.path().join(ModelKind::RegimeAware.file_name())).unwrap();
    assert_eq!(aware_reloaded.kind(), ModelKind::RegimeAware);
    assert_eq!(
        aware_reloaded.predict_frame(&test).unwrap().len(),
        test.height()
    );
}

#[test]
fn test_corrupt_artifact_is_an_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("baseline_pd_model.json");
    std::fs::write(&path, "{\"kind\": \"baseline\"}").unwrap();
    assert!(TrainedModel::load(&path).is_err());
}
