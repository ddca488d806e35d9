//! End-to-end runs over generated loan and macro files.

use chrono::{Datelike, NaiveDate};
use regime_pd::data::{DataError, Regime};
use regime_pd::model::{ModelKind, load_trained_model};
use regime_pd::{
    PD_COLUMN, PipelineConfig, PipelineError, PreparedData, analyze_regime_risk, build_figures,
    evaluate_models, run_pipeline, score_loans, write_figures,
};
use std::fmt::Write as _;
use std::fs;
use tempfile::TempDir;

const MONTHS: u32 = 60;
const GRADES: [&str; 5] = ["A", "B", "C", "D", "E"];

/// Deterministic uniform draw in `[0, 1)`.
fn uniform(i: u64, stream: u64) -> f64 {
    let mut z = i
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add(stream.wrapping_mul(0xBF58_476D_1CE4_E5B9));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^= z >> 31;
    (z >> 11) as f64 / (1u64 << 53) as f64
}

fn month_date(month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2014 + (month / 12) as i32, month % 12 + 1, 1).unwrap()
}

fn unemployment(month: u32) -> f64 {
    7.5 - 0.06 * f64::from(month)
}

/// Riskier grades and stressed months default more often. Every 50th loan is
/// still current and every 97th has no debt-to-income ratio.
fn loans_csv(n: u64) -> String {
    let mut csv =
        String::from("id,loan_status,issue_d,loan_amnt,int_rate,annual_inc,dti,grade,term\n");
    for i in 0..n {
        let month = (i % u64::from(MONTHS)) as u32;
        let grade = (uniform(i, 1) * GRADES.len() as f64) as usize;
        let stressed = unemployment(month) > 6.0;
        let p = 0.04 + 0.05 * grade as f64 + if stressed { 0.08 } else { 0.0 };

        let status = if i % 50 == 0 {
            "Current"
        } else if uniform(i, 2) < p {
            "Charged Off"
        } else {
            "Fully Paid"
        };
        let rate = 6.0 + 4.0 * grade as f64 + 2.0 * uniform(i, 3);
        let dti = if i % 97 == 0 {
            String::new()
        } else {
            format!("{:.1}", 5.0 + 25.0 * uniform(i, 4))
        };
        let term = if uniform(i, 5) < 0.7 { " 36 months" } else { " 60 months" };

        writeln!(
            csv,
            "{i},{status},{},{},{rate:.2}%,{},{dti},{},{term}",
            month_date(month).format("%b-%Y"),
            5_000 + 100 * (i % 200),
            40_000 + 500 * (i % 120),
            GRADES[grade],
        )
        .unwrap();
    }
    csv
}

fn macro_csv() -> String {
    let mut csv = String::from("observation_date,UNRATE\n");
    for month in 0..MONTHS {
        writeln!(csv, "{},{:.2}", month_date(month), unemployment(month)).unwrap();
    }
    csv
}

fn config(dir: &TempDir) -> PipelineConfig {
    let loans_path = dir.path().join("lendingclub.csv");
    let macro_path = dir.path().join("fred_macro.csv");
    fs::write(&loans_path, loans_csv(3_000)).unwrap();
    fs::write(&macro_path, macro_csv()).unwrap();
    PipelineConfig {
        loans_path,
        macro_path,
        figures_dir: dir.path().join("figures"),
        models_dir: dir.path().join("models"),
        ..PipelineConfig::default()
    }
}

#[test]
fn test_run_pipeline_reports_both_aucs() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);

    let report = run_pipeline(&config).unwrap();
    assert_eq!(report.train_rows + report.test_rows, 3_000 - 60);
    assert!(report.baseline.auc > 0.55, "baseline auc {}", report.baseline.auc);
    assert!(
        report.regime_aware.auc > 0.55,
        "regime-aware auc {}",
        report.regime_aware.auc
    );

    let text = report.to_string();
    assert!(text.starts_with("Baseline PD AUC: 0."));
    assert!(text.contains("\nRegime-aware PD AUC: 0."));
}

#[test]
fn test_full_sample_regime_risk() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);
    let data = PreparedData::load(&config).unwrap();

    let analysis = analyze_regime_risk(&data.loans, &config).unwrap();
    let dropped = data.loans.height() - analysis.loans.height();
    assert!(dropped > 0 && dropped < 40, "dropped {dropped}");

    let summary = &analysis.summary;
    let expansion = summary.get(Regime::Expansion).unwrap();
    let stress = summary.get(Regime::Stress).unwrap();
    assert_eq!(expansion.count + stress.count, analysis.loans.height());
    assert!(stress.observed_default_rate > expansion.observed_default_rate);
    assert!(summary.relative_mean_pd_uplift().is_some());

    let figures = build_figures(&data, &analysis, &config).unwrap();
    assert_eq!(figures.timeline.issuance().len(), MONTHS as usize);
    assert_eq!(figures.heatmap.grid().months().len(), MONTHS as usize);
    assert_eq!(figures.selection.table().stats().len(), 20);
    assert_eq!(figures.distribution.curves().len(), 2);
    let first_stress = figures.regimes.stress_periods()[0].0;
    assert_eq!((first_stress.year(), first_stress.month()), (2014, 1));
}

#[test]
fn test_write_figures_emits_png_and_svg() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);

    let written = write_figures(&config).unwrap();
    assert_eq!(written.len(), 10);
    for name in [
        "figure_1_train_test_split",
        "figure_2_macro_regimes",
        "figure_3_default_rate_heatmap",
        "figure_5_combined_pd_distribution_and_defaults",
        "figure_12_hero_selection_vs_risk",
    ] {
        for extension in ["png", "svg"] {
            let path = config.figures_dir.join(format!("{name}.{extension}"));
            assert!(written.contains(&path), "{} not reported", path.display());
            assert!(fs::metadata(&path).unwrap().len() > 0, "{} is empty", path.display());
        }
    }
}

#[test]
fn test_cutoff_moves_rows_between_sets() {
    let dir = TempDir::new().unwrap();
    let mut config = config(&dir);
    let data = PreparedData::load(&config).unwrap();

    config.train_end_date = "2017-12-31".to_string();
    let later = evaluate_models(&data.loans, &config).unwrap();
    config.train_end_date = "2016-12-31".to_string();
    let earlier = evaluate_models(&data.loans, &config).unwrap();
    assert!(later.train_rows > earlier.train_rows);
}

#[test]
fn test_saved_model_scores_loans() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir);

    let report = run_pipeline(&config).unwrap();
    let written = report.save_models(&config.models_dir).unwrap();
    assert_eq!(written.len(), 2);
    assert!(written.iter().all(|path| path.exists()));

    let model = load_trained_model(&config.models_dir).unwrap();
    assert_eq!(model.kind(), ModelKind::Baseline);

    let scored = score_loans(&model, &config).unwrap();
    let pd = scored.loans.column(PD_COLUMN).unwrap();
    assert_eq!(pd.len(), 3_000 - 60);
    assert_eq!(pd.null_count(), 0);

    let out = dir.path().join("scores").join("scored.csv");
    scored.write_csv(&out).unwrap();
    let header = fs::read_to_string(&out).unwrap();
    assert!(header.lines().next().unwrap().ends_with(PD_COLUMN));
}

#[test]
fn test_missing_loan_file() {
    let dir = TempDir::new().unwrap();
    let config = PipelineConfig {
        loans_path: dir.path().join("absent.csv"),
        ..PipelineConfig::default()
    };
    assert!(matches!(
        run_pipeline(&config),
        Err(PipelineError::Data(DataError::FileNotFound { .. }))
    ));
}
