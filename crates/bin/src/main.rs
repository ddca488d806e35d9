//! regime-pd CLI binary.
//!
//! Trains and compares the baseline and regime-aware PD models, summarises
//! predicted risk by macro regime, writes the report figures and scores loan
//! files with a saved model.

use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use regime_pd::features::ImputationMode;
use regime_pd::model::{TrainedModel, load_trained_model};
use regime_pd::output::{ExportFormat, Exporter};
use regime_pd::{
    PipelineConfig, PreparedData, analyze_regime_risk, run_pipeline, score_loans, write_figures,
};
use std::error::Error;
use std::path::PathBuf;
use std::process;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "regime-pd")]
#[command(about = "Regime-aware probability of default modelling", long_about = None)]
#[command(version)]
struct Cli {
    /// JSON configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Loan CSV (overrides the config)
    #[arg(long, global = true)]
    loans: Option<PathBuf>,

    /// Macro CSV (overrides the config)
    #[arg(long = "macro", global = true)]
    macro_path: Option<PathBuf>,

    /// Unemployment rate above which a month is Stress
    #[arg(long, global = true)]
    threshold: Option<f64>,

    /// Last issue date in the training set (YYYY-MM-DD)
    #[arg(long, global = true)]
    train_end: Option<String>,

    /// How missing feature values are filled
    #[arg(long, value_enum, global = true)]
    imputation: Option<Imputation>,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Train both models and report their test ROC-AUC
    Run {
        /// Save both model artifacts to the models directory
        #[arg(long)]
        save_model: bool,

        /// Models directory (overrides the config)
        #[arg(long)]
        models_dir: Option<PathBuf>,
    },

    /// Full-sample regime risk summary
    Summary {
        /// Write the summary table to this file
        #[arg(long)]
        export: Option<PathBuf>,

        /// Export format (csv, json or pretty-json)
        #[arg(long, default_value = "csv")]
        format: ExportFormat,

        /// Print the table as Markdown
        #[arg(long)]
        markdown: bool,
    },

    /// Write every report figure as PNG and SVG
    Figures {
        /// Output directory (overrides the config)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Score the loan file with a saved model
    Score {
        /// Model artifact (defaults to the baseline in the models directory)
        #[arg(long)]
        model: Option<PathBuf>,

        /// Write scored loans to this CSV
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Imputation {
    /// Fill with training-set means
    TrainingMean,
    /// Fill each frame with its own means
    PerFrame,
}

impl From<Imputation> for ImputationMode {
    fn from(value: Imputation) -> Self {
        match value {
            Imputation::TrainingMean => Self::TrainingMean,
            Imputation::PerFrame => Self::PerFrame,
        }
    }
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let mut config = load_config(&cli)?;

    match cli.command {
        Commands::Run {
            save_model,
            models_dir,
        } => {
            if let Some(dir) = models_dir {
                config.models_dir = dir;
            }
            train_models(&config, save_model)?;
        }
        Commands::Summary {
            export,
            format,
            markdown,
        } => {
            regime_summary(&config, export, format, markdown)?;
        }
        Commands::Figures { out } => {
            if let Some(dir) = out {
                config.figures_dir = dir;
            }
            let pb = spinner("Rendering figures...");
            let written = write_figures(&config);
            pb.finish_and_clear();
            for path in written? {
                println!("Saved figure: {}", path.display());
            }
        }
        Commands::Score { model, out } => {
            score(&config, model, out)?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Config file (or defaults) with command-line overrides applied.
fn load_config(cli: &Cli) -> Result<PipelineConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    if let Some(path) = &cli.loans {
        config.loans_path = path.clone();
    }
    if let Some(path) = &cli.macro_path {
        config.macro_path = path.clone();
    }
    if let Some(threshold) = cli.threshold {
        config.unemployment_threshold = threshold;
    }
    if let Some(date) = &cli.train_end {
        config.train_end_date = date.clone();
    }
    if let Some(imputation) = cli.imputation {
        config.imputation = imputation.into();
    }
    config.validate()?;
    Ok(config)
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(message.to_string());
    pb
}

fn train_models(config: &PipelineConfig, save_model: bool) -> Result<(), Box<dyn Error>> {
    let pb = spinner("Training baseline and regime-aware models...");
    let report = run_pipeline(config);
    pb.finish_and_clear();
    let report = report?;

    info!(
        train = report.train_rows,
        test = report.test_rows,
        "evaluated both models"
    );
    println!("{report}");

    if save_model {
        for path in report.save_models(&config.models_dir)? {
            println!("Saved model: {}", path.display());
        }
    }
    Ok(())
}

fn regime_summary(
    config: &PipelineConfig,
    export: Option<PathBuf>,
    format: ExportFormat,
    markdown: bool,
) -> Result<(), Box<dyn Error>> {
    let pb = spinner("Fitting full-sample baseline...");
    let analysis = PreparedData::load(config)
        .and_then(|data| analyze_regime_risk(&data.loans, config));
    pb.finish_and_clear();
    let summary = analysis?.summary;

    if markdown {
        println!("{}", summary.to_markdown());
    } else {
        println!("{summary}");
    }

    if let Some(path) = export {
        summary.export_to_file(&path, format)?;
        println!("Saved summary: {}", path.display());
    }
    Ok(())
}

fn score(
    config: &PipelineConfig,
    model: Option<PathBuf>,
    out: Option<PathBuf>,
) -> Result<(), Box<dyn Error>> {
    let model = match model {
        Some(path) => TrainedModel::load(path)?,
        None => load_trained_model(&config.models_dir)?,
    };
    println!("Model: {} ({} features)", model.kind(), model.feature_names().len());

    let pb = spinner("Scoring loans...");
    let scored = score_loans(&model, config);
    pb.finish_and_clear();
    let scored = scored?;

    println!("{}", scored.summary);
    if let Some(path) = out {
        scored.write_csv(&path)?;
        println!("Saved scores: {}", path.display());
    }
    Ok(())
}
