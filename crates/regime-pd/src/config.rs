//! Pipeline configuration.

use crate::{PipelineError, Result};
use chrono::NaiveDate;
use regime_pd_data::regime::DEFAULT_UNEMPLOYMENT_THRESHOLD;
use regime_pd_data::{DEFAULT_TRAIN_END_DATE, RegimeRule, parse_cutoff};
use regime_pd_features::ImputationMode;
use regime_pd_model::LogisticConfig;
use regime_pd_output::FigureStyle;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

/// Default location of the LendingClub loan file.
pub const DEFAULT_LOANS_PATH: &str = "data/raw/lendingclub.csv";

/// Default location of the FRED macro file.
pub const DEFAULT_MACRO_PATH: &str = "data/raw/fred_macro.csv";

/// Settings for a pipeline run.
///
/// Every field has a default, so a JSON file only needs the values it
/// changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Loan CSV
    pub loans_path: PathBuf,
    /// Macro CSV with a date column and `UNRATE`
    pub macro_path: PathBuf,
    /// Unemployment rate (percent) above which a month is `Stress`
    pub unemployment_threshold: f64,
    /// Last issue date (`YYYY-MM-DD`) in the training set
    pub train_end_date: String,
    /// How missing feature values are filled
    pub imputation: ImputationMode,
    /// Solver settings of the baseline model
    pub baseline: LogisticConfig,
    /// Solver settings of the regime-aware model
    pub regime_aware: LogisticConfig,
    /// Where figures are written
    pub figures_dir: PathBuf,
    /// Where model artifacts are written
    pub models_dir: PathBuf,
    /// Figure styling
    pub style: FigureStyle,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            loans_path: PathBuf::from(DEFAULT_LOANS_PATH),
            macro_path: PathBuf::from(DEFAULT_MACRO_PATH),
            unemployment_threshold: DEFAULT_UNEMPLOYMENT_THRESHOLD,
            train_end_date: DEFAULT_TRAIN_END_DATE.to_string(),
            imputation: ImputationMode::default(),
            baseline: LogisticConfig::baseline(),
            regime_aware: LogisticConfig::regime_aware(),
            figures_dir: PathBuf::from("reports/figures"),
            models_dir: PathBuf::from("models"),
            style: FigureStyle::default(),
        }
    }
}

impl PipelineConfig {
    /// Read a configuration from a JSON file.
    ///
    /// # Errors
    /// [`PipelineError::ConfigNotFound`], JSON errors, or
    /// [`PipelineError::InvalidConfig`] from [`PipelineConfig::validate`].
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PipelineError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }
        let config: Self = serde_json::from_reader(BufReader::new(File::open(path)?))?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    ///
    /// # Errors
    /// [`PipelineError::InvalidConfig`] for a non-finite threshold or an
    /// unparseable cutoff date.
    pub fn validate(&self) -> Result<()> {
        if !self.unemployment_threshold.is_finite() {
            return Err(PipelineError::InvalidConfig(format!(
                "unemployment_threshold must be finite, got {}",
                self.unemployment_threshold
            )));
        }
        self.train_end()
            .map_err(|e| PipelineError::InvalidConfig(e.to_string()))?;
        Ok(())
    }

    /// Regime labelling rule.
    pub const fn regime_rule(&self) -> RegimeRule {
        RegimeRule::new(self.unemployment_threshold)
    }

    /// Parsed training cutoff.
    ///
    /// # Errors
    /// Fails when `train_end_date` is not `YYYY-MM-DD`.
    pub fn train_end(&self) -> Result<NaiveDate> {
        Ok(parse_cutoff(&self.train_end_date)?)
    }
}
