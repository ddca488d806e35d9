//! Scoring loan files with a saved model.

use crate::pipeline::PreparedData;
use crate::{PipelineConfig, Result};
use polars::prelude::*;
use regime_pd_data::regime::regime_values;
use regime_pd_features::default_target;
use regime_pd_model::TrainedModel;
use regime_pd_output::{RegimeRiskSummary, ScoredLoans};
use std::fs::{self, File};
use std::path::Path;
use tracing::info;

/// Column holding predicted PDs in a scored frame.
pub const PD_COLUMN: &str = "pd_hat";

/// A loan file scored by a saved model.
#[derive(Debug, Clone)]
pub struct ScoredFile {
    /// Prepared loans with an extra `pd_hat` column
    pub loans: DataFrame,
    /// Predicted risk by regime
    pub summary: RegimeRiskSummary,
}

impl ScoredFile {
    /// Write the scored loans as CSV, creating parent directories.
    ///
    /// # Errors
    /// I/O or polars failures.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = File::create(path)?;
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut self.loans.clone())?;
        info!(rows = self.loans.height(), path = %path.display(), "wrote scored loans");
        Ok(())
    }
}

/// Score the configured loan file with `model`.
///
/// Missing features are imputed the way the model was trained to.
///
/// # Errors
/// Data preparation or scoring failures.
pub fn score_loans(model: &TrainedModel, config: &PipelineConfig) -> Result<ScoredFile> {
    let data = PreparedData::load(config)?;
    let pd = model.predict_frame(&data.loans)?.to_vec();

    let scored = ScoredLoans::new(
        regime_values(&data.loans)?,
        pd.clone(),
        default_target(&data.loans)?.to_vec(),
    )?;
    let summary = RegimeRiskSummary::from_scored(&scored)?;

    let mut loans = data.loans;
    loans.with_column(Column::new(PD_COLUMN.into(), pd))?;
    info!(kind = %model.kind(), rows = loans.height(), "scored loans");
    Ok(ScoredFile { loans, summary })
}
