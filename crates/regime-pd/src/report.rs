//! Report figure assembly.

use crate::analysis::{RegimeRiskAnalysis, analyze_regime_risk};
use crate::pipeline::PreparedData;
use crate::{PipelineConfig, Result};
use chrono::NaiveDate;
use regime_pd_data::Regime;
use regime_pd_data::columns::{DATE, ISSUE_DATE, UNEMPLOYMENT_RATE, date_values, float_values};
use regime_pd_data::regime::regime_values;
use regime_pd_features::default_target;
use regime_pd_output::figures::{
    DefaultRateHeatmap, MacroRegimes, PdDistribution, SelectionVsRisk, TrainTestTimeline,
};
use regime_pd_output::{DecileTable, DefaultRateGrid, ReportFigures};
use std::path::PathBuf;

/// Issue date, regime and outcome of every dated loan.
type LoanTimeline = (Vec<NaiveDate>, Vec<Option<Regime>>, Vec<f64>);

fn loan_timeline(data: &PreparedData) -> Result<LoanTimeline> {
    let dates = date_values(&data.loans, ISSUE_DATE)?;
    let regimes = regime_values(&data.loans)?;
    let defaults = default_target(&data.loans)?.to_vec();

    let mut timeline = (Vec::new(), Vec::new(), Vec::new());
    for ((date, regime), default) in dates.into_iter().zip(regimes).zip(defaults) {
        if let Some(date) = date {
            timeline.0.push(date);
            timeline.1.push(regime);
            timeline.2.push(default);
        }
    }
    Ok(timeline)
}

fn macro_series(data: &PreparedData) -> Result<Vec<(NaiveDate, f64)>> {
    let dates = date_values(&data.macro_observations, DATE)?;
    let rates = float_values(&data.macro_observations, UNEMPLOYMENT_RATE)?;
    Ok(dates
        .into_iter()
        .zip(rates)
        .filter_map(|(date, rate)| Some((date?, rate?)))
        .collect())
}

/// Assemble every report figure from prepared data and the full-sample
/// analysis.
///
/// # Errors
/// Column access failures, or no loan having a regime.
pub fn build_figures(
    data: &PreparedData,
    analysis: &RegimeRiskAnalysis,
    config: &PipelineConfig,
) -> Result<ReportFigures> {
    let (dates, regimes, defaults) = loan_timeline(data)?;

    Ok(ReportFigures {
        timeline: TrainTestTimeline::new(&dates, config.train_end()?),
        regimes: MacroRegimes::new(macro_series(data)?, config.unemployment_threshold),
        heatmap: DefaultRateHeatmap::new(DefaultRateGrid::new(&dates, &regimes, &defaults)?),
        distribution: PdDistribution::new(&analysis.scored),
        selection: SelectionVsRisk::new(DecileTable::from_scored(&analysis.scored)?),
    })
}

/// Load the configured inputs, run the full-sample analysis and write every
/// figure to the figures directory.
///
/// # Errors
/// Any data, fitting or plotting failure.
pub fn write_figures(config: &PipelineConfig) -> Result<Vec<PathBuf>> {
    config.validate()?;
    let data = PreparedData::load(config)?;
    let analysis = analyze_regime_risk(&data.loans, config)?;
    let figures = build_figures(&data, &analysis, config)?;
    Ok(figures.save_all(&config.figures_dir, &config.style)?)
}
