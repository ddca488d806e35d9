//! Report figures.
//!
//! Each figure is a value holding the data it plots. [`Figure::draw`] is
//! generic over the plotters backend so the same drawing code renders both
//! the PNG and the SVG file.

mod deciles;
mod distribution;
mod heatmap;
mod regimes;
mod timeline;

pub use deciles::SelectionVsRisk;
pub use distribution::PdDistribution;
pub use heatmap::DefaultRateHeatmap;
pub use regimes::MacroRegimes;
pub use timeline::TrainTestTimeline;

use crate::{FigureStyle, OutputError, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Result of drawing onto a backend.
pub type DrawResult<DB> =
    std::result::Result<(), DrawingAreaErrorKind<<DB as DrawingBackend>::ErrorType>>;

/// A figure that can be drawn onto any plotters backend.
pub trait Figure {
    /// File stem of the figure.
    fn name(&self) -> &'static str;

    /// Canvas size in pixels.
    fn size(&self, style: &FigureStyle) -> (u32, u32) {
        style.size()
    }

    /// Draw the figure onto `root`.
    ///
    /// # Errors
    /// Backend failures.
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        style: &FigureStyle,
    ) -> DrawResult<DB>;
}

fn plot_error(e: impl std::fmt::Display) -> OutputError {
    OutputError::Plot(e.to_string())
}

/// Render `figure` as `<name>.png` and `<name>.svg` under `dir`.
///
/// # Errors
/// I/O failures creating `dir` and backend failures while drawing.
pub fn save_figure<F: Figure>(
    figure: &F,
    dir: &Path,
    style: &FigureStyle,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    let size = figure.size(style);

    let png = dir.join(format!("{}.png", figure.name()));
    {
        let root = BitMapBackend::new(&png, size).into_drawing_area();
        figure.draw(&root, style).map_err(plot_error)?;
        root.present().map_err(plot_error)?;
    }

    let svg = dir.join(format!("{}.svg", figure.name()));
    {
        let root = SVGBackend::new(&svg, size).into_drawing_area();
        figure.draw(&root, style).map_err(plot_error)?;
        root.present().map_err(plot_error)?;
    }

    info!(figure = figure.name(), dir = %dir.display(), "saved figure");
    Ok(vec![png, svg])
}

/// Every report figure of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportFigures {
    /// Issuance timeline with the train/test cutoff
    pub timeline: TrainTestTimeline,
    /// Unemployment rate and stress periods
    pub regimes: MacroRegimes,
    /// Default rate by month and regime
    pub heatmap: DefaultRateHeatmap,
    /// PD densities and realised default rates
    pub distribution: PdDistribution,
    /// Decile composition and calibration by regime
    pub selection: SelectionVsRisk,
}

impl ReportFigures {
    /// Render every figure under `dir`, returning the written paths.
    ///
    /// # Errors
    /// See [`save_figure`].
    pub fn save_all(&self, dir: &Path, style: &FigureStyle) -> Result<Vec<PathBuf>> {
        let mut written = save_figure(&self.timeline, dir, style)?;
        written.extend(save_figure(&self.regimes, dir, style)?);
        written.extend(save_figure(&self.heatmap, dir, style)?);
        written.extend(save_figure(&self.distribution, dir, style)?);
        written.extend(save_figure(&self.selection, dir, style)?);
        Ok(written)
    }
}

/// Font of the given pixel size in the style's family.
pub(crate) fn font(style: &FigureStyle, size: u32) -> FontDesc<'_> {
    (style.font_family.as_str(), size).into_font()
}

/// Smallest and largest value of `values`, padded when they coincide.
pub(crate) fn bounds(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !lo.is_finite() {
        (0.0, 1.0)
    } else if lo == hi {
        (lo - 0.5, hi + 0.5)
    } else {
        (lo, hi)
    }
}

/// Segments of a dashed line from `from` to `to`.
pub(crate) fn dashes(from: (f64, f64), to: (f64, f64), count: usize) -> Vec<Vec<(f64, f64)>> {
    let steps = (2 * count.max(1) - 1) as f64;
    let at = |t: f64| (from.0 + (to.0 - from.0) * t, from.1 + (to.1 - from.1) * t);
    (0..count.max(1))
        .map(|k| {
            let start = 2.0 * k as f64 / steps;
            let end = (2.0 * k as f64 + 1.0) / steps;
            vec![at(start), at(end)]
        })
        .collect()
}
