use super::{DrawResult, Figure, bounds, dashes, font};
use crate::density::{DensityCurve, regime_density_curves};
use crate::{FigureStyle, ScoredLoans};
use plotters::coord::Shift;
use plotters::prelude::*;

/// Predicted-PD density of each regime with its realised default rate.
#[derive(Debug, Clone, PartialEq)]
pub struct PdDistribution {
    curves: Vec<DensityCurve>,
}

impl PdDistribution {
    /// Estimate the densities of scored loans.
    pub fn new(scored: &ScoredLoans) -> Self {
        Self {
            curves: regime_density_curves(scored),
        }
    }

    /// Curves drawn, one per regime.
    pub fn curves(&self) -> &[DensityCurve] {
        &self.curves
    }
}

impl Figure for PdDistribution {
    fn name(&self) -> &'static str {
        "figure_5_combined_pd_distribution_and_defaults"
    }

    fn size(&self, style: &FigureStyle) -> (u32, u32) {
        (style.width * 9 / 8, style.height * 6 / 5)
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        style: &FigureStyle,
    ) -> DrawResult<DB> {
        root.fill(&WHITE)?;

        let (x0, x1) = bounds(
            self.curves
                .iter()
                .flat_map(|c| c.points.iter().map(|p| p.0).chain([c.observed_default_rate])),
        );
        let y_max = self
            .curves
            .iter()
            .flat_map(|c| c.points.iter().map(|p| p.1))
            .fold(1e-9, f64::max)
            * 1.05;

        let mut chart = ChartBuilder::on(root)
            .caption(
                "Macroeconomic Regimes, Model-Implied Risk, and Realized Defaults",
                font(style, style.title_px()),
            )
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, 0.0..y_max)?;

        chart
            .configure_mesh()
            .x_desc("Predicted Probability of Default")
            .y_desc("Density")
            .x_label_formatter(&|x| format!("{x:.2}"))
            .label_style(font(style, style.tick_px()))
            .axis_desc_style(font(style, style.label_px()))
            .draw()?;

        for curve in &self.curves {
            let color = style.regime_color(curve.regime);
            chart
                .draw_series(
                    AreaSeries::new(curve.points.iter().copied(), 0.0, color.mix(0.35).filled())
                        .border_style(color.stroke_width(2)),
                )?
                .label(format!("{} PD distribution", curve.regime))
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 20, y + 5)], color.mix(0.35).filled())
                });

            let rate = curve.observed_default_rate;
            chart
                .draw_series(
                    dashes((rate, 0.0), (rate, y_max), 30)
                        .into_iter()
                        .map(|segment| PathElement::new(segment, color.stroke_width(2))),
                )?
                .label(format!("{} observed default rate", curve.regime))
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .label_font(font(style, style.legend_px()))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        Ok(())
    }
}
