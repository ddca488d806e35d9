use super::{DrawResult, Figure, bounds, dashes, font};
use crate::FigureStyle;
use crate::timeline::year_fraction;
use chrono::NaiveDate;
use plotters::coord::Shift;
use plotters::prelude::*;

/// Unemployment rate over time with the stress threshold and shaded stress
/// periods.
#[derive(Debug, Clone, PartialEq)]
pub struct MacroRegimes {
    observations: Vec<(NaiveDate, f64)>,
    threshold: f64,
}

impl MacroRegimes {
    /// Build from dated unemployment observations. NaN rates are dropped and
    /// the rest sorted by date.
    pub fn new(observations: impl IntoIterator<Item = (NaiveDate, f64)>, threshold: f64) -> Self {
        let mut observations: Vec<(NaiveDate, f64)> = observations
            .into_iter()
            .filter(|(_, rate)| !rate.is_nan())
            .collect();
        observations.sort_by_key(|(date, _)| *date);
        Self {
            observations,
            threshold,
        }
    }

    /// Periods `[start, end)` shaded as stress: consecutive observations
    /// whose first rate is at or above the threshold.
    pub fn stress_periods(&self) -> Vec<(NaiveDate, NaiveDate, f64)> {
        self.observations
            .windows(2)
            .filter(|w| w[0].1 >= self.threshold)
            .map(|w| (w[0].0, w[1].0, w[0].1))
            .collect()
    }
}

impl Figure for MacroRegimes {
    fn name(&self) -> &'static str {
        "figure_2_macro_regimes"
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        style: &FigureStyle,
    ) -> DrawResult<DB> {
        root.fill(&WHITE)?;

        let points: Vec<(f64, f64)> = self
            .observations
            .iter()
            .map(|(date, rate)| (year_fraction(*date), *rate))
            .collect();
        let (x0, x1) = bounds(points.iter().map(|p| p.0));
        let (lo, hi) = bounds(points.iter().map(|p| p.1).chain([self.threshold]));
        let pad = (hi - lo) * 0.05;
        let (y0, y1) = ((lo - pad).max(0.0), hi + pad);

        let mut chart = ChartBuilder::on(root)
            .caption(
                "Macroeconomic Regimes via Unemployment Rate",
                font(style, style.title_px()),
            )
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(55)
            .build_cartesian_2d(x0..x1, y0..y1)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Date")
            .y_desc("Unemployment Rate (%)")
            .x_label_formatter(&|x| format!("{x:.0}"))
            .label_style(font(style, style.tick_px()))
            .axis_desc_style(font(style, style.label_px()))
            .draw()?;

        let marker = style.marker.color();
        let shade = marker.mix(0.25).filled();
        let threshold = self.threshold;
        chart
            .draw_series(self.stress_periods().into_iter().map(|(start, end, rate)| {
                Rectangle::new(
                    [(year_fraction(start), threshold), (year_fraction(end), rate)],
                    shade,
                )
            }))?
            .label("Stress Regime")
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 20, y + 5)], shade));

        chart
            .draw_series(LineSeries::new(points, BLACK.stroke_width(2)))?
            .label("Unemployment Rate")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLACK.stroke_width(2)));

        chart
            .draw_series(
                dashes((x0, threshold), (x1, threshold), 60)
                    .into_iter()
                    .map(|segment| PathElement::new(segment, marker.stroke_width(2))),
            )?
            .label(format!("Stress Threshold ({threshold}%)"))
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], marker.stroke_width(2))
            });

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
