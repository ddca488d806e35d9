use super::{DrawResult, Figure, bounds, dashes, font};
use crate::FigureStyle;
use crate::timeline::{MonthlyCount, monthly_issuance, year_fraction};
use chrono::NaiveDate;
use plotters::coord::Shift;
use plotters::prelude::*;

/// Monthly loan issuance with the train/test cutoff marked.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainTestTimeline {
    issuance: Vec<MonthlyCount>,
    cutoff: NaiveDate,
}

impl TrainTestTimeline {
    /// Build from the issue date of every loan.
    pub fn new(issue_dates: &[NaiveDate], cutoff: NaiveDate) -> Self {
        Self {
            issuance: monthly_issuance(issue_dates),
            cutoff,
        }
    }

    /// Monthly counts shown.
    pub fn issuance(&self) -> &[MonthlyCount] {
        &self.issuance
    }
}

impl Figure for TrainTestTimeline {
    fn name(&self) -> &'static str {
        "figure_1_train_test_split"
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        style: &FigureStyle,
    ) -> DrawResult<DB> {
        root.fill(&WHITE)?;

        let points: Vec<(f64, f64)> = self
            .issuance
            .iter()
            .map(|c| (year_fraction(c.month), c.count as f64))
            .collect();
        let cutoff = year_fraction(self.cutoff);
        let (x0, x1) = bounds(points.iter().map(|p| p.0).chain([cutoff]));
        let y_max = points.iter().map(|p| p.1).fold(1.0, f64::max) * 1.05;

        let mut chart = ChartBuilder::on(root)
            .caption(
                "Loan Issuance Over Time (Train/Test Split)",
                font(style, style.title_px()),
            )
            .margin(15)
            .x_label_area_size(45)
            .y_label_area_size(65)
            .build_cartesian_2d(x0..x1, 0.0..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc("Issue Date")
            .y_desc("Number of Loans")
            .x_label_formatter(&|x| format!("{x:.0}"))
            .y_label_formatter(&|y| format!("{y:.0}"))
            .label_style(font(style, style.tick_px()))
            .axis_desc_style(font(style, style.label_px()))
            .draw()?;

        let line = style.primary.color();
        chart.draw_series(LineSeries::new(points, line.stroke_width(2)))?;

        let marker = style.marker.color();
        chart
            .draw_series(
                dashes((cutoff, 0.0), (cutoff, y_max), 30)
                    .into_iter()
                    .map(|segment| PathElement::new(segment, marker.stroke_width(2))),
            )?
            .label("Train / Test Split")
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], marker.stroke_width(2))
            });

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(font(style, style.legend_px()))
            .background_style(&WHITE.mix(0.8))
            .border_style(&BLACK)
            .draw()?;
        Ok(())
    }
}
