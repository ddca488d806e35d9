use super::{DrawResult, Figure, bounds, font};
use crate::FigureStyle;
use crate::style::magma;
use crate::timeline::{DefaultRateGrid, year_fraction};
use plotters::coord::Shift;
use plotters::prelude::*;

/// Width of the colour bar panel, in pixels.
const COLORBAR_WIDTH: i32 = 110;

/// Steps drawn in the colour bar.
const COLORBAR_STEPS: u32 = 64;

/// Default rate per month (x) and regime (y) on the magma colour map.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultRateHeatmap {
    grid: DefaultRateGrid,
}

impl DefaultRateHeatmap {
    /// Wrap a computed grid.
    pub const fn new(grid: DefaultRateGrid) -> Self {
        Self { grid }
    }

    /// Plotted grid.
    pub const fn grid(&self) -> &DefaultRateGrid {
        &self.grid
    }

    /// Range the colour map is stretched over.
    fn color_range(&self) -> (f64, f64) {
        bounds(
            self.grid
                .regimes()
                .iter()
                .filter_map(|r| self.grid.rates(*r))
                .flatten()
                .flatten()
                .copied(),
        )
    }
}

impl Figure for DefaultRateHeatmap {
    fn name(&self) -> &'static str {
        "figure_3_default_rate_heatmap"
    }

    fn size(&self, style: &FigureStyle) -> (u32, u32) {
        (style.width * 11 / 8, style.height * 4 / 5)
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        style: &FigureStyle,
    ) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        let root = root.titled(
            "Default Rate Intensity Over Time by Macroeconomic Regime",
            font(style, style.title_px()),
        )?;
        let (width, _) = root.dim_in_pixel();
        let (main, bar) = root.split_horizontally(width as i32 - COLORBAR_WIDTH);

        let months = self.grid.months();
        let regimes = self.grid.regimes();
        let rows = regimes.len();
        let edges: Vec<f64> = months
            .iter()
            .map(|m| year_fraction(*m))
            .chain(months.last().map(|m| year_fraction(*m) + 1.0 / 12.0))
            .collect();
        let (x0, x1) = bounds(edges.iter().copied());
        let (lo, hi) = self.color_range();

        let mut chart = ChartBuilder::on(&main)
            .margin(10)
            .x_label_area_size(45)
            .y_label_area_size(90)
            .build_cartesian_2d(x0..x1, 0.0..rows.max(1) as f64)?;

        // Regime names sit at row centres; the first regime is the top row.
        let names: Vec<&str> = regimes.iter().map(|r| r.as_str()).collect();
        let row_label = |y: &f64| {
            let from_top = rows as f64 - 0.5 - y;
            if (from_top - from_top.round()).abs() > 1e-6 || from_top < -1e-6 {
                return String::new();
            }
            names
                .get(from_top.round() as usize)
                .map_or_else(String::new, |name| (*name).to_string())
        };

        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc("Time")
            .x_label_formatter(&|x| format!("{x:.0}"))
            .y_labels(2 * rows + 1)
            .y_label_formatter(&row_label)
            .label_style(font(style, style.tick_px()))
            .axis_desc_style(font(style, style.label_px()))
            .draw()?;

        for (row, regime) in regimes.iter().enumerate() {
            let Some(rates) = self.grid.rates(*regime) else {
                continue;
            };
            let top = (rows - row) as f64;
            chart.draw_series(rates.iter().zip(edges.windows(2)).filter_map(|(rate, x)| {
                let t = (rate.as_ref()? - lo) / (hi - lo);
                Some(Rectangle::new(
                    [(x[0], top - 1.0), (x[1], top)],
                    magma(t).filled(),
                ))
            }))?;
        }

        let mut colorbar = ChartBuilder::on(&bar)
            .margin(10)
            .margin_left(5)
            .y_label_area_size(60)
            .build_cartesian_2d(0.0..1.0, lo..hi)?;

        colorbar
            .configure_mesh()
            .disable_mesh()
            .disable_x_axis()
            .y_desc("Default Rate")
            .y_label_formatter(&|v| format!("{v:.2}"))
            .label_style(font(style, style.tick_px()))
            .axis_desc_style(font(style, style.label_px()))
            .draw()?;

        let step = (hi - lo) / f64::from(COLORBAR_STEPS);
        colorbar.draw_series((0..COLORBAR_STEPS).map(|k| {
            let k = f64::from(k);
            Rectangle::new(
                [(0.0, lo + step * k), (1.0, lo + step * (k + 1.0))],
                magma((k + 0.5) / f64::from(COLORBAR_STEPS)).filled(),
            )
        }))?;
        Ok(())
    }
}
