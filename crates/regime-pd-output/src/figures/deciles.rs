use super::{DrawResult, Figure, font};
use crate::FigureStyle;
use crate::deciles::{DECILES, DecileStat, DecileTable};
use plotters::coord::Shift;
use plotters::prelude::*;
use regime_pd_data::Regime;

/// One line per regime over the PD deciles.
type PanelSeries = Vec<(Regime, Vec<(f64, f64)>)>;

/// Two panels: how each regime's loans spread over predicted-PD deciles,
/// and how often they default within each decile.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionVsRisk {
    table: DecileTable,
}

impl SelectionVsRisk {
    /// Wrap a decile table.
    pub const fn new(table: DecileTable) -> Self {
        Self { table }
    }

    /// Plotted table.
    pub const fn table(&self) -> &DecileTable {
        &self.table
    }

    fn series(&self, value: impl Fn(&DecileStat) -> Option<f64>) -> PanelSeries {
        Regime::ALL
            .into_iter()
            .map(|regime| {
                let points: Vec<(f64, f64)> = self
                    .table
                    .regime(regime)
                    .filter_map(|stat| Some((f64::from(stat.decile), value(stat)?)))
                    .collect();
                (regime, points)
            })
            .filter(|(_, points)| !points.is_empty())
            .collect()
    }
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    style: &FigureStyle,
    title: &str,
    x_desc: &str,
    y_desc: &str,
    series: &PanelSeries,
) -> DrawResult<DB> {
    let y_max = series
        .iter()
        .flat_map(|(_, points)| points.iter().map(|p| p.1))
        .fold(1e-9, f64::max)
        * 1.1;

    let mut chart = ChartBuilder::on(area)
        .caption(title, font(style, style.label_px()))
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(60)
        .build_cartesian_2d(0.5..f64::from(DECILES) + 0.5, 0.0..y_max)?;

    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(usize::from(DECILES))
        .x_label_formatter(&|x| format!("{x:.0}"))
        .y_label_formatter(&|y| format!("{y:.2}"))
        .label_style(font(style, style.tick_px()))
        .axis_desc_style(font(style, style.label_px()))
        .draw()?;

    for (regime, points) in series {
        let color = style.regime_color(*regime);
        chart
            .draw_series(
                LineSeries::new(points.iter().copied(), color.stroke_width(2)).point_size(4),
            )?
            .label(regime.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .label_font(font(style, style.legend_px()))
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()?;
    Ok(())
}

impl Figure for SelectionVsRisk {
    fn name(&self) -> &'static str {
        "figure_12_hero_selection_vs_risk"
    }

    fn size(&self, style: &FigureStyle) -> (u32, u32) {
        (style.width * 14 / 8, style.height * 6 / 5)
    }

    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        style: &FigureStyle,
    ) -> DrawResult<DB> {
        root.fill(&WHITE)?;
        let root = root.titled(
            "Selection vs Risk: How Economic Regimes Reshape Credit Outcomes",
            font(style, style.title_px()),
        )?;
        let (width, _) = root.dim_in_pixel();
        let (left, right) = root.split_horizontally(width as i32 / 2);

        draw_panel(
            &left,
            style,
            "A. Risk Composition Shift Across Regimes",
            "Predicted PD Decile (1 = Low Risk, 10 = High Risk)",
            "Share of Loan Portfolio",
            &self.series(|stat| Some(stat.share)),
        )?;
        draw_panel(
            &right,
            style,
            "B. Default Rates Conditional on Predicted Risk",
            "Predicted PD Decile",
            "Observed Default Rate",
            &self.series(|stat| stat.default_rate),
        )
    }
}
