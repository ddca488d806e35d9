//! Figure styling.

use plotters::style::RGBColor;
use regime_pd_data::Regime;
use serde::{Deserialize, Serialize};

/// An RGB colour that can be read from configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    /// The plotters colour.
    pub const fn color(self) -> RGBColor {
        RGBColor(self.0, self.1, self.2)
    }
}

/// Shared look of every report figure.
///
/// Sizes are in pixels and fonts in points. Defaults follow a 8×5 inch
/// figure at 100 dpi with a 12pt base font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FigureStyle {
    /// Default figure width
    pub width: u32,
    /// Default figure height
    pub height: u32,
    /// Font family passed to the drawing backend
    pub font_family: String,
    /// Title size
    pub title_size: u32,
    /// Axis label size
    pub label_size: u32,
    /// Tick label size
    pub tick_size: u32,
    /// Legend size
    pub legend_size: u32,
    /// Colour used for single-series plots
    pub primary: Rgb,
    /// Colour of the Expansion regime
    pub expansion: Rgb,
    /// Colour of the Stress regime
    pub stress: Rgb,
    /// Colour of cutoff and threshold markers
    pub marker: Rgb,
}

impl Default for FigureStyle {
    fn default() -> Self {
        Self {
            width: 800,
            height: 500,
            font_family: "sans-serif".to_string(),
            title_size: 14,
            label_size: 12,
            tick_size: 11,
            legend_size: 11,
            // steelblue
            primary: Rgb(70, 130, 180),
            expansion: Rgb(31, 119, 180),
            stress: Rgb(214, 39, 40),
            marker: Rgb(255, 0, 0),
        }
    }
}

impl FigureStyle {
    /// Default canvas size.
    pub const fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Canvas size with the default height and a custom width.
    pub const fn wide(&self, width: u32) -> (u32, u32) {
        (width, self.height)
    }

    /// Point sizes are scaled to pixels at 100 dpi.
    pub(crate) const fn px(points: u32) -> u32 {
        points * 100 / 72
    }

    /// Font size for titles, in pixels.
    pub const fn title_px(&self) -> u32 {
        Self::px(self.title_size)
    }

    /// Font size for axis labels, in pixels.
    pub const fn label_px(&self) -> u32 {
        Self::px(self.label_size)
    }

    /// Font size for tick labels, in pixels.
    pub const fn tick_px(&self) -> u32 {
        Self::px(self.tick_size)
    }

    /// Font size for legends, in pixels.
    pub const fn legend_px(&self) -> u32 {
        Self::px(self.legend_size)
    }

    /// Colour associated with a regime.
    pub const fn regime_color(&self, regime: Regime) -> RGBColor {
        match regime {
            Regime::Expansion => self.expansion.color(),
            Regime::Stress => self.stress.color(),
        }
    }
}

/// Anchor points of the magma colour map, from dark to light.
const MAGMA: [(f64, [u8; 3]); 9] = [
    (0.000, [0, 0, 4]),
    (0.125, [28, 16, 68]),
    (0.250, [79, 18, 123]),
    (0.375, [129, 37, 129]),
    (0.500, [181, 54, 122]),
    (0.625, [229, 80, 100]),
    (0.750, [251, 135, 97]),
    (0.875, [254, 194, 135]),
    (1.000, [252, 253, 191]),
];

/// Colour of `t` on the magma colour map. `t` is clamped to `[0, 1]`.
pub fn magma(t: f64) -> RGBColor {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let upper = MAGMA
        .iter()
        .position(|(stop, _)| *stop >= t)
        .unwrap_or(MAGMA.len() - 1)
        .max(1);
    let (lo, lo_rgb) = MAGMA[upper - 1];
    let (hi, hi_rgb) = MAGMA[upper];
    let w = (t - lo) / (hi - lo);
    let channel = |i: usize| {
        let a = f64::from(lo_rgb[i]);
        let b = f64::from(hi_rgb[i]);
        (a + (b - a) * w).round() as u8
    };
    RGBColor(channel(0), channel(1), channel(2))
}
