use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use palette::{Hsl, IntoColor, Srgb};
use serde::Serialize;

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Named colour schemes
// ---------------------------------------------------------------------------

/// Qualitative palette a chart is drawn with. Fixed per chart kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ColorScheme {
    Bold,
    Pastel,
    Safe,
    /// The renderer's default qualitative sequence.
    Plotly,
}

impl ColorScheme {
    pub fn name(self) -> &'static str {
        match self {
            ColorScheme::Bold => "Bold",
            ColorScheme::Pastel => "Pastel",
            ColorScheme::Safe => "Safe",
            ColorScheme::Plotly => "Plotly",
        }
    }

    /// (saturation, lightness, hue offset in degrees)
    fn tone(self) -> (f32, f32, f32) {
        match self {
            ColorScheme::Bold => (0.85, 0.45, 0.0),
            ColorScheme::Pastel => (0.60, 0.80, 20.0),
            ColorScheme::Safe => (0.50, 0.50, 200.0),
            ColorScheme::Plotly => (0.75, 0.55, 230.0),
        }
    }

    /// Generates `n` visually distinct `#rrggbb` colours using evenly spaced hues.
    pub fn colors(self, n: usize) -> Vec<String> {
        let (saturation, lightness, offset) = self.tone();
        (0..n)
            .map(|i| {
                let hue = (offset + (i as f32 / n as f32) * 360.0) % 360.0;
                let hsl = Hsl::new(hue, saturation, lightness);
                let rgb: Srgb = hsl.into_color();
                let rgb: Srgb<u8> = rgb.into_format();
                format!("#{:02x}{:02x}{:02x}", rgb.red, rgb.green, rgb.blue)
            })
            .collect()
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Color mapping: category value → colour
// ---------------------------------------------------------------------------

const MISSING_COLOR: &str = "#808080";

/// Maps the distinct values of a category column to colours of a scheme.
#[derive(Debug, Clone)]
pub struct ColorMap {
    pub column: String,
    mapping: BTreeMap<CellValue, String>,
}

impl ColorMap {
    /// Build a colour map for the given column from its unique values.
    pub fn new(column: &str, unique_values: &BTreeSet<CellValue>, scheme: ColorScheme) -> Self {
        let colors = scheme.colors(unique_values.len());
        let mapping = unique_values.iter().cloned().zip(colors).collect();

        ColorMap {
            column: column.to_string(),
            mapping,
        }
    }

    /// Look up the colour for a given value; unknown values are grey.
    pub fn color_for(&self, value: &CellValue) -> &str {
        self.mapping
            .get(value)
            .map(String::as_str)
            .unwrap_or(MISSING_COLOR)
    }

    /// Legend entries (value label → colour) in value order.
    pub fn legend_entries(&self) -> Vec<(String, String)> {
        self.mapping
            .iter()
            .map(|(v, c)| (v.to_string(), c.clone()))
            .collect()
    }
}
