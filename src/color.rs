use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::model::CellValue;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.65, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: answer category → Color32
// ---------------------------------------------------------------------------

/// One colour per answer category, so a category keeps its colour across
/// every bar group of a chart.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<CellValue, Color32>,
    /// Missing answers are always drawn grey.
    missing_color: Color32,
}

impl ColorMap {
    /// Build a colour map for the given categories.
    pub fn new<'a>(categories: impl IntoIterator<Item = &'a CellValue>) -> Self {
        let present: Vec<&CellValue> = categories.into_iter().filter(|v| !v.is_null()).collect();
        let mapping = present
            .iter()
            .zip(generate_palette(present.len()))
            .map(|(v, c)| ((*v).clone(), c))
            .collect();

        ColorMap {
            mapping,
            missing_color: Color32::GRAY,
        }
    }

    pub fn color_for(&self, value: &CellValue) -> Color32 {
        self.mapping
            .get(value)
            .copied()
            .unwrap_or(self.missing_color)
    }
}
