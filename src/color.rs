use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

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
            let hsl = Hsl::new(hue, 0.75, 0.55);
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
// Color mapping: column name → Color32
// ---------------------------------------------------------------------------

/// Assigns each column a stable colour so bars keep their hue while the
/// selection changes around them.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    /// Build a colour map for the given column names, in order.
    pub fn new(columns: &[String]) -> Self {
        let palette = generate_palette(columns.len());
        let mapping = columns
            .iter()
            .cloned()
            .zip(palette)
            .collect();
        ColorMap { mapping }
    }

    /// Look up the colour for a column.
    pub fn color_for(&self, column: &str) -> Color32 {
        self.mapping.get(column).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_colors_are_distinct() {
        let palette = generate_palette(6);
        assert_eq!(palette.len(), 6);
        for (i, a) in palette.iter().enumerate() {
            for b in palette.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn unknown_columns_fall_back_to_gray() {
        let map = ColorMap::new(&["amount".to_string()]);
        assert_ne!(map.color_for("amount"), Color32::GRAY);
        assert_eq!(map.color_for("other"), Color32::GRAY);
    }
}
