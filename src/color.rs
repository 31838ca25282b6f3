use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Theme – the dashboard's green palette
// ---------------------------------------------------------------------------

pub const PRIMARY: Color32 = Color32::from_rgb(0x4C, 0xAF, 0x50);
pub const SECONDARY: Color32 = Color32::from_rgb(0x81, 0xC7, 0x84);
pub const ACCENT: Color32 = Color32::from_rgb(0xA5, 0xD6, 0xA7);
pub const LIGHT: Color32 = Color32::from_rgb(0xC8, 0xE6, 0xC9);

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

/// Colour for a correlation coefficient in [-1, 1]: red for negative,
/// green for positive, darker toward zero.
pub fn correlation_color(r: f64) -> Color32 {
    let r = if r.is_nan() { 0.0 } else { r.clamp(-1.0, 1.0) };
    let lightness = 0.18 + 0.37 * r.abs() as f32;
    let hue = if r >= 0.0 { 122.0 } else { 0.0 };
    let rgb: Srgb = Hsl::new(hue, 0.55, lightness).into_color();
    Color32::from_rgb(
        (rgb.red * 255.0) as u8,
        (rgb.green * 255.0) as u8,
        (rgb.blue * 255.0) as u8,
    )
}

// ---------------------------------------------------------------------------
// Category mapping: label → Color32
// ---------------------------------------------------------------------------

/// Maps category labels (room counts, seller types, ...) to distinct
/// colours, stable across frames.
#[derive(Debug, Clone)]
pub struct CategoryPalette {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl CategoryPalette {
    /// Build a palette over the given labels, in iteration order.
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels: Vec<String> = labels.into_iter().map(Into::into).collect();
        let palette = generate_palette(labels.len());
        let mapping = labels.into_iter().zip(palette).collect();
        CategoryPalette {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a label.
    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping
            .get(label)
            .copied()
            .unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size_and_distinct_colors() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(6);
        assert_eq!(p.len(), 6);
        for i in 1..p.len() {
            assert_ne!(p[0], p[i]);
        }
    }

    #[test]
    fn category_palette_is_stable() {
        let p = CategoryPalette::new(["2", "3", "4"]);
        assert_eq!(p.color_for("3"), p.color_for("3"));
        assert_eq!(p.color_for("unknown"), Color32::GRAY);
    }

    #[test]
    fn correlation_color_handles_nan() {
        // NaN renders as the zero colour instead of panicking.
        let _ = correlation_color(f64::NAN);
        assert_ne!(correlation_color(1.0), correlation_color(-1.0));
    }
}
