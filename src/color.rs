use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` distinct colours sweeping purple → orange → yellow,
/// in the spirit of the "plasma" colormap.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let t = if n == 1 { 0.0 } else { i as f32 / (n - 1) as f32 };
            let hue = 270.0 + t * 150.0;
            let hsl = Hsl::new(hue % 360.0, 0.8, 0.45 + 0.15 * t);
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
// Color mapping: category → Color32
// ---------------------------------------------------------------------------

/// Maps the categories of a closed domain to distinct colours.
#[derive(Debug, Clone)]
pub struct ColorMap<K> {
    mapping: BTreeMap<K, Color32>,
    default_color: Color32,
}

impl<K: Ord + Copy> ColorMap<K> {
    /// Build a colour map over `keys`, assigned in the given order.
    pub fn new(keys: &[K]) -> Self {
        let mapping = keys
            .iter()
            .copied()
            .zip(generate_palette(keys.len()))
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a category.
    pub fn color_for(&self, key: &K) -> Color32 {
        self.mapping.get(key).copied().unwrap_or(self.default_color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Cut, Grade};

    #[test]
    fn test_palette_is_distinct() {
        let p = generate_palette(8);
        assert_eq!(p.len(), 8);
        for (i, a) in p.iter().enumerate() {
            for b in &p[i + 1..] {
                assert_ne!(a, b);
            }
        }
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(1).len(), 1);
    }

    #[test]
    fn test_color_map_covers_domain() {
        let cm = ColorMap::new(Cut::ALL);
        assert_ne!(cm.color_for(&Cut::Fair), cm.color_for(&Cut::Ideal));
        let partial = ColorMap::new(&[Cut::Fair]);
        assert_eq!(partial.color_for(&Cut::Ideal), Color32::GRAY);
    }
}
