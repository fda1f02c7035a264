use std::path::Path;

use anyhow::{Context, Result};
use eframe::egui::ColorImage;

/// Decode a static PNG asset into an egui image.
pub fn load_png(path: &Path) -> Result<ColorImage> {
    let img = image::open(path)
        .with_context(|| format!("decoding image {}", path.display()))?
        .to_rgba8();
    let size = [img.width() as usize, img.height() as usize];
    Ok(ColorImage::from_rgba_unmultiplied(size, img.as_raw()))
}
