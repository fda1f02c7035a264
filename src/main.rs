mod app;
mod assets;
mod color;
mod config;
mod data;
mod error;
mod pricing;
mod state;
mod ui;

use anyhow::Context;
use app::{CorrelationImage, DiamondExplorerApp};
use config::AppConfig;
use eframe::egui;
use state::AppState;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let config = AppConfig::from_args(std::env::args().skip(1));

    let dataset = data::loader::load_file(&config.data_path)
        .with_context(|| format!("loading diamonds from {}", config.data_path.display()))
        .inspect_err(|e| log::error!("{e:#}"))?;
    log::info!(
        "Loaded {} diamonds from {}",
        dataset.len(),
        config.data_path.display()
    );

    let correlation_image = match assets::load_png(&config.image_path) {
        Ok(image) => CorrelationImage::Decoded(image),
        Err(e) => {
            log::warn!("Correlation image unavailable: {e:#}");
            CorrelationImage::Unavailable(format!("{e:#}"))
        }
    };

    let state = AppState::new(dataset, config.data_path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Diamond Explorer",
        options,
        Box::new(|_cc| Ok(Box::new(DiamondExplorerApp::new(state, correlation_image)))),
    )
    .map_err(|e| anyhow::anyhow!("running UI: {e}"))
}
