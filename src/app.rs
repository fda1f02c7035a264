use eframe::egui::{self, ColorImage, TextureHandle, TextureOptions};

use crate::state::AppState;
use crate::ui::{pages, panels};

/// Correlation heatmap: decoded at start-up, uploaded on the first frame.
pub enum CorrelationImage {
    Decoded(ColorImage),
    Ready(TextureHandle),
    Unavailable(String),
}

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct DiamondExplorerApp {
    pub state: AppState,
    correlation_image: CorrelationImage,
}

impl DiamondExplorerApp {
    pub fn new(state: AppState, correlation_image: CorrelationImage) -> Self {
        Self {
            state,
            correlation_image,
        }
    }

    /// Upload a freshly decoded image to the GPU once a context exists.
    fn upload_correlation_image(&mut self, ctx: &egui::Context) {
        if !matches!(self.correlation_image, CorrelationImage::Decoded(_)) {
            return;
        }
        let taken = std::mem::replace(
            &mut self.correlation_image,
            CorrelationImage::Unavailable(String::new()),
        );
        if let CorrelationImage::Decoded(image) = taken {
            let texture = ctx.load_texture("correlation_matrix", image, TextureOptions::LINEAR);
            self.correlation_image = CorrelationImage::Ready(texture);
        }
    }
}

impl eframe::App for DiamondExplorerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.upload_correlation_image(ctx);

        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: navigation and filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: current page ----
        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| {
                    let image = match &self.correlation_image {
                        CorrelationImage::Ready(texture) => Ok(texture),
                        CorrelationImage::Unavailable(reason) => Err(reason.as_str()),
                        CorrelationImage::Decoded(_) => Err("image not uploaded"),
                    };
                    pages::show(ui, &mut self.state, image);
                });
        });
    }
}
