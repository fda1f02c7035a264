use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::filter::RangeFilter;
use crate::data::model::{Cut, Grade};
use crate::state::{AppState, Page};

// ---------------------------------------------------------------------------
// Left side panel – navigation and filter widgets
// ---------------------------------------------------------------------------

/// Render the left navigation / filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading("Navigation");
            ui.separator();
            for page in Page::ALL {
                ui.radio_value(&mut state.page, page, page.title());
            }

            ui.add_space(8.0);
            ui.heading("Filter data");
            ui.separator();

            if state.dataset.is_empty() {
                ui.label("No dataset loaded.");
                return;
            }

            range_sliders(ui, "Carat range", &mut state.filters.carat, 0.01);
            range_sliders(ui, "Volume range (mm³)", &mut state.filters.volume, 1.0);
            range_sliders(ui, "Price range ($)", &mut state.filters.price, 1.0);

            // ---- Cut multi-select ----
            let n_selected = state.filters.cuts.len();
            let header_text = format!("Cuts  ({n_selected}/{})", Cut::ALL.len());
            egui::CollapsingHeader::new(RichText::new(header_text).strong())
                .id_salt("cut_filter")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    ui.horizontal(|ui: &mut Ui| {
                        if ui.small_button("All").clicked() {
                            state.select_all_cuts();
                        }
                        if ui.small_button("None").clicked() {
                            state.select_no_cuts();
                        }
                    });
                    for &cut in Cut::ALL {
                        let mut checked = state.filters.cuts.contains(&cut);
                        if ui.checkbox(&mut checked, cut.label()).changed() {
                            state.toggle_cut(cut);
                        }
                    }
                });

            ui.add_space(6.0);
            if ui.button("Reset filters").clicked() {
                state.reset_filters();
            }
        });

    // Recompute visible indices after any slider changes.
    state.refilter();
}

fn range_sliders(ui: &mut Ui, label: &str, range: &mut RangeFilter, step: f64) {
    ui.strong(label);
    let bounds = range.lower_bound..=range.upper_bound;
    ui.add(Slider::new(&mut range.min, bounds.clone()).step_by(step).text("min"));
    ui.add(Slider::new(&mut range.max, bounds).step_by(step).text("max"));
    if range.min > range.max {
        range.max = range.min;
    }
    ui.add_space(4.0);
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.label(format!(
            "{} diamonds loaded from {}, {} visible",
            state.dataset.len(),
            state.source.display(),
            state.visible_indices.len()
        ));

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Reload the table from another file. A failure keeps the current dataset.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open diamond data")
        .add_filter("Supported files", &["csv", "parquet", "pq", "json"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        match crate::data::loader::load_file(&path) {
            Ok(dataset) => {
                log::info!("Loaded {} diamonds from {}", dataset.len(), path.display());
                state.set_dataset(dataset, path);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
