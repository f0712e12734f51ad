use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use wastewater_dashboard::data::model::SeriesKind;

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – selection widgets
// ---------------------------------------------------------------------------

/// Render the left selection panel: country, series toggles, year range.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Selection");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };
    let Some(current) = state.criteria.as_ref().map(|c| c.entity().to_string()) else {
        ui.label("Dataset has no entities.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Country selector ----
            ui.strong("Select a Country");
            egui::ComboBox::from_id_salt("entity")
                .selected_text(&current)
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    for entity in dataset.entities() {
                        if ui.selectable_label(current == *entity, entity).clicked()
                            && current != *entity
                        {
                            state.select_entity(entity);
                        }
                    }
                });
            ui.separator();

            // ---- Series toggles ----
            for kind in SeriesKind::ALL {
                let mut checked = state
                    .criteria
                    .as_ref()
                    .is_some_and(|c| c.is_enabled(kind));
                if ui
                    .checkbox(&mut checked, format!("Show {}", kind.label()))
                    .changed()
                {
                    state.set_series(kind, checked);
                }
            }
            ui.separator();

            // ---- Year range ----
            ui.strong("Select the Year Range");
            let (Some(bounds), Some(criteria)) = (state.entity_years, state.criteria.as_ref())
            else {
                return;
            };
            let mut year_min = criteria.year_min();
            let mut year_max = criteria.year_max();
            let range = bounds.min()..=bounds.max();

            let min_changed = ui
                .add(egui::Slider::new(&mut year_min, range.clone()).text("from"))
                .changed();
            let max_changed = ui
                .add(egui::Slider::new(&mut year_max, range).text("to"))
                .changed();

            if min_changed {
                state.set_year_min(year_min);
            }
            if max_changed {
                state.set_year_max(year_max);
            }
        });
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

        if let Some(ds) = &state.dataset {
            let visible = state.charts.as_ref().map_or(0, |c| c.view.len());
            ui.label(format!(
                "{} records, {} entities, {} selected",
                ds.len(),
                ds.entities().len(),
                visible
            ));
        }
        if let Some(path) = &state.source {
            ui.separator();
            ui.weak(path.display().to_string());
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

/// Replace the dataset with one picked from disk. A failed load keeps the
/// current dataset on screen.
pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open wastewater dataset")
        .add_filter("Supported files", &["csv", "tsv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv", "tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        match wastewater_dashboard::data::load(&path) {
            Ok(dataset) => {
                let keep = state.criteria.as_ref().map(|c| c.entity().to_string());
                state.set_dataset(dataset, Some(path), keep.as_deref());
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", path.display());
                state.status_message = Some(format!("Error: {e}"));
            }
        }
    }
}
