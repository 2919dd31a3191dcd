use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::filter::selectable_values;
use crate::data::model::CellValue;
use crate::state::{AppState, Tab};

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    let policy = state.config.missing_values;
    let filter_columns = state.config.filter_columns.clone();
    let missing_label = state.config.missing_label.clone();

    // Collect clicks and apply them after drawing, so the filtered view is
    // recomputed at most once per frame.
    let mut toggled: Vec<(String, CellValue)> = Vec::new();
    let mut cleared: Vec<String> = Vec::new();
    let mut select_all: Vec<String> = Vec::new();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for filter in &filter_columns {
                let col = &filter.column;
                let values = match selectable_values(&dataset, col, policy) {
                    Ok(values) => values,
                    Err(e) => {
                        ui.label(RichText::new(e.to_string()).color(Color32::RED));
                        continue;
                    }
                };
                let selected = state.filters.get(col).cloned().unwrap_or_default();

                // Show count of selected / total in the header
                let header_text = if selected.is_empty() {
                    format!("{}  (all)", filter.display_label())
                } else {
                    format!("{}  ({}/{})", filter.display_label(), selected.len(), values.len())
                };

                egui::CollapsingHeader::new(RichText::new(header_text).strong())
                    .id_salt(col)
                    .default_open(true)
                    .show(ui, |ui: &mut Ui| {
                        ui.horizontal(|ui: &mut Ui| {
                            if ui
                                .add_enabled(
                                    selected.len() < values.len(),
                                    egui::Button::new("All").small(),
                                )
                                .clicked()
                            {
                                select_all.push(col.clone());
                            }
                            if ui
                                .add_enabled(
                                    !selected.is_empty(),
                                    egui::Button::new("Clear").small(),
                                )
                                .clicked()
                            {
                                cleared.push(col.clone());
                            }
                        });

                        for val in &values {
                            let mut checked = selected.contains(val);
                            let label = val.label(&missing_label);
                            if ui.checkbox(&mut checked, label.as_ref()).changed() {
                                toggled.push((col.clone(), val.clone()));
                            }
                        }
                    });
            }
        });

    for col in select_all {
        state.select_all(&col);
    }
    for col in cleared {
        state.clear_filter(&col);
    }
    for (col, val) in toggled {
        state.toggle_filter_value(&col, &val);
    }
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
            if ui
                .add_enabled(state.source_path.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
            if ui.button("Clear cache").clicked() {
                state.clear_cache();
                ui.close_menu();
            }
            if ui
                .add_enabled(state.view.is_some(), egui::Button::new("Export CSV…"))
                .clicked()
            {
                export_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        ui.selectable_value(&mut state.tab, Tab::Charts, "Charts");
        ui.selectable_value(&mut state.tab, Tab::Data, "Data");
        ui.selectable_value(&mut state.tab, Tab::Interviews, "Interviews");

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} responses loaded, {} visible",
                ds.len(),
                state.visible_count()
            ));
        }

        if let Some(msg) = state.load_error.as_ref().or(state.status_message.as_ref()) {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open survey responses")
        .add_filter("Supported files", &["csv", "tsv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        state.open(&path);
    }
}

pub fn export_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered responses")
        .set_file_name(&state.config.export_file_name)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        match state.export_view(&path) {
            Ok(()) => {
                state.status_message = None;
            }
            Err(e) => {
                log::error!("Failed to export: {e:#}");
                state.status_message = Some(format!("Error: {e:#}"));
            }
        }
    }
}
