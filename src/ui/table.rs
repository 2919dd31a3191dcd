use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::state::AppState;

const ROW_HEIGHT: f32 = 18.0;
const MAX_HIGHLIGHT: Color32 = Color32::from_rgb(110, 95, 20);

// ---------------------------------------------------------------------------
// Data preview: the filtered responses as a table
// ---------------------------------------------------------------------------

pub fn data_table(ui: &mut Ui, state: &AppState) {
    let Some(view) = &state.view else {
        ui.label("No dataset loaded.");
        return;
    };

    ui.horizontal(|ui: &mut Ui| {
        ui.heading("Filtered responses");
        ui.label(format!("({} rows)", view.len()));
    });
    ui.separator();

    if view.is_empty() {
        ui.label("No responses match the current filters.");
        return;
    }

    let missing_label = &state.config.missing_label;
    let columns = &view.column_names;

    egui::ScrollArea::horizontal().show(ui, |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .columns(Column::auto().at_least(80.0).clip(true), columns.len())
            .header(ROW_HEIGHT + 4.0, |mut header| {
                for col in columns {
                    header.col(|ui: &mut Ui| {
                        ui.label(RichText::new(col).strong());
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, view.len(), |mut row| {
                    let idx = row.index();
                    for col in columns {
                        row.col(|ui: &mut Ui| {
                            let cell = view.cell(idx, col);
                            if cell.is_null() {
                                ui.weak(missing_label);
                            } else if state.view_maxima.get(col.as_str()) == Some(cell) {
                                ui.label(
                                    RichText::new(cell.to_string())
                                        .strong()
                                        .background_color(MAX_HIGHLIGHT),
                                );
                            } else {
                                ui.label(cell.to_string());
                            }
                        });
                    }
                });
            });
    });
}
