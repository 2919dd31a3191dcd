use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::state::AppState;

// ---------------------------------------------------------------------------
// Qualitative data: interview profiles and synthesis
// ---------------------------------------------------------------------------

pub fn interviews_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Interviews");
    ui.separator();

    if state.catalog.is_empty() {
        ui.label("No interviews in the catalog.");
        return;
    }

    let names: Vec<String> = state.catalog.names().map(str::to_string).collect();
    let current = state.selected_profile.clone().unwrap_or_default();

    ui.horizontal(|ui: &mut Ui| {
        ui.label("Profile");
        egui::ComboBox::from_id_salt("profile")
            .selected_text(&current)
            .width(320.0)
            .show_ui(ui, |ui: &mut Ui| {
                for name in &names {
                    if ui.selectable_label(current == *name, name).clicked() {
                        state.selected_profile = Some(name.clone());
                    }
                }
            });
    });
    ui.add_space(8.0);

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            match state.current_profile() {
                Some(Ok(profile)) => {
                    ui.label(RichText::new(format!("Profile: {}", profile.name)).strong());
                    ui.label(format!("Context: {}", profile.context));
                    ui.label(format!("Objective: {}", profile.objective));
                    ui.add_space(4.0);
                    ui.label(RichText::new("Interview").strong());
                    for quote in &profile.quotes {
                        ui.label(format!("• {quote}"));
                    }
                }
                Some(Err(msg)) => {
                    ui.label(RichText::new(msg).color(Color32::YELLOW));
                }
                None => {
                    ui.label("Select a profile to read the interview.");
                }
            }

            if !state.catalog.synthesis.is_empty() {
                ui.add_space(12.0);
                ui.separator();
                ui.label(RichText::new("Synthesis").strong());
                ui.label(&state.catalog.synthesis);
            }
        });
}
