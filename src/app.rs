use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::{ChartSpec, Section};
use crate::data::error::FilterError;
use crate::state::{AppState, ChartData, Tab};
use crate::ui::{interviews, panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct SurveyLensApp {
    pub state: AppState,
}

impl SurveyLensApp {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }
}

impl eframe::App for SurveyLensApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        if self.state.tab != Tab::Interviews {
            egui::SidePanel::left("filter_panel")
                .default_width(240.0)
                .resizable(true)
                .show(ctx, |ui| {
                    panels::side_panel(ui, &mut self.state);
                });
        }

        // ---- Central panel: charts / data / interviews ----
        egui::CentralPanel::default().show(ctx, |ui| match self.state.tab {
            Tab::Charts => dashboard(ui, &self.state),
            Tab::Data => table::data_table(ui, &self.state),
            Tab::Interviews => interviews::interviews_panel(ui, &mut self.state),
        });
    }
}

/// All configured sections, one row of charts per section.
fn dashboard(ui: &mut Ui, state: &AppState) {
    if let Some(err) = &state.load_error {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label(RichText::new(err).color(Color32::RED).heading());
        });
        return;
    }
    if state.dataset.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to view the survey  (File → Open…)");
        });
        return;
    }

    let missing_label = state.config.missing_label.as_str();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.heading(&state.config.title);

            for (s, section) in state.config.sections.iter().enumerate() {
                ui.add_space(12.0);

                let Some(results) = state.charts.get(s) else {
                    continue;
                };

                egui::CollapsingHeader::new(RichText::new(&section.title).heading())
                    .id_salt(("section", s))
                    .default_open(s == 0)
                    .show(ui, |ui: &mut Ui| {
                        section_charts(ui, s, section, results, missing_label);
                    });
            }
        });
}

/// One row of charts, side by side.
fn section_charts(
    ui: &mut Ui,
    s: usize,
    section: &Section,
    results: &[Result<ChartData, FilterError>],
    missing_label: &str,
) {
    ui.columns(section.charts.len().max(1), |cols| {
        for (c, (spec, result)) in section.charts.iter().zip(results).enumerate() {
            let ui = &mut cols[c];
            let id = format!("chart_{s}_{c}");
            match (spec, result) {
                (_, Err(e)) => {
                    ui.label(RichText::new(spec.title()).strong());
                    ui.label(RichText::new(e.to_string()).color(Color32::RED));
                }
                (ChartSpec::CrossTab { title, .. }, Ok(ChartData::CrossTab { table, colors })) => {
                    plot::cross_tab_chart(ui, &id, title, table, colors, missing_label);
                }
                (ChartSpec::Radar { title, .. }, Ok(ChartData::Radar(counts))) => {
                    plot::radar_chart(ui, &id, title, counts, missing_label);
                }
                _ => {}
            }
        }
    });
}
