use std::f64::consts::TAU;

use eframe::egui::{Color32, RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoint, PlotPoints, Points, Text};

use crate::color::ColorMap;
use crate::data::counts::ValueCounts;
use crate::data::crosstab::CrossTab;

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Cross-tab chart: grouped bars, one group per row category
// ---------------------------------------------------------------------------

/// Draw a cross-tab as grouped bars: one group per row category, one bar per
/// column category, y axis in percent.
pub fn cross_tab_chart(
    ui: &mut Ui,
    id: &str,
    title: &str,
    table: &CrossTab,
    colors: &ColorMap,
    missing_label: &str,
) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(title).strong());
        ui.weak(format!("n = {}", table.observations()));
    });

    if table.is_empty() {
        ui.label("No responses match the current filters.");
        return;
    }

    let n_series = table.columns.len();
    let group_width = 0.8;
    let bar_width = group_width / n_series as f64;

    let charts: Vec<BarChart> = table
        .columns
        .iter()
        .enumerate()
        .map(|(c, col_value)| {
            let series = col_value.label(missing_label).into_owned();
            let offset = -group_width / 2.0 + bar_width * (c as f64 + 0.5);
            let bars = table
                .rows
                .iter()
                .enumerate()
                .map(|(r, row_value)| {
                    Bar::new(r as f64 + offset, table.percents[r][c])
                        .width(bar_width)
                        .name(format!(
                            "{} / {series}: {} of {}",
                            row_value.label(missing_label),
                            table.counts[r][c],
                            table.row_totals[r]
                        ))
                })
                .collect();
            BarChart::new(bars)
                .name(series)
                .color(colors.color_for(col_value))
        })
        .collect();

    let row_labels: Vec<String> = table
        .rows
        .iter()
        .map(|v| v.label(missing_label).into_owned())
        .collect();

    Plot::new(id)
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label(table.row_dimension.clone())
        .y_axis_label("Percent (%)")
        .x_axis_formatter(move |mark, _range| category_label(&row_labels, mark.value))
        .include_y(0.0)
        .include_y(100.0)
        .allow_scroll(false)
        .allow_drag(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            for chart in charts {
                plot_ui.bar_chart(chart);
            }
        });
}

/// Axis label for the group centred on `x`; blank between groups.
fn category_label(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if (x - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Radar chart: answer frequencies around a circle
// ---------------------------------------------------------------------------

/// Draw value counts as a closed polar line, one spoke per answer.
pub fn radar_chart(ui: &mut Ui, id: &str, title: &str, counts: &ValueCounts, missing_label: &str) {
    ui.horizontal(|ui: &mut Ui| {
        ui.label(RichText::new(title).strong());
        ui.weak(format!("n = {}", counts.total()));
    });

    if counts.is_empty() {
        ui.label("No responses match the current filters.");
        return;
    }

    let n = counts.entries.len();
    let max = counts
        .entries
        .iter()
        .map(|(_, c)| *c)
        .max()
        .unwrap_or(1)
        .max(1) as f64;
    let angle = |i: usize| TAU * i as f64 / n as f64;
    let polar = |i: usize, r: f64| [r * angle(i).sin(), r * angle(i).cos()];

    let mut outline: Vec<[f64; 2]> = counts
        .entries
        .iter()
        .enumerate()
        .map(|(i, (_, c))| polar(i, *c as f64))
        .collect();
    if let Some(first) = outline.first().copied() {
        outline.push(first);
    }

    let ring = |r: f64| -> PlotPoints {
        (0..=64)
            .map(|k| {
                let a = TAU * k as f64 / 64.0;
                [r * a.sin(), r * a.cos()]
            })
            .collect()
    };

    Plot::new(id)
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_scroll(false)
        .allow_drag(false)
        .allow_zoom(false)
        .show(ui, |plot_ui| {
            for frac in [0.5, 1.0] {
                plot_ui.line(Line::new(ring(max * frac)).color(Color32::DARK_GRAY).width(0.5));
            }
            for (i, (value, count)) in counts.entries.iter().enumerate() {
                plot_ui.line(
                    Line::new(PlotPoints::from(vec![[0.0, 0.0], polar(i, max)]))
                        .color(Color32::DARK_GRAY)
                        .width(0.5),
                );
                let [x, y] = polar(i, max * 1.12);
                plot_ui.text(Text::new(
                    PlotPoint::new(x, y),
                    format!("{} ({count})", value.label(missing_label)),
                ));
            }
            plot_ui.line(
                Line::new(PlotPoints::from(outline.clone()))
                    .name(&counts.column)
                    .color(Color32::LIGHT_BLUE)
                    .width(2.0),
            );
            plot_ui.points(Points::new(PlotPoints::from(outline.clone())).radius(3.0));
        });
}
