mod app;
mod catalog;
mod color;
mod config;
mod data;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use app::SurveyLensApp;
use catalog::Catalog;
use clap::Parser;
use config::DashboardConfig;
use data::cache::DatasetCache;
use eframe::egui;
use state::AppState;

/// Survey dashboard: filter questionnaire responses and explore cross-tabulations.
#[derive(Debug, Parser)]
#[command(name = "survey-lens", version, about)]
struct Cli {
    /// Dashboard configuration (JSON). Defaults to the built-in survey layout.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Response file to open at startup (.csv, .tsv, .json, .parquet).
    /// Overrides `data_path` from the configuration.
    #[arg(value_name = "DATA")]
    data: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => DashboardConfig::load(path)
            .with_context(|| format!("loading configuration {}", path.display()))?,
        None => DashboardConfig::default(),
    };

    let catalog = match &config.catalog_path {
        Some(path) => Catalog::from_json(path).context("loading interview catalog")?,
        None => Catalog::builtin(),
    };

    let mut state = AppState::new(config, DatasetCache::new(), catalog);
    if let Some(path) = cli.data.or_else(|| state.config.data_path.clone()) {
        state.open(&path);
    }

    let title = state.config.title.clone();
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([640.0, 420.0]),
        ..Default::default()
    };

    eframe::run_native(
        &title,
        options,
        Box::new(|_cc| Ok(Box::new(SurveyLensApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("running the dashboard: {e}"))
}
