use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;

use crate::catalog::{Catalog, Profile};
use crate::color::ColorMap;
use crate::config::{ChartSpec, DashboardConfig};
use crate::data::cache::DatasetCache;
use crate::data::counts::{value_counts, ValueCounts};
use crate::data::crosstab::{cross_tab, CrossTab};
use crate::data::error::FilterError;
use crate::data::export::export_csv;
use crate::data::filter::{apply_filter, selectable_values, FilterSelection, MissingPolicy};
use crate::data::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Derived chart data
// ---------------------------------------------------------------------------

/// Summary behind one configured chart, recomputed after every filter change.
pub enum ChartData {
    CrossTab { table: CrossTab, colors: ColorMap },
    Radar(ValueCounts),
}

/// Which page of the dashboard is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Charts,
    Data,
    Interviews,
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Parsed files, shared across reloads of the same source.
    cache: DatasetCache,

    /// File the current dataset came from.
    pub source_path: Option<PathBuf>,

    /// Loaded dataset (None until a file loads successfully).
    pub dataset: Option<Arc<Dataset>>,

    /// Per-column filter selections.
    pub filters: FilterSelection,

    /// Responses passing the current filters (cached).
    pub view: Option<Dataset>,

    /// Largest number per numeric column of `view`, highlighted in the table.
    pub view_maxima: BTreeMap<String, CellValue>,

    /// One entry per configured chart, in section order.
    pub charts: Vec<Vec<Result<ChartData, FilterError>>>,

    pub catalog: Catalog,
    pub selected_profile: Option<String>,

    pub tab: Tab,

    /// Load failure; nothing but this message is drawn while it is set.
    pub load_error: Option<String>,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig, cache: DatasetCache, catalog: Catalog) -> Self {
        let selected_profile = catalog.names().next().map(str::to_string);
        Self {
            config,
            cache,
            source_path: None,
            dataset: None,
            filters: FilterSelection::new(),
            view: None,
            view_maxima: BTreeMap::new(),
            charts: Vec::new(),
            catalog,
            selected_profile,
            tab: Tab::default(),
            load_error: None,
            status_message: None,
        }
    }

    /// Load `path` through the cache and make it the current dataset.
    ///
    /// On failure the previous dataset is dropped, so no chart is ever drawn
    /// from partial or stale data.
    pub fn open(&mut self, path: &Path) {
        match self.cache.get_or_load(path, &self.config.required_columns) {
            Ok(dataset) => {
                log::info!(
                    "Loaded {} responses with columns {:?}",
                    dataset.len(),
                    dataset.column_names
                );
                self.source_path = Some(path.to_path_buf());
                self.set_dataset(dataset);
            }
            Err(e) => {
                log::error!("Failed to load file: {e:#}");
                self.source_path = Some(path.to_path_buf());
                self.dataset = None;
                self.view = None;
                self.view_maxima.clear();
                self.charts.clear();
                self.load_error = Some(format!("Error: {e}"));
            }
        }
    }

    /// Forget every parsed file; the next open re-reads from disk.
    pub fn clear_cache(&mut self) {
        if self.cache.is_empty() {
            return;
        }
        log::info!("Dropping {} cached dataset(s)", self.cache.len());
        self.cache.clear();
    }

    /// Re-read the current file from disk.
    pub fn reload(&mut self) {
        if let Some(path) = self.source_path.clone() {
            self.cache.invalidate(&path);
            self.open(&path);
        }
    }

    /// Ingest a newly loaded dataset, reset filters and recompute charts.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        self.filters = self
            .config
            .filter_columns
            .iter()
            .map(|f| (f.column.clone(), BTreeSet::new()))
            .collect();
        self.dataset = Some(dataset);
        self.load_error = None;
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the filtered view and every chart after a filter change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let policy = self.config.missing_values;

        match apply_filter(ds, &self.filters, policy) {
            Ok(view) => {
                log::debug!(
                    "Filters {:?} keep {} of {} responses",
                    self.filters,
                    view.len(),
                    ds.len()
                );
                self.charts = self
                    .config
                    .sections
                    .iter()
                    .map(|section| {
                        section
                            .charts
                            .iter()
                            .map(|chart| summarize(&view, chart, policy))
                            .collect()
                    })
                    .collect();
                self.view_maxima = view.numeric_maxima();
                self.view = Some(view);
                self.status_message = None;
            }
            Err(e) => {
                log::error!("Filter failed: {e}");
                self.view = None;
                self.view_maxima.clear();
                self.charts.clear();
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Toggle a single value in a column's allow-list.
    pub fn toggle_filter_value(&mut self, column: &str, value: &CellValue) {
        let selected = self.filters.entry(column.to_string()).or_default();
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
        self.refilter();
    }

    /// Check every value the column offers under the missing-value policy.
    pub fn select_all(&mut self, column: &str) {
        let Some(ds) = &self.dataset else {
            return;
        };
        match selectable_values(ds, column, self.config.missing_values) {
            Ok(values) => {
                self.filters
                    .insert(column.to_string(), values.into_iter().collect());
                self.refilter();
            }
            Err(e) => self.status_message = Some(format!("Error: {e}")),
        }
    }

    /// Remove every constraint on a column.
    pub fn clear_filter(&mut self, column: &str) {
        if let Some(selected) = self.filters.get_mut(column) {
            selected.clear();
        }
        self.refilter();
    }

    /// Number of responses passing the filters.
    pub fn visible_count(&self) -> usize {
        self.view.as_ref().map(Dataset::len).unwrap_or(0)
    }

    /// Write the filtered responses to `path` as CSV.
    pub fn export_view(&self, path: &Path) -> Result<()> {
        let view = self
            .view
            .as_ref()
            .ok_or_else(|| anyhow::anyhow!("no data to export"))?;
        export_csv(view, path)
    }

    /// The interview selected in the catalog tab.
    ///
    /// An unknown key yields the message to show in its place.
    pub fn current_profile(&self) -> Option<Result<&Profile, String>> {
        let key = self.selected_profile.as_deref()?;
        Some(self.catalog.lookup(key).map_err(|e| {
            log::warn!("{e}");
            format!("{e}. Choose another profile from the list.")
        }))
    }
}

fn summarize(
    view: &Dataset,
    chart: &ChartSpec,
    policy: MissingPolicy,
) -> Result<ChartData, FilterError> {
    match chart {
        ChartSpec::CrossTab { row, column, .. } => {
            let table = cross_tab(view, row, column, policy)?;
            let colors = ColorMap::new(&table.columns);
            Ok(ChartData::CrossTab { table, colors })
        }
        ChartSpec::Radar { column, .. } => {
            Ok(ChartData::Radar(value_counts(view, column, policy)?))
        }
    }
}
