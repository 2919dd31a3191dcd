//! Dashboard configuration: which file to read, which columns matter, and
//! which charts to draw.
//!
//! Stored as JSON; every field is optional and falls back to the layout of
//! the "Data challenge" survey:
//!
//! ```json
//! {
//!   "title": "Analyse croisée du sondage",
//!   "data_path": "Data_challenge.csv",
//!   "filter_columns": [{ "column": "Filière", "label": "Filière" }],
//!   "sections": [
//!     { "title": "1. Filière × Niveau de connaissance",
//!       "charts": [{ "kind": "cross_tab", "title": "...", "row": "Filière", "column": "Niveau de connaissance" }] }
//!   ],
//!   "missing_values": "drop"
//! }
//! ```

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::filter::MissingPolicy;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("inconsistent config: {reason}")]
    Invalid { reason: String },
}

/// A column the user can filter on from the side panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterColumn {
    pub column: String,
    /// Heading shown above the checkboxes; defaults to the column name.
    #[serde(default)]
    pub label: Option<String>,
}

impl FilterColumn {
    pub fn new(column: &str, label: &str) -> Self {
        FilterColumn {
            column: column.to_string(),
            label: Some(label.to_string()),
        }
    }

    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.column)
    }
}

/// One chart inside a section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    /// Grouped bars: distribution of `column` within each value of `row`.
    CrossTab {
        title: String,
        row: String,
        column: String,
    },
    /// Closed polar line of the answer frequencies of `column`.
    Radar { title: String, column: String },
}

impl ChartSpec {
    pub fn cross_tab(row: &str, column: &str, title: &str) -> Self {
        ChartSpec::CrossTab {
            title: title.to_string(),
            row: row.to_string(),
            column: column.to_string(),
        }
    }

    pub fn title(&self) -> &str {
        match self {
            ChartSpec::CrossTab { title, .. } | ChartSpec::Radar { title, .. } => title,
        }
    }

    /// Columns the chart reads.
    pub fn columns(&self) -> Vec<&str> {
        match self {
            ChartSpec::CrossTab { row, column, .. } => vec![row.as_str(), column.as_str()],
            ChartSpec::Radar { column, .. } => vec![column.as_str()],
        }
    }
}

/// A titled group of charts laid out side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub charts: Vec<ChartSpec>,
}

impl Section {
    fn single(title: &str, chart: ChartSpec) -> Self {
        Section {
            title: title.to_string(),
            charts: vec![chart],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub title: String,
    /// File loaded at startup; the command line can override it.
    pub data_path: Option<PathBuf>,
    /// Columns the file must contain; loading fails otherwise.
    pub required_columns: Vec<String>,
    pub filter_columns: Vec<FilterColumn>,
    pub sections: Vec<Section>,
    pub missing_values: MissingPolicy,
    /// Label for missing answers when they are shown as a category.
    pub missing_label: String,
    /// Interview catalog; the built-in one is used when absent.
    pub catalog_path: Option<PathBuf>,
    /// Suggested name in the export dialog.
    pub export_file_name: String,
}

const COL_FILIERE: &str = "Filière";
const COL_NIVEAU: &str = "Niveau d'études";
const COL_RECHERCHE: &str = "Recherche d'emploi";
const COL_CONNAISSANCE: &str = "Niveau de connaissance";
const COL_PERCEPTION: &str = "Perception des métiers";
const COL_OPPORTUNITE: &str = "Opportunités de carrière";
const COL_FREINS: &str = "Raisons de ne pas postuler";
const COL_LUXE_INTERET: &str = "Intérêt pour le luxe";
const COL_MOTIVATIONS: &str = "Motivations";
const COL_CANAUX: &str = "Canaux d'information";
const COL_INITIATIVES: &str = "Initiatives motivantes";

impl Default for DashboardConfig {
    fn default() -> Self {
        let sections = vec![
            Section::single(
                "1. Filière × Niveau de connaissance",
                ChartSpec::cross_tab(
                    COL_FILIERE,
                    COL_CONNAISSANCE,
                    "Niveau de connaissance par filière",
                ),
            ),
            Section::single(
                "2. Filière × Recherche d'emploi",
                ChartSpec::cross_tab(COL_FILIERE, COL_RECHERCHE, "Recherche d'emploi par filière"),
            ),
            Section::single(
                "3. Niveau d'études × Opportunités de carrière",
                ChartSpec::cross_tab(
                    COL_NIVEAU,
                    COL_OPPORTUNITE,
                    "Opportunités de carrière selon le niveau d'études",
                ),
            ),
            Section::single(
                "4. Niveau de connaissance × Perception des métiers",
                ChartSpec::cross_tab(
                    COL_CONNAISSANCE,
                    COL_PERCEPTION,
                    "Perception des métiers selon le niveau de connaissance",
                ),
            ),
            Section::single(
                "5. Filière × Raisons de ne pas postuler",
                ChartSpec::cross_tab(COL_FILIERE, COL_FREINS, "Freins selon la filière"),
            ),
            Section::single(
                "6. Niveau de connaissance × Intérêt pour le luxe",
                ChartSpec::cross_tab(
                    COL_CONNAISSANCE,
                    COL_LUXE_INTERET,
                    "Intérêt pour le luxe selon le niveau de connaissance",
                ),
            ),
            Section::single(
                "7. Filière × Motivations",
                ChartSpec::cross_tab(COL_FILIERE, COL_MOTIVATIONS, "Motivations par filière"),
            ),
            Section::single(
                "8. Filière × Canaux d'information",
                ChartSpec::cross_tab(COL_FILIERE, COL_CANAUX, "Canaux d'information par filière"),
            ),
            Section::single(
                "9. Niveau de connaissance × Initiatives motivantes",
                ChartSpec::cross_tab(
                    COL_CONNAISSANCE,
                    COL_INITIATIVES,
                    "Initiatives motivantes selon le niveau de connaissance",
                ),
            ),
            Section::single(
                "10. Perception des métiers",
                ChartSpec::Radar {
                    title: "Adjectifs associés aux métiers".to_string(),
                    column: COL_PERCEPTION.to_string(),
                },
            ),
        ];

        let required_columns = [
            COL_FILIERE,
            COL_NIVEAU,
            COL_RECHERCHE,
            COL_CONNAISSANCE,
            COL_PERCEPTION,
            COL_OPPORTUNITE,
            COL_FREINS,
            COL_LUXE_INTERET,
            COL_MOTIVATIONS,
            COL_CANAUX,
            COL_INITIATIVES,
        ]
        .iter()
        .map(|c| c.to_string())
        .collect();

        DashboardConfig {
            title: "Analyse croisée du sondage".to_string(),
            data_path: Some(PathBuf::from("Data_challenge.csv")),
            required_columns,
            filter_columns: vec![
                FilterColumn::new(COL_FILIERE, "Filière"),
                FilterColumn::new(COL_NIVEAU, "Niveau d'études"),
            ],
            sections,
            missing_values: MissingPolicy::Drop,
            missing_label: "(sans réponse)".to_string(),
            catalog_path: None,
            export_file_name: "filtered_responses.csv".to_string(),
        }
    }
}

impl DashboardConfig {
    /// Read and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: DashboardConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Every column a filter or chart reads must be a required column, so a
    /// dataset that loaded successfully can serve the whole dashboard.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let required: BTreeSet<&str> =
            self.required_columns.iter().map(String::as_str).collect();

        let filter_cols = self.filter_columns.iter().map(|f| f.column.as_str());
        let chart_cols = self
            .sections
            .iter()
            .flat_map(|s| s.charts.iter())
            .flat_map(|c| c.columns());

        if let Some(col) = filter_cols.chain(chart_cols).find(|c| !required.contains(c)) {
            return Err(ConfigError::Invalid {
                reason: format!("column '{col}' is used but not listed in required_columns"),
            });
        }

        let mut seen = BTreeSet::new();
        if let Some(dup) = self
            .filter_columns
            .iter()
            .find(|f| !seen.insert(f.column.as_str()))
        {
            return Err(ConfigError::Invalid {
                reason: format!("column '{}' has more than one filter", dup.column),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn default_config_validates() {
        let config = DashboardConfig::default();
        config.validate().unwrap();
        let cross_tabs = config
            .sections
            .iter()
            .flat_map(|s| &s.charts)
            .filter(|c| matches!(c, ChartSpec::CrossTab { .. }))
            .count();
        assert_eq!(cross_tabs, 9);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let file = write_config(
            r#"{
                "title": "Sondage Q",
                "required_columns": ["Q1", "Q4"],
                "filter_columns": [{ "column": "Q1" }],
                "sections": [{ "title": "1", "charts": [
                    { "kind": "cross_tab", "title": "Connaissance", "row": "Q1", "column": "Q4" }
                ]}],
                "missing_values": "as_category"
            }"#,
        );
        let config = DashboardConfig::load(file.path()).unwrap();

        assert_eq!(config.title, "Sondage Q");
        assert_eq!(config.missing_values, MissingPolicy::AsCategory);
        assert_eq!(config.filter_columns[0].display_label(), "Q1");
        assert_eq!(config.export_file_name, "filtered_responses.csv");
        assert_eq!(config.sections[0].charts[0].columns(), vec!["Q1", "Q4"]);
    }

    #[test]
    fn chart_column_outside_required_is_invalid() {
        let file = write_config(
            r#"{
                "required_columns": ["Q1"],
                "filter_columns": [],
                "sections": [{ "title": "1", "charts": [
                    { "kind": "radar", "title": "Adjectifs", "column": "Q5" }
                ]}]
            }"#,
        );
        assert!(matches!(
            DashboardConfig::load(file.path()),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn duplicate_filter_is_invalid() {
        let config = DashboardConfig {
            filter_columns: vec![
                FilterColumn::new(COL_FILIERE, "a"),
                FilterColumn::new(COL_FILIERE, "b"),
            ],
            ..DashboardConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn bundled_demo_config_validates() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/metiers_lv.json");
        let config = DashboardConfig::load(&path).unwrap();
        assert_eq!(config.missing_values, MissingPolicy::AsCategory);
        assert_eq!(config.sections.len(), 3);
        assert_eq!(config.sections[2].charts.len(), 3);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let file = write_config("{ not json");
        assert!(matches!(
            DashboardConfig::load(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }
}
