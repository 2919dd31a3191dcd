//! Error types for loading and summarising survey data.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading a response file.
///
/// Loading is all-or-nothing: any of these means no dataset was produced.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file does not exist.
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// The file exists but could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The content could not be parsed as the format its extension claims.
    #[error("malformed file {path}: {reason}")]
    MalformedFormat { path: PathBuf, reason: String },

    /// A column the dashboard relies on is absent.
    #[error("required column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },
}

impl LoadError {
    pub(crate) fn malformed(path: &std::path::Path, reason: impl std::fmt::Display) -> Self {
        LoadError::MalformedFormat {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            LoadError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }
}

/// Errors raised when a filter or summary names a column the dataset lacks.
///
/// Column names come from configuration, so this indicates a configuration
/// bug rather than bad data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterError {
    #[error("column '{column}' not found in dataset")]
    UnknownColumn { column: String },
}
