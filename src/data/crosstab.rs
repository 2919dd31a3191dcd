use std::collections::{BTreeMap, BTreeSet};

use super::error::FilterError;
use super::filter::MissingPolicy;
use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// CrossTab – row-normalised percentage table of two categorical columns
// ---------------------------------------------------------------------------

/// Distribution of `column_dimension` values within each `row_dimension`
/// value, in percent.
///
/// Every column category observed anywhere in the input appears in every
/// row, with 0 where a group never gave that answer, so charts share one
/// category axis.
#[derive(Debug, Clone, PartialEq)]
pub struct CrossTab {
    pub row_dimension: String,
    pub column_dimension: String,
    /// Row categories, sorted.
    pub rows: Vec<CellValue>,
    /// Column categories, sorted.
    pub columns: Vec<CellValue>,
    /// `counts[r][c]`: responses with `rows[r]` and `columns[c]`.
    pub counts: Vec<Vec<usize>>,
    /// Responses per row category.
    pub row_totals: Vec<usize>,
    /// `percents[r][c]` in [0, 100]; each row sums to 100 unless its total is 0.
    pub percents: Vec<Vec<f64>>,
}

impl CrossTab {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.columns.is_empty()
    }

    /// Number of responses that took part in the table.
    pub fn observations(&self) -> usize {
        self.row_totals.iter().sum()
    }
}

#[cfg(test)]
impl CrossTab {
    /// Percentage for a (row, column) category pair, `None` if either is not
    /// part of the table.
    pub fn percent(&self, row: &CellValue, column: &CellValue) -> Option<f64> {
        let r = self.rows.binary_search(row).ok()?;
        let c = self.columns.binary_search(column).ok()?;
        Some(self.percents[r][c])
    }

    /// Sum of a row's percentages; 100 for any observed row.
    pub fn row_sum(&self, row: usize) -> f64 {
        self.percents.get(row).map(|r| r.iter().sum()).unwrap_or(0.0)
    }
}

/// Cross-tabulate `row_dimension` against `column_dimension`, normalising
/// each row to 100 %.
///
/// Responses with a missing value in either dimension are left out under
/// [`MissingPolicy::Drop`] and grouped as their own category under
/// [`MissingPolicy::AsCategory`].
pub fn cross_tab(
    dataset: &Dataset,
    row_dimension: &str,
    column_dimension: &str,
    policy: MissingPolicy,
) -> Result<CrossTab, FilterError> {
    for col in [row_dimension, column_dimension] {
        if !dataset.has_column(col) {
            return Err(FilterError::UnknownColumn {
                column: col.to_string(),
            });
        }
    }

    let mut groups: BTreeMap<&CellValue, BTreeMap<&CellValue, usize>> = BTreeMap::new();
    let mut column_categories: BTreeSet<&CellValue> = BTreeSet::new();

    for rec in &dataset.records {
        let (Some(r), Some(c)) = (rec.get(row_dimension), rec.get(column_dimension)) else {
            continue;
        };
        if !policy.keeps(r) || !policy.keeps(c) {
            continue;
        }
        column_categories.insert(c);
        *groups.entry(r).or_default().entry(c).or_insert(0) += 1;
    }

    let columns: Vec<CellValue> = column_categories.iter().map(|v| (*v).clone()).collect();
    let mut rows = Vec::with_capacity(groups.len());
    let mut counts = Vec::with_capacity(groups.len());
    let mut row_totals = Vec::with_capacity(groups.len());
    let mut percents = Vec::with_capacity(groups.len());

    for (row_value, group) in groups {
        let row_counts: Vec<usize> = column_categories
            .iter()
            .map(|c| group.get(c).copied().unwrap_or(0))
            .collect();
        let total: usize = row_counts.iter().sum();
        let row_percents = row_counts
            .iter()
            .map(|&n| {
                if total == 0 {
                    0.0
                } else {
                    n as f64 / total as f64 * 100.0
                }
            })
            .collect();

        rows.push(row_value.clone());
        counts.push(row_counts);
        row_totals.push(total);
        percents.push(row_percents);
    }

    log::debug!(
        "cross-tab {row_dimension} × {column_dimension}: {} × {} categories",
        rows.len(),
        columns.len()
    );

    Ok(CrossTab {
        row_dimension: row_dimension.to_string(),
        column_dimension: column_dimension.to_string(),
        rows,
        columns,
        counts,
        row_totals,
        percents,
    })
}
