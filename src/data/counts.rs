use std::collections::BTreeMap;

use super::error::FilterError;
use super::filter::MissingPolicy;
use super::model::{CellValue, Dataset};

/// Frequency of each answer in one column, most frequent first.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueCounts {
    pub column: String,
    pub entries: Vec<(CellValue, usize)>,
}

impl ValueCounts {
    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, n)| n).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Count answers in `column`. Ties keep value order.
pub fn value_counts(
    dataset: &Dataset,
    column: &str,
    policy: MissingPolicy,
) -> Result<ValueCounts, FilterError> {
    if !dataset.has_column(column) {
        return Err(FilterError::UnknownColumn {
            column: column.to_string(),
        });
    }

    let mut counts: BTreeMap<&CellValue, usize> = BTreeMap::new();
    for val in dataset.records.iter().filter_map(|r| r.get(column)) {
        if policy.keeps(val) {
            *counts.entry(val).or_insert(0) += 1;
        }
    }

    let mut entries: Vec<(CellValue, usize)> =
        counts.into_iter().map(|(v, n)| (v.clone(), n)).collect();
    // Stable sort keeps the BTreeMap's value order among equal counts.
    entries.sort_by(|a, b| b.1.cmp(&a.1));

    Ok(ValueCounts {
        column: column.to_string(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;

    fn dataset(values: &[&str]) -> Dataset {
        let records = values
            .iter()
            .map(|s| {
                let mut r = Record::new();
                r.insert("Motivations".into(), CellValue::parse_text(s));
                r
            })
            .collect();
        Dataset::from_records(vec!["Motivations".into()], records)
    }

    #[test]
    fn sorted_by_descending_count_then_value() {
        let ds = dataset(&["Salaire", "Sens", "Salaire", "Innovation", "Sens", "Salaire"]);
        let vc = value_counts(&ds, "Motivations", MissingPolicy::Drop).unwrap();
        assert_eq!(
            vc.entries,
            vec![
                (CellValue::from("Salaire"), 3),
                (CellValue::from("Sens"), 2),
                (CellValue::from("Innovation"), 1),
            ]
        );
        assert_eq!(vc.total(), 6);
    }

    #[test]
    fn missing_answers_follow_the_policy() {
        let ds = dataset(&["Sens", "", ""]);
        let dropped = value_counts(&ds, "Motivations", MissingPolicy::Drop).unwrap();
        assert_eq!(dropped.total(), 1);

        let kept = value_counts(&ds, "Motivations", MissingPolicy::AsCategory).unwrap();
        assert_eq!(kept.entries[0], (CellValue::Null, 2));
    }

    #[test]
    fn unknown_column_is_rejected() {
        let ds = dataset(&["Sens"]);
        assert!(value_counts(&ds, "Canaux", MissingPolicy::Drop).is_err());
    }
}
