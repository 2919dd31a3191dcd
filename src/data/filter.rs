use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::error::FilterError;
use super::model::{CellValue, Dataset};

// ---------------------------------------------------------------------------
// Missing-value policy
// ---------------------------------------------------------------------------

/// How missing answers take part in filtering and summaries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingPolicy {
    /// Missing cells are unobserved: they never match a filter and are left
    /// out of every count.
    #[default]
    Drop,
    /// Missing is a category of its own, selectable and counted.
    AsCategory,
}

impl MissingPolicy {
    /// Whether a cell takes part in grouping and matching under this policy.
    pub fn keeps(self, value: &CellValue) -> bool {
        self == MissingPolicy::AsCategory || !value.is_null()
    }
}

// ---------------------------------------------------------------------------
// Filter selection: which values are allowed per column
// ---------------------------------------------------------------------------

/// Per-column allow-lists: column_name → set of allowed values.
/// If a column is absent or its set is empty, it means "no filter" (show all).
pub type FilterSelection = BTreeMap<String, BTreeSet<CellValue>>;

/// Values offered for a column's filter widget, in sorted order.
///
/// Under [`MissingPolicy::AsCategory`] the missing value is offered first when
/// the column has any.
pub fn selectable_values(
    dataset: &Dataset,
    column: &str,
    policy: MissingPolicy,
) -> Result<Vec<CellValue>, FilterError> {
    let values = dataset
        .unique_values
        .get(column)
        .ok_or_else(|| FilterError::UnknownColumn {
            column: column.to_string(),
        })?;

    let mut out = Vec::with_capacity(values.len() + 1);
    if policy == MissingPolicy::AsCategory && dataset.columns_with_nulls.contains(column) {
        out.push(CellValue::Null);
    }
    out.extend(values.iter().cloned());
    Ok(out)
}

/// Return a new dataset holding only the rows that pass every constrained
/// column of `selection`.
///
/// A row passes a column constraint when:
/// * The allow-list is empty → passes (no constraint)
/// * The row's value is in the allow-list → passes, except that a missing
///   value only ever matches under [`MissingPolicy::AsCategory`]
///
/// Naming a column the dataset lacks is a [`FilterError::UnknownColumn`].
pub fn apply_filter(
    dataset: &Dataset,
    selection: &FilterSelection,
    policy: MissingPolicy,
) -> Result<Dataset, FilterError> {
    if let Some(column) = selection.keys().find(|c| !dataset.has_column(c)) {
        return Err(FilterError::UnknownColumn {
            column: column.clone(),
        });
    }

    let active: Vec<(&String, &BTreeSet<CellValue>)> = selection
        .iter()
        .filter(|(_, allowed)| !allowed.is_empty())
        .collect();

    if active.is_empty() {
        return Ok(dataset.clone());
    }

    let records = dataset
        .records
        .iter()
        .filter(|rec| {
            active.iter().all(|(col, allowed)| match rec.get(*col) {
                Some(val) => policy.keeps(val) && allowed.contains(val),
                None => false,
            })
        })
        .cloned()
        .collect();

    Ok(Dataset::from_records(dataset.column_names.clone(), records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::Record;
    use proptest::prelude::*;

    fn survey() -> Dataset {
        let rows = [
            ("Ingénierie", "Master", "Oui"),
            ("Ingénierie", "Licence", "Non"),
            ("Commerce", "Master", ""),
            ("Design", "", "Oui"),
        ];
        let columns = vec![
            "Filière".to_string(),
            "Niveau".to_string(),
            "Recherche".to_string(),
        ];
        let records = rows
            .iter()
            .map(|(a, b, c)| {
                let mut r = Record::new();
                r.insert("Filière".into(), CellValue::parse_text(a));
                r.insert("Niveau".into(), CellValue::parse_text(b));
                r.insert("Recherche".into(), CellValue::parse_text(c));
                r
            })
            .collect();
        Dataset::from_records(columns, records)
    }

    fn select(pairs: Vec<(&str, Vec<CellValue>)>) -> FilterSelection {
        pairs
            .into_iter()
            .map(|(c, vals)| (c.to_string(), vals.into_iter().collect()))
            .collect()
    }

    #[test]
    fn empty_allow_list_is_a_no_op() {
        let ds = survey();
        let sel = select(vec![("Filière", vec![])]);
        let filtered = apply_filter(&ds, &sel, MissingPolicy::Drop).unwrap();
        assert_eq!(filtered, ds);
    }

    #[test]
    fn constraints_are_and_combined() {
        let ds = survey();
        let sel = select(vec![
            ("Filière", vec!["Ingénierie".into(), "Commerce".into()]),
            ("Niveau", vec!["Master".into()]),
        ]);
        let filtered = apply_filter(&ds, &sel, MissingPolicy::Drop).unwrap();
        assert_eq!(filtered.len(), 2);
        assert!(filtered
            .records
            .iter()
            .all(|r| r["Niveau"] == CellValue::from("Master")));
    }

    #[test]
    fn unknown_column_is_rejected() {
        let ds = survey();
        let sel = select(vec![("Âge", vec![])]);
        let err = apply_filter(&ds, &sel, MissingPolicy::Drop).unwrap_err();
        assert_eq!(
            err,
            FilterError::UnknownColumn {
                column: "Âge".into()
            }
        );
    }

    #[test]
    fn missing_values_match_only_as_a_category() {
        let ds = survey();
        let sel = select(vec![("Niveau", vec![CellValue::Null])]);

        let dropped = apply_filter(&ds, &sel, MissingPolicy::Drop).unwrap();
        assert!(dropped.is_empty());

        let kept = apply_filter(&ds, &sel, MissingPolicy::AsCategory).unwrap();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept.cell(0, "Filière"), &CellValue::from("Design"));
    }

    #[test]
    fn selectable_values_offer_missing_only_as_a_category() {
        let ds = survey();
        let drop = selectable_values(&ds, "Recherche", MissingPolicy::Drop).unwrap();
        assert_eq!(drop, vec![CellValue::from("Non"), CellValue::from("Oui")]);

        let cat = selectable_values(&ds, "Recherche", MissingPolicy::AsCategory).unwrap();
        assert_eq!(cat.first(), Some(&CellValue::Null));
        assert_eq!(cat.len(), 3);

        let no_nulls = selectable_values(&ds, "Filière", MissingPolicy::AsCategory).unwrap();
        assert!(!no_nulls.contains(&CellValue::Null));
    }

    fn arb_dataset() -> impl Strategy<Value = Dataset> {
        let cell = prop_oneof![
            Just(CellValue::Null),
            prop::sample::select(vec!["a", "b", "c"]).prop_map(CellValue::from),
        ];
        prop::collection::vec((cell.clone(), cell), 0..40).prop_map(|rows| {
            let records = rows
                .into_iter()
                .map(|(x, y)| {
                    let mut r = Record::new();
                    r.insert("X".into(), x);
                    r.insert("Y".into(), y);
                    r
                })
                .collect();
            Dataset::from_records(vec!["X".into(), "Y".into()], records)
        })
    }

    fn arb_allow_list() -> impl Strategy<Value = BTreeSet<CellValue>> {
        prop::collection::btree_set(
            prop_oneof![
                Just(CellValue::Null),
                prop::sample::select(vec!["a", "b", "c"]).prop_map(CellValue::from),
            ],
            0..3,
        )
    }

    fn arb_policy() -> impl Strategy<Value = MissingPolicy> {
        prop_oneof![Just(MissingPolicy::Drop), Just(MissingPolicy::AsCategory)]
    }

    proptest! {
        #[test]
        fn filtering_is_idempotent(
            ds in arb_dataset(),
            x in arb_allow_list(),
            y in arb_allow_list(),
            policy in arb_policy(),
        ) {
            let mut sel = FilterSelection::new();
            sel.insert("X".into(), x);
            sel.insert("Y".into(), y);
            let once = apply_filter(&ds, &sel, policy).unwrap();
            let twice = apply_filter(&once, &sel, policy).unwrap();
            prop_assert_eq!(once, twice);
        }

        #[test]
        fn singleton_allow_list_keeps_only_that_value(
            ds in arb_dataset(),
            v in prop::sample::select(vec!["a", "b", "c"]),
            policy in arb_policy(),
        ) {
            let mut sel = FilterSelection::new();
            sel.insert("X".into(), BTreeSet::from([CellValue::from(v)]));
            let filtered = apply_filter(&ds, &sel, policy).unwrap();
            prop_assert!(filtered.records.iter().all(|r| r["X"] == CellValue::from(v)));
            let expected = ds.records.iter().filter(|r| r["X"] == CellValue::from(v)).count();
            prop_assert_eq!(filtered.len(), expected);
        }

        #[test]
        fn empty_allow_list_equals_omitting_the_column(
            ds in arb_dataset(),
            y in arb_allow_list(),
            policy in arb_policy(),
        ) {
            let mut with_empty = FilterSelection::new();
            with_empty.insert("X".into(), BTreeSet::new());
            with_empty.insert("Y".into(), y.clone());
            let mut without = FilterSelection::new();
            without.insert("Y".into(), y);
            prop_assert_eq!(
                apply_filter(&ds, &with_empty, policy).unwrap(),
                apply_filter(&ds, &without, policy).unwrap()
            );
        }
    }
}
