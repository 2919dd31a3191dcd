use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single answer in the response table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring what a spreadsheet column can hold.
/// Used as a `BTreeMap` / `BTreeSet` key downstream, so `==`, `Ord` and
/// `Hash` all follow the same total order.
#[derive(Debug, Clone)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// Missing answer.
    Null,
}

impl PartialEq for CellValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for CellValue {}

impl PartialOrd for CellValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CellValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use CellValue::*;
        fn rank(v: &CellValue) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => rank(self).cmp(&rank(other)),
        }
    }
}

impl std::hash::Hash for CellValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            CellValue::String(s) => s.hash(state),
            CellValue::Integer(i) => i.hash(state),
            CellValue::Float(f) => f.to_bits().hash(state),
            CellValue::Bool(b) => b.hash(state),
            CellValue::Null => {}
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Float cell with `-0.0` folded into `0.0`, so both spellings land in
    /// one category.
    pub fn float(v: f64) -> Self {
        CellValue::Float(if v == 0.0 { 0.0 } else { v })
    }

    /// Guess the type of a raw text cell (CSV, TSV).
    ///
    /// Blank → `Null`, `true`/`false` → `Bool`, then integer, float, and
    /// finally trimmed text.
    pub fn parse_text(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            if f.is_finite() {
                return CellValue::float(f);
            }
        }
        CellValue::String(s.to_string())
    }

    /// Label used on chart axes and filter widgets.
    pub fn label<'a>(&'a self, missing_label: &'a str) -> std::borrow::Cow<'a, str> {
        match self {
            CellValue::Null => std::borrow::Cow::Borrowed(missing_label),
            CellValue::String(s) => std::borrow::Cow::Borrowed(s.as_str()),
            other => std::borrow::Cow::Owned(other.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one questionnaire response
// ---------------------------------------------------------------------------

/// One respondent's answers: column_name → value.
pub type Record = BTreeMap<String, CellValue>;

// ---------------------------------------------------------------------------
// Dataset – the loaded (or filtered) response table
// ---------------------------------------------------------------------------

/// Response table with pre-computed column indices.
///
/// Every record carries exactly the columns in `column_names`; cells absent
/// from the source are stored as [`CellValue::Null`].
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// All responses, in file order.
    pub records: Vec<Record>,
    /// Column names in file order.
    pub column_names: Vec<String>,
    /// For each column the sorted set of unique non-null values.
    pub unique_values: BTreeMap<String, BTreeSet<CellValue>>,
    /// Columns holding at least one missing cell.
    pub columns_with_nulls: BTreeSet<String>,
}

impl Dataset {
    /// Build column indices, filling in `Null` for absent cells.
    pub fn from_records(column_names: Vec<String>, records: Vec<Record>) -> Self {
        let mut unique_values: BTreeMap<String, BTreeSet<CellValue>> = column_names
            .iter()
            .map(|c| (c.clone(), BTreeSet::new()))
            .collect();
        let mut columns_with_nulls = BTreeSet::new();

        let records: Vec<Record> = records
            .into_iter()
            .map(|mut rec| {
                rec.retain(|col, _| unique_values.contains_key(col));
                for col in &column_names {
                    let val = rec.entry(col.clone()).or_insert(CellValue::Null);
                    if val.is_null() {
                        columns_with_nulls.insert(col.clone());
                    } else if let Some(set) = unique_values.get_mut(col) {
                        set.insert(val.clone());
                    }
                }
                rec
            })
            .collect();

        Dataset {
            records,
            column_names,
            unique_values,
            columns_with_nulls,
        }
    }

    /// Number of responses.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.unique_values.contains_key(column)
    }

    /// Largest number in each column that holds any; ties share the value.
    pub fn numeric_maxima(&self) -> BTreeMap<String, CellValue> {
        let mut maxima: BTreeMap<String, (f64, CellValue)> = BTreeMap::new();
        for rec in &self.records {
            for (col, val) in rec {
                let x = match val {
                    CellValue::Integer(i) => *i as f64,
                    CellValue::Float(f) => *f,
                    _ => continue,
                };
                let best = maxima
                    .entry(col.clone())
                    .or_insert_with(|| (x, val.clone()));
                if x > best.0 {
                    *best = (x, val.clone());
                }
            }
        }
        maxima.into_iter().map(|(col, (_, val))| (col, val)).collect()
    }

    /// Value of `column` in row `row`, `Null` when either is out of range.
    pub fn cell(&self, row: usize, column: &str) -> &CellValue {
        static NULL: CellValue = CellValue::Null;
        self.records
            .get(row)
            .and_then(|r| r.get(column))
            .unwrap_or(&NULL)
    }
}
