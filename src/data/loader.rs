use std::collections::BTreeSet;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{
    DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type,
};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{CellValue, Dataset, Record};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a response table from a file and check that `required_columns`
/// are all present. Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – comma-separated, header row with column names
/// * `.tsv`     – tab-separated, header row with column names
/// * `.json`    – `[{ "Filière": "...", "Niveau d'études": "...", ... }, ...]`
/// * `.parquet` – one column per question (recommended for large surveys)
///
/// Spreadsheets must be exported to one of these first.
pub fn load_file(path: &Path, required_columns: &[String]) -> Result<Dataset, LoadError> {
    if !path.exists() {
        return Err(LoadError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_delimited(path, b',')?,
        "tsv" | "tab" => load_delimited(path, b'\t')?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => {
            return Err(LoadError::malformed(
                path,
                format!("unsupported file extension: .{other}"),
            ))
        }
    };

    check_required_columns(path, &dataset, required_columns)?;
    Ok(dataset)
}

fn check_required_columns(
    path: &Path,
    dataset: &Dataset,
    required_columns: &[String],
) -> Result<(), LoadError> {
    match required_columns.iter().find(|c| !dataset.has_column(c)) {
        Some(column) => Err(LoadError::MissingColumn {
            column: column.clone(),
            path: path.to_path_buf(),
        }),
        None => Ok(()),
    }
}

/// Reject duplicate header names; a record map could only keep one of them.
fn unique_headers(path: &Path, headers: Vec<String>) -> Result<Vec<String>, LoadError> {
    let mut seen = BTreeSet::new();
    for h in &headers {
        if !seen.insert(h.as_str()) {
            return Err(LoadError::malformed(path, format!("duplicate column '{h}'")));
        }
    }
    Ok(headers)
}

// ---------------------------------------------------------------------------
// CSV / TSV loader
// ---------------------------------------------------------------------------

/// Header row with column names, one response per line. Every row must have
/// as many fields as the header.
///
/// Cell types are guessed per column: a column is numeric or boolean only
/// when every non-blank cell parses as one.
fn load_delimited(path: &Path, delimiter: u8) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::io(path, e))?;
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .from_reader(file);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| LoadError::malformed(path, format!("reading header: {e}")))?
        .iter()
        .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
        .collect();
    let headers = unique_headers(path, headers)?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        rows.push(result.map_err(|e| LoadError::malformed(path, format!("row {row_no}: {e}")))?);
    }

    // A column holding any free text is read as text throughout, so "true"
    // or "01" among text answers survive an export/load cycle unchanged.
    let text_columns: Vec<bool> = (0..headers.len())
        .map(|i| {
            rows.iter().any(|row| {
                matches!(CellValue::parse_text(&row[i]), CellValue::String(_))
            })
        })
        .collect();

    let records: Vec<Record> = rows
        .iter()
        .map(|row| {
            headers
                .iter()
                .zip(row.iter())
                .zip(&text_columns)
                .map(|((col, value), &is_text)| {
                    let cell = if is_text {
                        text_cell(value)
                    } else {
                        CellValue::parse_text(value)
                    };
                    (col.clone(), cell)
                })
                .collect()
        })
        .collect();

    log::debug!("{}: {} rows, {} columns", path.display(), records.len(), headers.len());
    Ok(Dataset::from_records(headers, records))
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Filière": "Ingénierie", "Niveau d'études": "Master", "Recherche d'emploi": "Oui" },
///   ...
/// ]
/// ```
///
/// Columns are added as they are first seen; keys missing from a row load
/// as missing values.
fn load_json(path: &Path) -> Result<Dataset, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|e| LoadError::io(path, e))?;
    let root: JsonValue = serde_json::from_str(&text)
        .map_err(|e| LoadError::malformed(path, format!("parsing JSON: {e}")))?;

    let rows = root
        .as_array()
        .ok_or_else(|| LoadError::malformed(path, "expected top-level JSON array"))?;

    let mut column_names: Vec<String> = Vec::new();
    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut records = Vec::with_capacity(rows.len());

    for (i, row) in rows.iter().enumerate() {
        let obj = row
            .as_object()
            .ok_or_else(|| LoadError::malformed(path, format!("row {i} is not a JSON object")))?;

        let mut record = Record::new();
        for (key, val) in obj {
            if seen.insert(key.clone()) {
                column_names.push(key.clone());
            }
            record.insert(key.clone(), json_to_cell(val));
        }
        records.push(record);
    }

    Ok(Dataset::from_records(column_names, records))
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => text_cell(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::float(f)
            } else {
                CellValue::String(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::String(other.to_string()),
    }
}

/// Quoted text stays text, even when it looks numeric; blanks are missing.
fn text_cell(s: &str) -> CellValue {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        CellValue::Null
    } else {
        CellValue::String(trimmed.to_string())
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file, one column per question.
///
/// Strings, integers, floats and booleans map to the matching
/// [`CellValue`]; anything else (dictionary-encoded categoricals, dates) is
/// rendered to text. Works with files written by both **Pandas**
/// (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset, LoadError> {
    let file = std::fs::File::open(path).map_err(|e| LoadError::io(path, e))?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .map_err(|e| LoadError::malformed(path, format!("reading parquet metadata: {e}")))?;

    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    let column_names = unique_headers(path, column_names)?;

    let reader = builder
        .build()
        .map_err(|e| LoadError::malformed(path, format!("building parquet reader: {e}")))?;

    let mut records = Vec::new();

    for batch_result in reader {
        let batch = batch_result
            .map_err(|e| LoadError::malformed(path, format!("reading record batch: {e}")))?;

        let mut batch_records = vec![Record::new(); batch.num_rows()];
        for (col_idx, col_name) in column_names.iter().enumerate() {
            let col = batch.column(col_idx);
            for (row, record) in batch_records.iter_mut().enumerate() {
                let value = extract_cell(col, row)
                    .map_err(|e| LoadError::malformed(path, format!("column '{col_name}': {e}")))?;
                record.insert(col_name.clone(), value);
            }
        }
        records.extend(batch_records);
    }

    Ok(Dataset::from_records(column_names, records))
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &Arc<dyn Array>, row: usize) -> Result<CellValue, arrow::error::ArrowError> {
    if col.is_null(row) {
        return Ok(CellValue::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => text_cell(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => text_cell(col.as_string::<i64>().value(row)),
        DataType::Int8 => CellValue::Integer(col.as_primitive::<Int8Type>().value(row) as i64),
        DataType::Int16 => CellValue::Integer(col.as_primitive::<Int16Type>().value(row) as i64),
        DataType::Int32 => CellValue::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => CellValue::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => float_cell(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => float_cell(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => CellValue::Bool(col.as_boolean().value(row)),
        _ => {
            let formatter = ArrayFormatter::try_new(col.as_ref(), &FormatOptions::default())?;
            CellValue::String(formatter.value(row).to_string())
        }
    };
    Ok(value)
}

/// Pandas writes missing numeric answers as NaN rather than null.
fn float_cell(v: f64) -> CellValue {
    if v.is_nan() {
        CellValue::Null
    } else {
        CellValue::float(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use arrow::array::{Float64Array, StringArray};
    use arrow::datatypes::{Field, Schema};
    use arrow::record_batch::RecordBatch;
    use parquet::arrow::ArrowWriter;
    use tempfile::{Builder, NamedTempFile};

    fn temp_file(suffix: &str, content: &str) -> NamedTempFile {
        let mut file = Builder::new().suffix(suffix).tempfile().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    fn required(cols: &[&str]) -> Vec<String> {
        cols.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn loads_csv_with_typed_cells() {
        let file = temp_file(".csv", "A,B,Age\nX,p,21\nY,,30\n");
        let ds = load_file(file.path(), &required(&["A", "B"])).unwrap();

        assert_eq!(ds.column_names, vec!["A", "B", "Age"]);
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.cell(0, "Age"), &CellValue::Integer(21));
        assert_eq!(ds.cell(1, "B"), &CellValue::Null);
    }

    #[test]
    fn text_columns_keep_values_that_look_typed() {
        let file = temp_file(".csv", "Code,Réponse,Age\nA1,true,21\n01,Oui,30\n");
        let ds = load_file(file.path(), &[]).unwrap();

        assert_eq!(ds.cell(1, "Code"), &CellValue::from("01"));
        assert_eq!(ds.cell(0, "Réponse"), &CellValue::from("true"));
        assert_eq!(ds.cell(1, "Age"), &CellValue::Integer(30));
    }

    #[test]
    fn loads_tsv() {
        let file = temp_file(".tsv", "A\tB\nX\tp q\n");
        let ds = load_file(file.path(), &[]).unwrap();
        assert_eq!(ds.cell(0, "B"), &CellValue::from("p q"));
    }

    #[test]
    fn strips_utf8_bom_from_first_header() {
        let file = temp_file(".csv", "\u{feff}Filière,B\nIngé,p\n");
        let ds = load_file(file.path(), &required(&["Filière"])).unwrap();
        assert_eq!(ds.column_names[0], "Filière");
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let file = temp_file(".csv", "A,B\nX,p\n");
        let err = load_file(file.path(), &required(&["A", "C"])).unwrap_err();
        match err {
            LoadError::MissingColumn { column, .. } => assert_eq!(column, "C"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn nonexistent_file_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_file(&dir.path().join("nope.csv"), &[]).unwrap_err();
        assert!(matches!(err, LoadError::FileNotFound { .. }));
    }

    #[test]
    fn ragged_csv_is_malformed() {
        let file = temp_file(".csv", "A,B\nX,p,extra\n");
        let err = load_file(file.path(), &[]).unwrap_err();
        assert!(matches!(err, LoadError::MalformedFormat { .. }));
    }

    #[test]
    fn duplicate_header_is_malformed() {
        let file = temp_file(".csv", "A,A\nX,p\n");
        let err = load_file(file.path(), &[]).unwrap_err();
        assert!(matches!(err, LoadError::MalformedFormat { .. }));
    }

    #[test]
    fn unsupported_extension_is_malformed() {
        let file = temp_file(".xlsx", "not really a workbook");
        let err = load_file(file.path(), &[]).unwrap_err();
        assert!(matches!(err, LoadError::MalformedFormat { .. }));
    }

    #[test]
    fn loads_json_records_keeping_quoted_numbers_as_text() {
        let file = temp_file(
            ".json",
            r#"[{"A": "X", "Code": "01", "N": 3}, {"A": "Y", "Extra": true}]"#,
        );
        let ds = load_file(file.path(), &required(&["A"])).unwrap();

        assert_eq!(ds.column_names, vec!["A", "Code", "N", "Extra"]);
        assert_eq!(ds.cell(0, "Code"), &CellValue::from("01"));
        assert_eq!(ds.cell(0, "N"), &CellValue::Integer(3));
        assert_eq!(ds.cell(1, "Code"), &CellValue::Null);
        assert_eq!(ds.cell(1, "Extra"), &CellValue::Bool(true));
    }

    #[test]
    fn negative_zero_groups_with_zero() {
        let file = temp_file(".json", r#"[{"Score": 0.0}, {"Score": -0.0}]"#);
        let ds = load_file(file.path(), &[]).unwrap();
        assert_eq!(ds.unique_values["Score"].len(), 1);

        let file = temp_file(".csv", "Score\n0.0\n-0.0\n");
        let ds = load_file(file.path(), &[]).unwrap();
        assert_eq!(ds.unique_values["Score"].len(), 1);
    }

    #[test]
    fn json_row_that_is_not_an_object_is_malformed() {
        let file = temp_file(".json", r#"[{"A": "X"}, 3]"#);
        let err = load_file(file.path(), &[]).unwrap_err();
        assert!(matches!(err, LoadError::MalformedFormat { .. }));
    }

    #[test]
    fn loads_parquet_with_nulls_and_nan() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("A", DataType::Utf8, true),
            Field::new("Score", DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("X"), None])),
                Arc::new(Float64Array::from(vec![Some(f64::NAN), Some(2.5)])),
            ],
        )
        .unwrap();

        let file = Builder::new().suffix(".parquet").tempfile().unwrap();
        let out = std::fs::File::create(file.path()).unwrap();
        let mut writer = ArrowWriter::try_new(out, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let ds = load_file(file.path(), &required(&["A", "Score"])).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.cell(0, "A"), &CellValue::from("X"));
        assert_eq!(ds.cell(1, "A"), &CellValue::Null);
        assert_eq!(ds.cell(0, "Score"), &CellValue::Null);
        assert_eq!(ds.cell(1, "Score"), &CellValue::Float(2.5));
    }
}
