use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};

use super::model::Dataset;

/// Write `dataset` as CSV: header in column order, missing cells empty.
pub fn write_csv<W: Write>(dataset: &Dataset, writer: W) -> Result<()> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&dataset.column_names)
        .context("writing CSV header")?;

    for (row_no, rec) in dataset.records.iter().enumerate() {
        let fields = dataset
            .column_names
            .iter()
            .map(|col| rec.get(col).map(|v| v.to_string()).unwrap_or_default());
        out.write_record(fields)
            .with_context(|| format!("writing CSV row {row_no}"))?;
    }

    out.flush().context("flushing CSV output")?;
    Ok(())
}

/// Export `dataset` to a CSV file at `path`, replacing any existing file.
pub fn export_csv(dataset: &Dataset, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating {}", path.display()))?;
    write_csv(dataset, std::io::BufWriter::new(file))
        .with_context(|| format!("exporting to {}", path.display()))?;
    log::info!("Exported {} responses to {}", dataset.len(), path.display());
    Ok(())
}
