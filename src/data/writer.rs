use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use parquet::arrow::ArrowWriter;
use serde_json::{Map, Value as JsonValue};

use super::batch::to_record_batch;
use super::format::FileFormat;
use super::loader::load_with_format;
use super::model::{Table, Value};

/// What [`verify_export`] found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub rows: usize,
    pub columns: usize,
    pub bytes: u64,
}

/// Write `table` to `path`, replacing any existing file.
///
/// Rows are written in the table's current order with a header and no index
/// column. Numbers use a locale-independent decimal form.
pub fn export(table: &Table, path: &Path, format: FileFormat) -> Result<()> {
    match format {
        FileFormat::Csv => write_csv(table, path),
        FileFormat::Json => write_json(table, path),
        FileFormat::Parquet => write_parquet(table, path),
    }
    .with_context(|| format!("writing {format} file {}", path.display()))?;

    log::info!(
        "wrote {} rows × {} columns to {}",
        table.n_rows(),
        table.n_cols(),
        path.display()
    );
    Ok(())
}

/// Re-read an exported file and check that it holds the same header and
/// the same number of rows as `table`.
pub fn verify_export(table: &Table, path: &Path, format: FileFormat) -> Result<ExportReport> {
    let reloaded = load_with_format(path, format)?;
    if reloaded.column_names() != table.column_names() {
        bail!(
            "{} has columns {:?}, expected {:?}",
            path.display(),
            reloaded.column_names(),
            table.column_names()
        );
    }
    if reloaded.n_rows() != table.n_rows() {
        bail!(
            "{} has {} rows, expected {}",
            path.display(),
            reloaded.n_rows(),
            table.n_rows()
        );
    }
    let bytes = std::fs::metadata(path)
        .with_context(|| format!("stat {}", path.display()))?
        .len();
    Ok(ExportReport {
        rows: reloaded.n_rows(),
        columns: reloaded.n_cols(),
        bytes,
    })
}

// ---------------------------------------------------------------------------
// CSV
// ---------------------------------------------------------------------------

fn write_csv(table: &Table, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer
        .write_record(table.column_names())
        .context("writing CSV header")?;
    for (i, row) in table.rows().iter().enumerate() {
        writer
            .write_record(row.iter().map(csv_field))
            .with_context(|| format!("writing CSV row {i}"))?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

/// Nulls become empty fields; floats keep a decimal point so they reload
/// as floats.
fn csv_field(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// JSON
// ---------------------------------------------------------------------------

fn write_json(table: &Table, path: &Path) -> Result<()> {
    let records = table
        .rows()
        .iter()
        .map(|row| {
            table
                .column_names()
                .iter()
                .zip(row)
                .map(|(name, cell)| {
                    Ok::<_, anyhow::Error>((name.clone(), serde_json::to_value(cell)?))
                })
                .collect::<Result<Map<String, JsonValue>>>()
                .map(JsonValue::Object)
        })
        .collect::<Result<Vec<_>>>()?;

    let file = File::create(path).context("creating JSON file")?;
    let mut out = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut out, &records).context("serializing JSON")?;
    out.flush().context("flushing JSON file")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Parquet
// ---------------------------------------------------------------------------

fn write_parquet(table: &Table, path: &Path) -> Result<()> {
    let batch = to_record_batch(table)?;
    let file = File::create(path).context("creating parquet file")?;
    let mut writer =
        ArrowWriter::try_new(file, batch.schema(), None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}
