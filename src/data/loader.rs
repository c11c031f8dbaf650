use std::path::Path;

use anyhow::{Context, Result};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::batch::from_record_batches;
use super::format::FileFormat;
use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line
/// * `.json`    – `[{ "Produto": "Mouse", "Preço": 80, ... }, ...]`
/// * `.parquet` – any flat schema of string / integer / float columns
pub fn load_file(path: &Path) -> Result<Table> {
    load_with_format(path, FileFormat::from_path(path)?)
}

/// Load a table from a file in an explicit format.
pub fn load_with_format(path: &Path, format: FileFormat) -> Result<Table> {
    let table = match format {
        FileFormat::Csv => load_csv(path),
        FileFormat::Json => load_json(path),
        FileFormat::Parquet => load_parquet(path),
    }
    .with_context(|| format!("loading {format} file {}", path.display()))?;

    log::info!(
        "loaded {} rows × {} columns from {}",
        table.n_rows(),
        table.n_cols(),
        path.display()
    );
    Ok(table)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Column types are inferred per column: all integers → `int64`, all
/// numbers → `float64`, anything else keeps every cell as text. Empty
/// cells, and `NaN` in a numeric column, are nulls.
fn load_csv(path: &Path) -> Result<Table> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut raw: Vec<csv::StringRecord> = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        raw.push(result.with_context(|| format!("CSV row {row_no}"))?);
    }

    let columns = headers.into_iter().enumerate().map(|(col, name)| {
        let cells: Vec<&str> = raw.iter().map(|r| r.get(col).unwrap_or("")).collect();
        (name, infer_column(&cells))
    });
    Ok(Table::from_columns(columns)?)
}

fn infer_column(cells: &[&str]) -> Vec<Value> {
    let present = || cells.iter().filter(|s| !s.is_empty());

    if present().all(|s| s.parse::<i64>().is_ok()) {
        return cells
            .iter()
            .map(|s| s.parse::<i64>().map_or(Value::Null, Value::Integer))
            .collect();
    }
    if present().all(|s| s.parse::<f64>().is_ok()) {
        return cells
            .iter()
            .map(|s| match s.parse::<f64>() {
                Ok(f) if !f.is_nan() => Value::Float(f),
                _ => Value::Null,
            })
            .collect();
    }
    cells
        .iter()
        .map(|s| {
            if s.is_empty() {
                Value::Null
            } else {
                Value::String(s.to_string())
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Records-oriented JSON. Columns appear in the order their keys are first
/// seen; a record missing a key gets a null in that column.
fn load_json(path: &Path) -> Result<Table> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let mut columns: Vec<String> = Vec::new();
    let mut objects = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec
            .as_object()
            .with_context(|| format!("Row {i} is not a JSON object"))?;
        for key in obj.keys() {
            if !columns.contains(key) {
                columns.push(key.clone());
            }
        }
        objects.push(obj);
    }

    let rows = objects
        .iter()
        .map(|obj| {
            columns
                .iter()
                .map(|c| obj.get(c).map_or(Value::Null, json_to_value))
                .collect()
        })
        .collect();
    Ok(Table::new(columns, rows)?)
}

fn json_to_value(val: &JsonValue) -> Value {
    match val {
        JsonValue::String(s) => Value::String(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Value::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Value::Float(f)
            } else {
                Value::String(n.to_string())
            }
        }
        JsonValue::Null => Value::Null,
        other => Value::String(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

fn load_parquet(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let batches = reader
        .collect::<std::result::Result<Vec<_>, _>>()
        .context("reading parquet record batch")?;
    from_record_batches(&batches)
}
