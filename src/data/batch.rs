use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Array, ArrayRef, AsArray, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{
    DataType, Field, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type, Int8Type, Schema,
    UInt16Type, UInt32Type, UInt8Type,
};
use arrow::record_batch::RecordBatch;
use arrow::util::display::array_value_to_string;

use super::model::{DType, Table, Value};

// ---------------------------------------------------------------------------
// Table → Arrow
// ---------------------------------------------------------------------------

/// Convert a table into a single Arrow record batch.
///
/// Column types follow [`DType`]: `int64` → Int64, `float64` → Float64,
/// everything else → Utf8. All fields are nullable.
pub fn to_record_batch(table: &Table) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(table.n_cols());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(table.n_cols());

    for name in table.column_names() {
        let dtype = table.dtype(name)?;
        let cells = table.column(name)?;
        let (data_type, array): (DataType, ArrayRef) = match dtype {
            DType::Int64 => (
                DataType::Int64,
                Arc::new(Int64Array::from_iter(cells.map(|v| match v {
                    Value::Integer(i) => Some(*i),
                    _ => None,
                }))),
            ),
            DType::Float64 => (
                DataType::Float64,
                Arc::new(Float64Array::from_iter(cells.map(Value::as_f64))),
            ),
            DType::Object | DType::Null => (
                DataType::Utf8,
                Arc::new(StringArray::from_iter(
                    cells.map(|v| (!v.is_null()).then(|| v.to_string())),
                )),
            ),
        };
        fields.push(Field::new(name, data_type, true));
        arrays.push(array);
    }

    let schema = Arc::new(Schema::new(fields));
    RecordBatch::try_new(schema, arrays).context("assembling record batch")
}

// ---------------------------------------------------------------------------
// Arrow → Table
// ---------------------------------------------------------------------------

/// Convert record batches sharing one schema back into a table.
pub fn from_record_batches(batches: &[RecordBatch]) -> Result<Table> {
    let Some(first) = batches.first() else {
        return Ok(Table::new(Vec::new(), Vec::new())?);
    };
    let columns: Vec<String> = first
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();

    let mut rows = Vec::new();
    for batch in batches {
        for row in 0..batch.num_rows() {
            let cells = batch
                .columns()
                .iter()
                .enumerate()
                .map(|(col, array)| {
                    extract_value(array, row)
                        .with_context(|| format!("row {row}, column '{}'", columns[col]))
                })
                .collect::<Result<Vec<_>>>()?;
            rows.push(cells);
        }
    }
    Ok(Table::new(columns, rows)?)
}

/// Read one cell of an Arrow column as a [`Value`].
fn extract_value(col: &ArrayRef, row: usize) -> Result<Value> {
    if col.is_null(row) {
        return Ok(Value::Null);
    }
    let value = match col.data_type() {
        DataType::Utf8 => Value::String(col.as_string::<i32>().value(row).to_string()),
        DataType::LargeUtf8 => Value::String(col.as_string::<i64>().value(row).to_string()),
        DataType::Int8 => Value::Integer(col.as_primitive::<Int8Type>().value(row).into()),
        DataType::Int16 => Value::Integer(col.as_primitive::<Int16Type>().value(row).into()),
        DataType::Int32 => Value::Integer(col.as_primitive::<Int32Type>().value(row).into()),
        DataType::Int64 => Value::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::UInt8 => Value::Integer(col.as_primitive::<UInt8Type>().value(row).into()),
        DataType::UInt16 => Value::Integer(col.as_primitive::<UInt16Type>().value(row).into()),
        DataType::UInt32 => Value::Integer(col.as_primitive::<UInt32Type>().value(row).into()),
        DataType::Float32 => Value::Float(col.as_primitive::<Float32Type>().value(row).into()),
        DataType::Float64 => Value::Float(col.as_primitive::<Float64Type>().value(row)),
        _ => Value::String(array_value_to_string(col, row).context("formatting Arrow value")?),
    };
    Ok(value)
}
