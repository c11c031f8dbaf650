use std::fmt::Write as _;

use anyhow::{Context, Result};
use arrow::util::pretty::pretty_format_batches;

use crate::data::batch::to_record_batch;
use crate::data::describe::{ColumnInfo, NumericSummary};
use crate::data::{Series, Table, Value};

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Render a table as a boxed grid through Arrow's pretty printer.
pub fn render_table(table: &Table) -> Result<String> {
    let batch = to_record_batch(table)?;
    let rendered = pretty_format_batches(&[batch]).context("formatting table")?;
    Ok(rendered.to_string())
}

/// `describe()` output as a grid: one row per statistic, one column per
/// numeric column.
pub fn render_describe(summaries: &[NumericSummary]) -> Result<String> {
    let Some(first) = summaries.first() else {
        return Ok("(no numeric columns)".to_string());
    };
    let labels: Vec<Value> = first
        .stats()
        .iter()
        .map(|(label, _)| Value::from(*label))
        .collect();
    let mut columns = vec![("stat".to_string(), labels)];
    for s in summaries {
        let values: Vec<Value> = s
            .stats()
            .iter()
            .map(|&(_, v)| if v.is_nan() { Value::Null } else { Value::Float(v) })
            .collect();
        columns.push((s.column.clone(), values));
    }
    render_table(&Table::from_columns(columns)?)
}

/// Column overview in the style of a dataframe `info()` call.
pub fn render_info(table: &Table, info: &[ColumnInfo]) -> String {
    let width = info
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(0)
        .max("Column".len());

    let mut out = String::new();
    let _ = writeln!(out, "{} entries, {} columns", table.n_rows(), table.n_cols());
    let _ = writeln!(out, " #  {:<width$}  Non-Null  Dtype", "Column");
    for (i, c) in info.iter().enumerate() {
        let _ = writeln!(
            out,
            "{i:>2}  {:<width$}  {:<8}  {}",
            c.name, c.non_null, c.dtype
        );
    }
    out
}

// ---------------------------------------------------------------------------
// Series
// ---------------------------------------------------------------------------

/// Key column left-aligned, values right-aligned, name footer.
pub fn render_series(series: &Series) -> String {
    let keys: Vec<String> = series.keys().map(Value::to_string).collect();
    let values: Vec<String> = series.values().map(Value::to_string).collect();
    let kw = keys
        .iter()
        .map(|k| k.chars().count())
        .chain([series.index_name.chars().count()])
        .max()
        .unwrap_or(0);
    let vw = values.iter().map(|v| v.chars().count()).max().unwrap_or(0);

    let mut out = String::new();
    let _ = writeln!(out, "{}", series.index_name);
    for (k, v) in keys.iter().zip(&values) {
        let _ = writeln!(out, "{k:<kw$}  {v:>vw$}");
    }
    let _ = write!(out, "Name: {}", series.name);
    out
}

// ---------------------------------------------------------------------------
// Numbers
// ---------------------------------------------------------------------------

/// `20850.0` → `"R$ 20,850.00"`.
pub fn format_currency(amount: f64) -> String {
    format!("R$ {}", group_thousands(amount, 2))
}

/// Fixed decimals with `,` between thousands.
pub fn group_thousands(amount: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, amount.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount.is_sign_negative() && fixed.chars().any(|c| c != '0' && c != '.') {
        "-"
    } else {
        ""
    };
    match frac_part {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}
