use std::path::PathBuf;

use anyhow::{Context, Result};
use rusty_sales::data::{sample, writer, FileFormat};

/// Write the sample sales table (with `Receita`) as CSV, JSON and Parquet.
///
/// Usage: `generate_sample [OUTPUT_DIR]` (defaults to the current directory).
fn main() -> Result<()> {
    env_logger::init();

    let out_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let table = sample::sales_with_revenue()?;

    for format in [FileFormat::Csv, FileFormat::Json, FileFormat::Parquet] {
        let path = out_dir.join(format!("vendas.{}", format.extension()));
        writer::export(&table, &path, format)?;
        let report = writer::verify_export(&table, &path, format)?;
        println!(
            "Wrote {} rows ({} columns, {} bytes) to {}",
            report.rows,
            report.columns,
            report.bytes,
            path.display()
        );
    }
    Ok(())
}
