use rusty_sales::data::sample::{self, REVENUE};
use rusty_sales::data::{loader, writer, FileFormat, Value};

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn round_trip(format: FileFormat) -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join(format!("vendas.{}", format.extension()));
    let table = sample::sales_with_revenue()?;

    writer::export(&table, &path, format)?;
    let report = writer::verify_export(&table, &path, format)?;
    assert_eq!(report.rows, table.n_rows());
    assert!(report.bytes > 0);

    let reloaded = loader::load_file(&path)?;
    assert_eq!(reloaded, table);
    Ok(())
}

#[test]
fn csv_round_trip() -> TestResult {
    round_trip(FileFormat::Csv)
}

#[test]
fn json_round_trip() -> TestResult {
    round_trip(FileFormat::Json)
}

#[test]
fn parquet_round_trip() -> TestResult {
    round_trip(FileFormat::Parquet)
}

#[test]
fn float_columns_stay_float_through_csv() -> TestResult {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("half.csv");
    let mut table = sample::sales()?;
    table.add_column("Desconto", &[sample::PRICE], |args, _| {
        Ok(args[0].checked_mul(&Value::Float(0.5)).unwrap_or(Value::Null))
    })?;

    writer::export(&table, &path, FileFormat::Csv)?;
    let reloaded = loader::load_file(&path)?;
    assert_eq!(reloaded.get(0, "Desconto")?, Some(&Value::Float(1750.0)));
    assert_eq!(reloaded.dtype("Desconto")?, table.dtype("Desconto")?);
    assert!(reloaded.column_names().iter().all(|c| c != REVENUE));
    Ok(())
}
