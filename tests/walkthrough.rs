use rusty_sales::data::sample::{PRICE, PRODUCT, QUANTITY, REVENUE, SELLER};
use rusty_sales::data::{loader, Value};
use rusty_sales::walkthrough::{self, WalkthroughConfig};

type TestResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

fn run_in(dir: &tempfile::TempDir) -> TestResult<(walkthrough::WalkthroughSummary, String)> {
    let config = WalkthroughConfig {
        output_path: dir.path().join("vendas_analise.csv"),
        ..WalkthroughConfig::default()
    };
    let mut out = Vec::new();
    let summary = walkthrough::run(&config, &mut out)?;
    Ok((summary, String::from_utf8(out)?))
}

#[test]
fn totals_match_the_sample() -> TestResult {
    let dir = tempfile::tempdir()?;
    let (summary, _) = run_in(&dir)?;

    assert_eq!(summary.table.shape(), (8, 6));
    assert_eq!(summary.total_revenue, Value::Integer(20_850));
    assert_eq!(summary.mean_revenue, Value::Float(2_606.25));
    assert_eq!(summary.max_revenue, Value::Integer(7_000));
    assert_eq!(summary.min_revenue, Value::Integer(600));
    assert_eq!(summary.total_quantity, Value::Integer(53));
    Ok(())
}

#[test]
fn revenue_above_threshold() -> TestResult {
    let dir = tempfile::tempdir()?;
    let (summary, _) = run_in(&dir)?;

    let products: Vec<_> = summary.high_revenue.column(PRODUCT)?.cloned().collect();
    let revenue: Vec<_> = summary.high_revenue.column(REVENUE)?.cloned().collect();
    let expected_products: Vec<Value> =
        ["Notebook", "Teclado", "Monitor", "Webcam", "Notebook", "Mouse"]
            .into_iter()
            .map(Value::from)
            .collect();
    let expected_revenue: Vec<Value> = [7000, 2000, 3600, 1750, 3500, 1600]
        .into_iter()
        .map(Value::from)
        .collect();
    assert_eq!(products, expected_products);
    assert_eq!(revenue, expected_revenue);
    Ok(())
}

#[test]
fn seller_totals_partition_revenue() -> TestResult {
    let dir = tempfile::tempdir()?;
    let (summary, _) = run_in(&dir)?;

    let by_seller = &summary.revenue_by_seller;
    let sellers: Vec<_> = by_seller.keys().cloned().collect();
    assert_eq!(
        sellers,
        vec![Value::from("Ana"), Value::from("Bruno"), Value::from("Carlos")]
    );
    assert_eq!(by_seller.get(&Value::from("Ana")), Some(&Value::Integer(12_500)));
    assert_eq!(by_seller.get(&Value::from("Bruno")), Some(&Value::Integer(4_200)));
    assert_eq!(by_seller.get(&Value::from("Carlos")), Some(&Value::Integer(4_150)));
    let sum: f64 = by_seller.values().filter_map(Value::as_f64).sum();
    assert_eq!(sum, 20_850.0);

    let by_category = &summary.revenue_by_category;
    assert_eq!(by_category.len(), 2);
    assert_eq!(by_category.get(&Value::from("Eletrônico")), Some(&Value::Integer(14_100)));
    assert_eq!(by_category.get(&Value::from("Periférico")), Some(&Value::Integer(6_750)));
    Ok(())
}

#[test]
fn quantity_sort_is_descending_and_idempotent() -> TestResult {
    let dir = tempfile::tempdir()?;
    let (summary, _) = run_in(&dir)?;

    let quantities: Vec<_> = summary.by_quantity.column(QUANTITY)?.cloned().collect();
    let expected: Vec<Value> = [20, 10, 8, 5, 4, 3, 2, 1].into_iter().map(Value::from).collect();
    assert_eq!(quantities, expected);

    let again = summary
        .by_quantity
        .sort_by(QUANTITY, rusty_sales::data::SortOrder::Descending)?;
    assert_eq!(again, summary.by_quantity);
    // the source table keeps construction order
    assert_eq!(summary.table.get(0, QUANTITY)?, Some(&Value::Integer(2)));
    Ok(())
}

#[test]
fn cardinality_and_frequency() -> TestResult {
    let dir = tempfile::tempdir()?;
    let (summary, _) = run_in(&dir)?;

    assert_eq!(summary.distinct_products, 6);
    assert_eq!(summary.distinct_sellers, 3);
    assert_eq!(summary.distinct_categories, 2);
    assert_eq!(
        summary.sales_per_seller.entries,
        vec![
            (Value::from("Ana"), Value::Integer(3)),
            (Value::from("Carlos"), Value::Integer(3)),
            (Value::from("Bruno"), Value::Integer(2)),
        ]
    );
    Ok(())
}

#[test]
fn exported_csv_round_trips() -> TestResult {
    let dir = tempfile::tempdir()?;
    let (summary, _) = run_in(&dir)?;
    let path = dir.path().join("vendas_analise.csv");

    let header = std::fs::read_to_string(&path)?
        .lines()
        .next()
        .map(str::to_string);
    assert_eq!(
        header.as_deref(),
        Some("Produto,Categoria,Preço,Quantidade,Vendedor,Receita")
    );

    let reloaded = loader::load_file(&path)?;
    assert_eq!(reloaded, summary.table);
    for row in 0..reloaded.n_rows() {
        let price = reloaded.get(row, PRICE)?.and_then(Value::as_f64);
        let qty = reloaded.get(row, QUANTITY)?.and_then(Value::as_f64);
        let revenue = reloaded.get(row, REVENUE)?.and_then(Value::as_f64);
        assert_eq!(revenue, price.zip(qty).map(|(p, q)| p * q));
    }

    let report = summary.export.expect("verification is on by default");
    assert_eq!((report.rows, report.columns), (8, 6));
    Ok(())
}

#[test]
fn narration_covers_every_step() -> TestResult {
    let dir = tempfile::tempdir()?;
    let (_, text) = run_in(&dir)?;

    assert!(text.contains("Dimensões: 8 linhas, 5 colunas"));
    assert!(text.contains("Encontrados 6 registros"));
    assert!(text.contains("Receita total: R$ 20,850.00"));
    assert!(text.contains("Receita média por venda: R$ 2,606.25"));
    assert!(text.contains("Quantidade de produtos diferentes: 6"));
    assert!(text.contains(SELLER));
    assert!(text.contains("Análise completa!"));
    Ok(())
}

#[test]
fn unwritable_output_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let config = WalkthroughConfig {
        output_path: dir.path().join("no-such-dir").join("out.csv"),
        ..WalkthroughConfig::default()
    };
    let mut out = Vec::new();
    let err = walkthrough::run(&config, &mut out).unwrap_err();
    assert!(format!("{err:#}").contains("out.csv"));
}
