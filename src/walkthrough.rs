use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::data::sample::{self, CATEGORY, PRICE, PRODUCT, QUANTITY, REVENUE, SELLER};
use crate::data::writer::{self, ExportReport};
use crate::data::{Aggregator, Comparator, FileFormat, GroupOrder, Series, SortOrder, Table, Value};
use crate::display::{format_currency, render_describe, render_info, render_series, render_table};

pub const DEFAULT_OUTPUT: &str = "vendas_analise.csv";

const RULE_WIDTH: usize = 70;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Knobs of the walkthrough. The binary always runs with the defaults.
#[derive(Debug, Clone)]
pub struct WalkthroughConfig {
    /// Where the final table is written (CSV).
    pub output_path: PathBuf,
    /// Rows with `Receita` strictly above this are "high revenue".
    pub revenue_threshold: Value,
    /// Rows shown by the `head` preview.
    pub preview_rows: usize,
    /// Re-read the exported file and check header and row count.
    pub verify_export: bool,
}

impl Default for WalkthroughConfig {
    fn default() -> Self {
        Self {
            output_path: PathBuf::from(DEFAULT_OUTPUT),
            revenue_threshold: Value::Integer(1000),
            preview_rows: 3,
            verify_export: true,
        }
    }
}

/// Everything the walkthrough computed, for callers that want the numbers
/// rather than the narration.
#[derive(Debug, Clone)]
pub struct WalkthroughSummary {
    /// The sales table with `Receita`, as exported.
    pub table: Table,
    pub high_revenue: Table,
    pub revenue_by_seller: Series,
    pub revenue_by_category: Series,
    pub total_revenue: Value,
    pub mean_revenue: Value,
    pub max_revenue: Value,
    pub min_revenue: Value,
    pub total_quantity: Value,
    pub by_quantity: Table,
    pub distinct_products: usize,
    pub distinct_sellers: usize,
    pub distinct_categories: usize,
    pub sales_per_seller: Series,
    /// `None` when verification is switched off.
    pub export: Option<ExportReport>,
}

const STEPS_DEMONSTRATED: [&str; 10] = [
    "Criar tabela a partir de colunas",
    "Explorar dados (shape, info, describe)",
    "Acessar primeiras linhas (head)",
    "Criar novas colunas com operações",
    "Filtrar dados com condições",
    "Agrupar dados (group by)",
    "Ordenar dados (sort)",
    "Cálculos estatísticos (sum, mean, max, min)",
    "Contar valores únicos (n_unique, value_counts)",
    "Exportar para arquivo (CSV)",
];

// ---------------------------------------------------------------------------
// Walkthrough
// ---------------------------------------------------------------------------

/// Run every step in order, narrating to `out`.
pub fn run<W: Write>(config: &WalkthroughConfig, out: &mut W) -> Result<WalkthroughSummary> {
    // 1. build
    section(out, "1. CRIANDO DADOS - Tabela com informações de vendas")?;
    let mut table = sample::sales().context("building the sales table")?;
    writeln!(out, "\nTabela criada com sucesso!")?;
    writeln!(out, "{}", render_table(&table)?)?;
    let (rows, cols) = table.shape();
    writeln!(out, "\nDimensões: {rows} linhas, {cols} colunas")?;
    log::info!("sales table built: {rows} × {cols}");

    // 2. explore
    section(out, "2. EXPLORANDO OS DADOS - Estrutura e tipos")?;
    writeln!(out, "\nInformações da tabela:")?;
    write!(out, "{}", render_info(&table, &table.info()))?;
    writeln!(out, "\nEstatísticas descritivas (colunas numéricas):")?;
    writeln!(out, "{}", render_describe(&table.describe()?)?)?;
    writeln!(out, "\nPrimeiras {} linhas:", config.preview_rows)?;
    writeln!(out, "{}", render_table(&table.head(config.preview_rows))?)?;

    // 3. derive
    section(out, "3. CRIANDO NOVA COLUNA - Calcular receita por linha")?;
    table
        .add_product_column(REVENUE, PRICE, QUANTITY)
        .context("deriving the revenue column")?;
    writeln!(out, "\nColuna '{REVENUE}' criada!")?;
    writeln!(
        out,
        "{}",
        render_table(&table.select(&[PRODUCT, PRICE, QUANTITY, REVENUE])?)?
    )?;

    // 4. filter
    let threshold = &config.revenue_threshold;
    section(
        out,
        &format!("4. FILTRANDO DADOS - Vendas com receita > {threshold}"),
    )?;
    let high_revenue = table.filter(REVENUE, Comparator::Gt, threshold)?;
    writeln!(out, "\nEncontrados {} registros:", high_revenue.n_rows())?;
    writeln!(
        out,
        "{}",
        render_table(&high_revenue.select(&[PRODUCT, QUANTITY, REVENUE])?)?
    )?;

    // 5. group
    section(out, "5. AGRUPANDO DADOS - Receita total por vendedor")?;
    let revenue_by_seller =
        table.group_aggregate(SELLER, REVENUE, Aggregator::Sum, GroupOrder::ValueDescending)?;
    writeln!(out, "\nReceita por vendedor (em ordem decrescente):")?;
    writeln!(out, "{}", render_series(&revenue_by_seller))?;
    let revenue_by_category =
        table.group_aggregate(CATEGORY, REVENUE, Aggregator::Sum, GroupOrder::KeyAscending)?;
    writeln!(out, "\nReceita por categoria:")?;
    writeln!(out, "{}", render_series(&revenue_by_category))?;

    // 6. statistics
    section(out, "6. ANÁLISES ESTATÍSTICAS")?;
    let total_revenue = table.aggregate(REVENUE, Aggregator::Sum)?;
    let mean_revenue = table.aggregate(REVENUE, Aggregator::Mean)?;
    let max_revenue = table.aggregate(REVENUE, Aggregator::Max)?;
    let min_revenue = table.aggregate(REVENUE, Aggregator::Min)?;
    let total_quantity = table.aggregate(QUANTITY, Aggregator::Sum)?;
    let sales_count = table.aggregate(REVENUE, Aggregator::Count)?;
    writeln!(out, "\nReceita total: {}", money(&total_revenue))?;
    writeln!(out, "Receita média por venda: {}", money(&mean_revenue))?;
    writeln!(out, "Maior receita: {}", money(&max_revenue))?;
    writeln!(out, "Menor receita: {}", money(&min_revenue))?;
    writeln!(out, "Quantidade total de produtos vendidos: {total_quantity}")?;
    writeln!(out, "Número de vendas: {sales_count}")?;

    // 7. sort
    section(out, "7. ORDENANDO DADOS - Produtos por quantidade (maior → menor)")?;
    let by_quantity = table.sort_by(QUANTITY, SortOrder::Descending)?;
    writeln!(
        out,
        "{}",
        render_table(&by_quantity.select(&[PRODUCT, QUANTITY, REVENUE])?)?
    )?;

    // 8. cardinality
    section(out, "8. ANÁLISE DE DIVERSIDADE")?;
    let distinct_products = table.n_unique(PRODUCT)?;
    let distinct_sellers = table.n_unique(SELLER)?;
    let distinct_categories = table.n_unique(CATEGORY)?;
    writeln!(out, "\nQuantidade de produtos diferentes: {distinct_products}")?;
    writeln!(out, "Quantidade de vendedores: {distinct_sellers}")?;
    writeln!(out, "Quantidade de categorias: {distinct_categories}")?;
    let sales_per_seller = table.value_counts(SELLER)?;
    writeln!(out, "\nVendedores e quantos produtos cada um vendeu:")?;
    writeln!(out, "{}", render_series(&sales_per_seller))?;

    // 9. export
    section(out, "9. SALVANDO DADOS - Exportar para arquivo CSV")?;
    let path = &config.output_path;
    writer::export(&table, path, FileFormat::Csv)?;
    let export = if config.verify_export {
        let report = writer::verify_export(&table, path, FileFormat::Csv)?;
        writeln!(
            out,
            "\nDados salvos em '{}' ({} linhas, {} colunas, {} bytes)",
            path.display(),
            report.rows,
            report.columns,
            report.bytes
        )?;
        Some(report)
    } else {
        writeln!(out, "\nDados salvos em '{}'", path.display())?;
        None
    };

    // 10. recap
    section(out, "RESUMO DAS OPERAÇÕES DEMONSTRADAS")?;
    writeln!(out)?;
    for step in STEPS_DEMONSTRATED {
        writeln!(out, "✓ {step}")?;
    }
    writeln!(out, "\n{}", "=".repeat(RULE_WIDTH))?;
    writeln!(out, "Análise completa!")?;
    writeln!(out, "{}", "=".repeat(RULE_WIDTH))?;

    Ok(WalkthroughSummary {
        table,
        high_revenue,
        revenue_by_seller,
        revenue_by_category,
        total_revenue,
        mean_revenue,
        max_revenue,
        min_revenue,
        total_quantity,
        by_quantity,
        distinct_products,
        distinct_sellers,
        distinct_categories,
        sales_per_seller,
        export,
    })
}

fn section<W: Write>(out: &mut W, title: &str) -> Result<()> {
    let rule = "=".repeat(RULE_WIDTH);
    writeln!(out, "\n{rule}\n{title}\n{rule}")?;
    Ok(())
}

fn money(value: &Value) -> String {
    value
        .as_f64()
        .map(format_currency)
        .unwrap_or_else(|| value.to_string())
}
