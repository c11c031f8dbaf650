use super::error::TableResult;
use super::model::{Table, Value};

pub const PRODUCT: &str = "Produto";
pub const CATEGORY: &str = "Categoria";
pub const PRICE: &str = "Preço";
pub const QUANTITY: &str = "Quantidade";
pub const SELLER: &str = "Vendedor";
pub const REVENUE: &str = "Receita";

/// The store's sales: eight rows of product, category, unit price,
/// quantity and seller.
pub fn sales() -> TableResult<Table> {
    let text = |vals: &[&str]| vals.iter().map(|&s| Value::from(s)).collect::<Vec<_>>();
    let ints = |vals: &[i64]| vals.iter().map(|&v| Value::from(v)).collect::<Vec<_>>();

    Table::from_columns([
        (
            PRODUCT,
            text(&[
                "Notebook", "Mouse", "Teclado", "Monitor", "Webcam", "Fone", "Notebook", "Mouse",
            ]),
        ),
        (
            CATEGORY,
            text(&[
                "Eletrônico",
                "Periférico",
                "Periférico",
                "Eletrônico",
                "Periférico",
                "Periférico",
                "Eletrônico",
                "Periférico",
            ]),
        ),
        (PRICE, ints(&[3500, 80, 250, 1200, 350, 150, 3500, 80])),
        (QUANTITY, ints(&[2, 10, 8, 3, 5, 4, 1, 20])),
        (
            SELLER,
            text(&[
                "Ana", "Carlos", "Ana", "Bruno", "Carlos", "Bruno", "Ana", "Carlos",
            ]),
        ),
    ])
}

/// [`sales`] with the derived `Receita = Preço × Quantidade` column.
pub fn sales_with_revenue() -> TableResult<Table> {
    let mut table = sales()?;
    table.add_product_column(REVENUE, PRICE, QUANTITY)?;
    Ok(table)
}
