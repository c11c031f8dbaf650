//! Step-by-step walkthrough of tabular data operations over a small sales
//! table: build, describe, derive a column, filter, group, sort, count and
//! export.
//!
//! ```no_run
//! use rusty_sales::data::{sample, Aggregator, Comparator, Value};
//!
//! let table = sample::sales_with_revenue()?;
//! let high = table.filter(sample::REVENUE, Comparator::Gt, &Value::from(1000))?;
//! let total = table.aggregate(sample::REVENUE, Aggregator::Sum)?;
//! println!("{} high-revenue rows, total {total}", high.n_rows());
//! # Ok::<(), rusty_sales::data::TableError>(())
//! ```

pub mod data;
pub mod display;
pub mod walkthrough;
