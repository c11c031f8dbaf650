/// Data layer: the table model, its operations, and file I/O.
///
/// Architecture:
/// ```text
///   sample / loader ──► ┌───────┐ ──► filter / sort / select / head ──► Table
///  (.csv .json .pq)     │ Table │ ──► aggregate / group / value_counts ──► Series
///                       └───────┘ ──► describe / info
///                           │
///                           ▼
///                        writer   ──► .csv / .json / .parquet
/// ```
///
/// `Table::add_column` is the only operation that mutates a table in place.

pub mod aggregate;
pub mod batch;
pub mod describe;
pub mod error;
pub mod filter;
pub mod format;
pub mod loader;
pub mod model;
pub mod sample;
pub mod sort;
pub mod writer;

pub use aggregate::{Aggregator, GroupOrder, Series};
pub use error::{TableError, TableResult};
pub use filter::Comparator;
pub use format::FileFormat;
pub use model::{DType, Table, Value};
pub use sort::SortOrder;
