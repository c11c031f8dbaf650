use thiserror::Error;

/// Errors raised by in-memory table operations.
///
/// File I/O goes through `anyhow` in [`loader`](super::loader) and
/// [`writer`](super::writer); this type covers construction and derivation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableError {
    #[error("column '{column}' has {found} values but the table has {expected} rows")]
    LengthMismatch {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("row {row} has {found} cells but the header has {expected} columns")]
    RowWidthMismatch {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("duplicate column name '{0}'")]
    DuplicateColumn(String),

    #[error("column names must not be empty")]
    EmptyColumnName,

    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    #[error("column '{column}', row {row}: '{value}' is not numeric")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },
}

pub type TableResult<T> = std::result::Result<T, TableError>;
