use std::cmp::Ordering;
use std::fmt;

use super::error::TableResult;
use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Comparator: how a cell is tested against the threshold
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl Comparator {
    /// Whether `cell <op> threshold` holds.
    ///
    /// Null cells and cells that cannot be compared with the threshold
    /// (text against a number) never pass, not even for `Ne`.
    pub fn holds(self, cell: &Value, threshold: &Value) -> bool {
        let Some(ord) = cell.compare(threshold) else {
            return false;
        };
        match self {
            Comparator::Gt => ord == Ordering::Greater,
            Comparator::Ge => ord != Ordering::Less,
            Comparator::Lt => ord == Ordering::Less,
            Comparator::Le => ord != Ordering::Greater,
            Comparator::Eq => ord == Ordering::Equal,
            Comparator::Ne => ord != Ordering::Equal,
        }
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self {
            Comparator::Gt => ">",
            Comparator::Ge => ">=",
            Comparator::Lt => "<",
            Comparator::Le => "<=",
            Comparator::Eq => "==",
            Comparator::Ne => "!=",
        };
        f.write_str(op)
    }
}

/// Return indices of rows whose `column` cell satisfies the predicate.
pub fn filtered_indices(
    table: &Table,
    column: &str,
    op: Comparator,
    threshold: &Value,
) -> TableResult<Vec<usize>> {
    Ok(table
        .column(column)?
        .enumerate()
        .filter(|(_, cell)| op.holds(cell, threshold))
        .map(|(i, _)| i)
        .collect())
}

impl Table {
    /// Rows where `column <op> threshold`, in their original order.
    pub fn filter(&self, column: &str, op: Comparator, threshold: &Value) -> TableResult<Table> {
        let indices = filtered_indices(self, column, op, threshold)?;
        log::debug!(
            "filter {column} {op} {threshold}: {} of {} rows kept",
            indices.len(),
            self.n_rows()
        );
        Ok(self.take_rows(&indices))
    }
}
