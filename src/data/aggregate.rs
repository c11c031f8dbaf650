use std::collections::{HashMap, HashSet};

use super::error::{TableError, TableResult};
use super::model::{Table, Value};

// ---------------------------------------------------------------------------
// Aggregators
// ---------------------------------------------------------------------------

/// Reduction applied to the non-null cells of a column (or of one group).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Aggregator {
    #[default]
    Sum,
    Mean,
    Min,
    Max,
    Count,
}

/// Ordering of the entries of a grouped result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupOrder {
    /// Keys in ascending order (the usual group-by order).
    #[default]
    KeyAscending,
    /// Keys in the order they first appear in the table.
    FirstSeen,
    /// Largest aggregate first; ties keep ascending key order.
    ValueDescending,
}

// ---------------------------------------------------------------------------
// Series – keyed one-dimensional result
// ---------------------------------------------------------------------------

/// Ordered `key → value` pairs, e.g. revenue per seller.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    /// Name of the column the keys come from.
    pub index_name: String,
    /// Name of the aggregated values.
    pub name: String,
    pub entries: Vec<(Value, Value)>,
}

impl Series {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Value stored under `key`.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }
}

/// Reduce `(row, cell)` pairs of `column` with `agg`. Nulls are skipped.
fn reduce<'a>(
    column: &str,
    cells: impl Iterator<Item = (usize, &'a Value)>,
    agg: Aggregator,
) -> TableResult<Value> {
    let non_numeric = |row: usize, v: &Value| TableError::NonNumeric {
        column: column.to_string(),
        row,
        value: v.to_string(),
    };
    let mut cells = cells.filter(|(_, v)| !v.is_null());

    match agg {
        Aggregator::Count => Ok(Value::Integer(cells.count() as i64)),
        Aggregator::Min => Ok(cells.map(|(_, v)| v).min().cloned().unwrap_or(Value::Null)),
        Aggregator::Max => Ok(cells.map(|(_, v)| v).max().cloned().unwrap_or(Value::Null)),
        Aggregator::Sum => cells.try_fold(Value::Integer(0), |acc, (row, v)| {
            match (&acc, v) {
                (Value::Integer(a), Value::Integer(b)) => Ok(a
                    .checked_add(*b)
                    .map(Value::Integer)
                    .unwrap_or(Value::Float(*a as f64 + *b as f64))),
                (_, Value::Integer(_) | Value::Float(_)) => {
                    let a = acc.as_f64().unwrap_or_default();
                    let b = v.as_f64().unwrap_or_default();
                    Ok(Value::Float(a + b))
                }
                _ => Err(non_numeric(row, v)),
            }
        }),
        Aggregator::Mean => {
            let (mut sum, mut n) = (0.0, 0usize);
            for (row, v) in cells {
                sum += v.as_f64().ok_or_else(|| non_numeric(row, v))?;
                n += 1;
            }
            Ok(if n == 0 {
                Value::Null
            } else {
                Value::Float(sum / n as f64)
            })
        }
    }
}

impl Table {
    /// Reduce a whole column to a single value.
    pub fn aggregate(&self, column: &str, agg: Aggregator) -> TableResult<Value> {
        reduce(column, self.column(column)?.enumerate(), agg)
    }

    /// Aggregate `value_column` within each distinct non-null key of
    /// `group_column`.
    pub fn group_aggregate(
        &self,
        group_column: &str,
        value_column: &str,
        agg: Aggregator,
        order: GroupOrder,
    ) -> TableResult<Series> {
        let keys: Vec<&Value> = self.column(group_column)?.collect();
        let values: Vec<&Value> = self.column(value_column)?.collect();

        let mut groups: Vec<(Value, Vec<usize>)> = Vec::new();
        let mut slot: HashMap<&Value, usize> = HashMap::new();
        for (row, key) in keys.iter().enumerate() {
            if key.is_null() {
                continue;
            }
            let idx = *slot.entry(*key).or_insert_with(|| {
                groups.push(((*key).clone(), Vec::new()));
                groups.len() - 1
            });
            groups[idx].1.push(row);
        }

        let mut entries = groups
            .into_iter()
            .map(|(key, rows)| {
                let cells = rows.iter().map(|&r| (r, values[r]));
                Ok((key, reduce(value_column, cells, agg)?))
            })
            .collect::<TableResult<Vec<_>>>()?;

        match order {
            GroupOrder::FirstSeen => {}
            GroupOrder::KeyAscending => entries.sort_by(|a, b| a.0.cmp(&b.0)),
            GroupOrder::ValueDescending => {
                entries.sort_by(|a, b| a.0.cmp(&b.0));
                entries.sort_by(|a, b| b.1.cmp(&a.1));
            }
        }

        log::debug!(
            "group {value_column} by {group_column} ({agg:?}): {} groups",
            entries.len()
        );
        Ok(Series {
            index_name: group_column.to_string(),
            name: value_column.to_string(),
            entries,
        })
    }

    /// Number of distinct non-null values in `column`.
    pub fn n_unique(&self, column: &str) -> TableResult<usize> {
        Ok(self
            .column(column)?
            .filter(|v| !v.is_null())
            .collect::<HashSet<_>>()
            .len())
    }

    /// Occurrences of each distinct non-null value, most frequent first.
    /// Equal counts keep the order of first appearance.
    pub fn value_counts(&self, column: &str) -> TableResult<Series> {
        let mut counts: Vec<(Value, i64)> = Vec::new();
        let mut slot: HashMap<&Value, usize> = HashMap::new();
        for v in self.column(column)?.filter(|v| !v.is_null()) {
            let idx = *slot.entry(v).or_insert_with(|| {
                counts.push((v.clone(), 0));
                counts.len() - 1
            });
            counts[idx].1 += 1;
        }
        counts.sort_by(|a, b| b.1.cmp(&a.1));

        Ok(Series {
            index_name: column.to_string(),
            name: "count".to_string(),
            entries: counts
                .into_iter()
                .map(|(k, n)| (k, Value::Integer(n)))
                .collect(),
        })
    }
}
