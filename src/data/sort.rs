use std::cmp::Ordering;

use super::error::TableResult;
use super::model::{Table, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl Table {
    /// Rows reordered by `column`.
    ///
    /// The sort is stable: rows with equal keys keep their original relative
    /// order, which also makes the operation idempotent. Nulls go last in
    /// both directions.
    pub fn sort_by(&self, column: &str, order: SortOrder) -> TableResult<Table> {
        let keys: Vec<&Value> = self.column(column)?.collect();
        let mut indices: Vec<usize> = (0..keys.len()).collect();
        indices.sort_by(|&a, &b| compare_keys(keys[a], keys[b], order));
        log::debug!("sorted {} rows by {column} ({order:?})", indices.len());
        Ok(self.take_rows(&indices))
    }
}

fn compare_keys(a: &Value, b: &Value, order: SortOrder) -> Ordering {
    match (a.is_null(), b.is_null()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => match order {
            SortOrder::Ascending => a.cmp(b),
            SortOrder::Descending => b.cmp(a),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Table {
        Table::from_columns([
            (
                "id",
                vec![
                    Value::from(0),
                    Value::from(1),
                    Value::from(2),
                    Value::from(3),
                    Value::from(4),
                ],
            ),
            (
                "qty",
                vec![
                    Value::from(3),
                    Value::Null,
                    Value::from(7),
                    Value::from(3),
                    Value::from(1.5),
                ],
            ),
        ])
        .unwrap()
    }

    fn ids(t: &Table) -> Vec<Value> {
        t.column("id").unwrap().cloned().collect()
    }

    #[test]
    fn descending_is_stable_with_nulls_last() {
        let sorted = table().sort_by("qty", SortOrder::Descending).unwrap();
        let expected: Vec<Value> = [2, 0, 3, 4, 1].into_iter().map(Value::from).collect();
        assert_eq!(ids(&sorted), expected);
    }

    #[test]
    fn ascending_keeps_nulls_last() {
        let sorted = table().sort_by("qty", SortOrder::Ascending).unwrap();
        let expected: Vec<Value> = [4, 0, 3, 2, 1].into_iter().map(Value::from).collect();
        assert_eq!(ids(&sorted), expected);
    }

    #[test]
    fn equal_int_and_float_keys_keep_row_order() {
        let t = Table::from_columns([
            ("id", vec![Value::from(0), Value::from(1), Value::from(2)]),
            ("x", vec![Value::from(2), Value::from(2.0), Value::from(1.5)]),
        ])
        .unwrap();
        let expected: Vec<Value> = [0, 1, 2].into_iter().map(Value::from).collect();
        assert_eq!(ids(&t.sort_by("x", SortOrder::Descending).unwrap()), expected);

        let expected: Vec<Value> = [2, 0, 1].into_iter().map(Value::from).collect();
        assert_eq!(ids(&t.sort_by("x", SortOrder::Ascending).unwrap()), expected);
    }

    #[test]
    fn sorting_twice_changes_nothing() {
        let once = table().sort_by("qty", SortOrder::Descending).unwrap();
        let twice = once.sort_by("qty", SortOrder::Descending).unwrap();
        assert_eq!(once, twice);
    }
}
