use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use super::error::{TableError, TableResult};

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring common Pandas dtypes.
///
/// Integers and floats compare numerically against each other, so a
/// threshold of `Integer(1000)` filters a `float64` column as expected.
/// Equality, hashing and ordering share one canonical numeric form, so
/// `Integer(2) == Float(2.0)` and `Float(-0.0) == Float(0.0)`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum Value {
    String(String),
    Integer(i64),
    Float(f64),
    Null,
}

/// Canonical form of a number: integral floats inside the `i64` range
/// become `Int`, `-0.0` becomes `Int(0)`, every NaN shares one bit pattern.
#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i64),
    Float(f64),
}

const I64_BOUND: f64 = 9_223_372_036_854_775_808.0; // 2^63

impl Number {
    fn of(value: &Value) -> Option<Number> {
        match value {
            Value::Integer(i) => Some(Number::Int(*i)),
            Value::Float(f) => Some(Number::from_f64(*f)),
            _ => None,
        }
    }

    fn from_f64(f: f64) -> Number {
        if f.is_nan() {
            Number::Float(f64::NAN)
        } else if f.fract() == 0.0 && (-I64_BOUND..I64_BOUND).contains(&f) {
            Number::Int(f as i64)
        } else {
            Number::Float(f)
        }
    }

    fn cmp(self, other: Number) -> Ordering {
        match (self, other) {
            (Number::Int(a), Number::Int(b)) => a.cmp(&b),
            (Number::Float(a), Number::Float(b)) => a.total_cmp(&b),
            // a non-integral (or out of range) float never equals an i64
            (Number::Int(a), Number::Float(b)) => (a as f64).total_cmp(&b).then(Ordering::Less),
            (Number::Float(a), Number::Int(b)) => a.total_cmp(&(b as f64)).then(Ordering::Greater),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    /// Total order: Null < numbers < strings. Numbers compare by magnitude;
    /// NaN sorts above every other number.
    fn cmp(&self, other: &Self) -> Ordering {
        use Value::*;
        fn rank(v: &Value) -> u8 {
            match v {
                Null => 0,
                Integer(_) | Float(_) => 1,
                String(_) => 2,
            }
        }
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (String(a), String(b)) => a.cmp(b),
            _ => match (Number::of(self), Number::of(other)) {
                (Some(a), Some(b)) => a.cmp(b),
                _ => rank(self).cmp(&rank(other)),
            },
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Value::String(s) => {
                0u8.hash(state);
                s.hash(state);
            }
            Value::Null => 1u8.hash(state),
            Value::Integer(_) | Value::Float(_) => match Number::of(self) {
                Some(Number::Int(i)) => {
                    2u8.hash(state);
                    i.hash(state);
                }
                Some(Number::Float(f)) => {
                    3u8.hash(state);
                    f.to_bits().hash(state);
                }
                None => {}
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => write!(f, "{s}"),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v:?}"),
            Value::Null => write!(f, "NaN"),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<i32> for Value {
    fn from(i: i32) -> Self {
        Value::Integer(i.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl Value {
    /// Interpret the value as an `f64` when it is numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Integer(_) | Value::Float(_))
    }

    /// Comparison used by predicates: `None` when either side is null or the
    /// two sides are not comparable (text against a number).
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => None,
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            (Value::Integer(a), Value::Integer(b)) => Some(a.cmp(b)),
            (a, b) => a.as_f64()?.partial_cmp(&b.as_f64()?),
        }
    }

    /// Multiply two numeric values. Integer products stay integral unless
    /// they overflow, in which case the product is computed in `f64`.
    /// Returns `None` if either operand is not numeric; null propagates.
    pub fn checked_mul(&self, other: &Value) -> Option<Value> {
        match (self, other) {
            (Value::Null, _) | (_, Value::Null) => Some(Value::Null),
            (Value::Integer(a), Value::Integer(b)) => Some(
                a.checked_mul(*b)
                    .map(Value::Integer)
                    .unwrap_or(Value::Float(*a as f64 * *b as f64)),
            ),
            (a, b) => Some(Value::Float(a.as_f64()? * b.as_f64()?)),
        }
    }
}

// ---------------------------------------------------------------------------
// DType – inferred column type
// ---------------------------------------------------------------------------

/// Column type inferred from the cells of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DType {
    Int64,
    Float64,
    Object,
    Null,
}

impl DType {
    /// Infer the narrowest type that holds every non-null value.
    pub fn infer<'a>(values: impl IntoIterator<Item = &'a Value>) -> DType {
        values.into_iter().fold(DType::Null, |acc, v| {
            let this = match v {
                Value::Null => return acc,
                Value::Integer(_) => DType::Int64,
                Value::Float(_) => DType::Float64,
                Value::String(_) => DType::Object,
            };
            match (acc, this) {
                (DType::Null, t) => t,
                (DType::Object, _) | (_, DType::Object) => DType::Object,
                (DType::Int64, DType::Int64) => DType::Int64,
                _ => DType::Float64,
            }
        })
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, DType::Int64 | DType::Float64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DType::Int64 => "int64",
            DType::Float64 => "float64",
            DType::Object => "object",
            DType::Null => "null",
        };
        f.write_str(name)
    }
}

// ---------------------------------------------------------------------------
// Table – named columns over a fixed set of rows
// ---------------------------------------------------------------------------

/// A row-oriented table with ordered, uniquely named columns.
///
/// The row count is fixed at construction. Every operation except
/// [`Table::add_column`] returns a new table and leaves `self` untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build a table from rows. Every row must be as wide as the header.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<Value>>) -> TableResult<Self> {
        check_column_names(&columns)?;
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(TableError::RowWidthMismatch {
                    row: i,
                    expected: columns.len(),
                    found: row.len(),
                });
            }
        }
        Ok(Table { columns, rows })
    }

    /// Build a table from ordered `(name, values)` pairs of equal length.
    pub fn from_columns<I, S>(columns: I) -> TableResult<Self>
    where
        I: IntoIterator<Item = (S, Vec<Value>)>,
        S: Into<String>,
    {
        let mut names = Vec::new();
        let mut data: Vec<Vec<Value>> = Vec::new();
        for (name, values) in columns {
            let name = name.into();
            if let Some(first) = data.first() {
                if values.len() != first.len() {
                    return Err(TableError::LengthMismatch {
                        column: name,
                        expected: first.len(),
                        found: values.len(),
                    });
                }
            }
            names.push(name);
            data.push(values);
        }
        check_column_names(&names)?;

        let n_rows = data.first().map_or(0, Vec::len);
        let mut iters: Vec<_> = data.into_iter().map(Vec::into_iter).collect();
        let rows = (0..n_rows)
            .map(|_| iters.iter_mut().filter_map(Iterator::next).collect())
            .collect();

        log::debug!("constructed table: {n_rows} rows × {} columns", names.len());
        Ok(Table {
            columns: names,
            rows,
        })
    }

    /// `(rows, columns)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols())
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_names(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    /// Position of a column in the header.
    pub fn column_index(&self, name: &str) -> TableResult<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| TableError::UnknownColumn(name.to_string()))
    }

    /// Iterate the cells of one column in row order.
    pub fn column(&self, name: &str) -> TableResult<impl Iterator<Item = &Value> + '_> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(move |row| &row[idx]))
    }

    /// Inferred type of a column.
    pub fn dtype(&self, name: &str) -> TableResult<DType> {
        Ok(DType::infer(self.column(name)?))
    }

    /// Cell at `(row, column)`; `None` if the row is out of range.
    pub fn get(&self, row: usize, column: &str) -> TableResult<Option<&Value>> {
        let idx = self.column_index(column)?;
        Ok(self.rows.get(row).map(|r| &r[idx]))
    }

    /// The first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// Project onto a subset of columns, in the order given.
    pub fn select(&self, names: &[&str]) -> TableResult<Table> {
        let indices = names
            .iter()
            .map(|n| self.column_index(n))
            .collect::<TableResult<Vec<_>>>()?;
        let columns: Vec<String> = names.iter().map(|n| n.to_string()).collect();
        check_column_names(&columns)?;
        let rows = self
            .rows
            .iter()
            .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
            .collect();
        Ok(Table { columns, rows })
    }

    /// Keep the rows at `indices`, in that order.
    pub(crate) fn take_rows(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }

    /// Add a column computed from other columns of the same row.
    ///
    /// `derive` receives the cells of `sources` (in that order) and the row
    /// number. Every row is computed before the table is touched, so a
    /// failing row leaves the table unchanged. If `name` already exists its
    /// values are recomputed in place.
    pub fn add_column<F>(&mut self, name: &str, sources: &[&str], derive: F) -> TableResult<()>
    where
        F: Fn(&[&Value], usize) -> TableResult<Value>,
    {
        if name.is_empty() {
            return Err(TableError::EmptyColumnName);
        }
        let indices = sources
            .iter()
            .map(|s| self.column_index(s))
            .collect::<TableResult<Vec<_>>>()?;

        let derived = self
            .rows
            .iter()
            .enumerate()
            .map(|(r, row)| {
                let args: Vec<&Value> = indices.iter().map(|&i| &row[i]).collect();
                derive(&args, r)
            })
            .collect::<TableResult<Vec<_>>>()?;

        match self.columns.iter().position(|c| c == name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(derived) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(derived) {
                    row.push(value);
                }
            }
        }
        log::debug!("derived column '{name}' from {sources:?}");
        Ok(())
    }

    /// `name = left × right` for every row.
    pub fn add_product_column(&mut self, name: &str, left: &str, right: &str) -> TableResult<()> {
        self.add_column(name, &[left, right], |args, row| {
            args[0].checked_mul(args[1]).ok_or_else(|| {
                let (column, bad) = if args[0].is_numeric() || args[0].is_null() {
                    (right, args[1])
                } else {
                    (left, args[0])
                };
                TableError::NonNumeric {
                    column: column.to_string(),
                    row,
                    value: bad.to_string(),
                }
            })
        })
    }
}

fn check_column_names(columns: &[String]) -> TableResult<()> {
    let mut seen = BTreeSet::new();
    for name in columns {
        if name.is_empty() {
            return Err(TableError::EmptyColumnName);
        }
        if !seen.insert(name.as_str()) {
            return Err(TableError::DuplicateColumn(name.clone()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small() -> Table {
        Table::from_columns([
            ("name", vec![Value::from("a"), Value::from("b"), Value::from("c")]),
            ("price", vec![Value::from(2), Value::from(3), Value::from(1.5)]),
            ("qty", vec![Value::from(4), Value::from(5), Value::from(2)]),
        ])
        .unwrap()
    }

    #[test]
    fn from_columns_rejects_ragged_columns() {
        let err = Table::from_columns([
            ("a", vec![Value::from(1), Value::from(2)]),
            ("b", vec![Value::from(1)]),
        ])
        .unwrap_err();
        assert_eq!(
            err,
            TableError::LengthMismatch {
                column: "b".into(),
                expected: 2,
                found: 1
            }
        );
    }

    #[test]
    fn from_columns_rejects_duplicate_names() {
        let err = Table::from_columns([("a", vec![]), ("a", vec![])]).unwrap_err();
        assert_eq!(err, TableError::DuplicateColumn("a".into()));
    }

    #[test]
    fn new_rejects_narrow_rows() {
        let err = Table::new(
            vec!["a".into(), "b".into()],
            vec![vec![Value::from(1), Value::from(2)], vec![Value::from(3)]],
        )
        .unwrap_err();
        assert!(matches!(err, TableError::RowWidthMismatch { row: 1, .. }));
    }

    #[test]
    fn dtype_inference() {
        let t = small();
        assert_eq!(t.dtype("name").unwrap(), DType::Object);
        assert_eq!(t.dtype("price").unwrap(), DType::Float64);
        assert_eq!(t.dtype("qty").unwrap(), DType::Int64);
        assert_eq!(DType::infer(&[Value::Null]), DType::Null);
        assert_eq!(DType::infer(&[Value::Null, Value::from(1)]), DType::Int64);
    }

    #[test]
    fn product_column_covers_every_row() {
        let mut t = small();
        t.add_product_column("total", "price", "qty").unwrap();
        assert_eq!(t.column_names().last().unwrap(), "total");
        let totals: Vec<_> = t.column("total").unwrap().cloned().collect();
        assert_eq!(
            totals,
            vec![Value::Integer(8), Value::Integer(15), Value::Float(3.0)]
        );
    }

    #[test]
    fn recomputing_existing_column_keeps_position() {
        let mut t = small();
        t.add_product_column("total", "price", "qty").unwrap();
        t.add_product_column("total", "qty", "qty").unwrap();
        assert_eq!(t.n_cols(), 4);
        assert_eq!(t.get(1, "total").unwrap(), Some(&Value::Integer(25)));
    }

    #[test]
    fn derivation_errors_leave_table_untouched() {
        let mut t = small();
        let before = t.clone();
        assert_eq!(
            t.add_product_column("total", "price", "missing").unwrap_err(),
            TableError::UnknownColumn("missing".into())
        );
        let err = t.add_product_column("total", "price", "name").unwrap_err();
        assert!(matches!(err, TableError::NonNumeric { ref column, row: 0, .. } if column == "name"));
        assert_eq!(t, before);
    }

    #[test]
    fn mixed_numeric_ordering() {
        assert!(Value::from(2) < Value::from(2.5));
        assert!(Value::from(3) > Value::from(2.5));
        assert_eq!(Value::Integer(2).cmp(&Value::Float(2.0)), Ordering::Equal);
        assert!(Value::from(f64::NAN) > Value::from(i64::MAX));
        assert!(Value::Null < Value::from(-1));
        assert!(Value::from(100) < Value::from("a"));
        assert_eq!(Value::from(2).compare(&Value::from(2.0)), Some(Ordering::Equal));
        assert_eq!(Value::from("a").compare(&Value::from(1)), None);
    }

    fn hash_of(v: &Value) -> u64 {
        use std::hash::{Hash, Hasher};
        let mut h = std::collections::hash_map::DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    #[test]
    fn equal_numbers_are_one_value() {
        let pairs = [
            (Value::Integer(2), Value::Float(2.0)),
            (Value::Float(0.0), Value::Float(-0.0)),
            (Value::Integer(0), Value::Float(-0.0)),
            (Value::Float(f64::NAN), Value::Float(-f64::NAN)),
        ];
        for (a, b) in &pairs {
            assert_eq!(a, b);
            assert_eq!(a.cmp(b), Ordering::Equal);
            assert_eq!(hash_of(a), hash_of(b), "{a:?} vs {b:?}");
        }
        assert_ne!(Value::Integer(2), Value::Float(2.5));
        assert_ne!(Value::Integer(i64::MAX), Value::Float(I64_BOUND));
        assert_ne!(Value::from("2"), Value::Integer(2));
    }

    #[test]
    fn select_and_head_do_not_mutate() {
        let t = small();
        let s = t.select(&["qty", "name"]).unwrap();
        assert_eq!(s.column_names(), &["qty".to_string(), "name".to_string()]);
        assert_eq!(s.n_rows(), 3);
        assert_eq!(t.head(2).n_rows(), 2);
        assert_eq!(t.n_cols(), 3);
        assert!(t.select(&["nope"]).is_err());
    }
}
