use super::error::TableResult;
use super::model::{DType, Table, Value};

/// One line of [`Table::info`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub non_null: usize,
    pub dtype: DType,
}

/// Summary statistics of one numeric column.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n − 1 denominator); NaN below two values.
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

impl NumericSummary {
    /// Row labels in display order, paired with the statistic.
    pub fn stats(&self) -> [(&'static str, f64); 8] {
        [
            ("count", self.count as f64),
            ("mean", self.mean),
            ("std", self.std),
            ("min", self.min),
            ("25%", self.q25),
            ("50%", self.q50),
            ("75%", self.q75),
            ("max", self.max),
        ]
    }
}

impl Table {
    /// Per-column non-null count and inferred type.
    pub fn info(&self) -> Vec<ColumnInfo> {
        self.column_names()
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let cells = self.rows().iter().map(|row| &row[i]);
                ColumnInfo {
                    name: name.clone(),
                    non_null: cells.clone().filter(|v| !v.is_null()).count(),
                    dtype: DType::infer(cells),
                }
            })
            .collect()
    }

    /// Summary statistics for every numeric column, in column order.
    pub fn describe(&self) -> TableResult<Vec<NumericSummary>> {
        let mut out = Vec::new();
        for name in self.column_names() {
            if !self.dtype(name)?.is_numeric() {
                continue;
            }
            let mut values: Vec<f64> = self.column(name)?.filter_map(Value::as_f64).collect();
            values.sort_by(f64::total_cmp);
            out.push(summarize(name, &values));
        }
        Ok(out)
    }
}

/// `values` must be sorted ascending.
fn summarize(column: &str, values: &[f64]) -> NumericSummary {
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    let std = if n < 2 {
        f64::NAN
    } else {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (n - 1) as f64).sqrt()
    };
    NumericSummary {
        column: column.to_string(),
        count: n,
        mean,
        std,
        min: values.first().copied().unwrap_or(f64::NAN),
        q25: quantile(values, 0.25),
        q50: quantile(values, 0.50),
        q75: quantile(values, 0.75),
        max: values.last().copied().unwrap_or(f64::NAN),
    }
}

/// Linear interpolation between the closest ranks.
fn quantile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}
