use std::collections::HashMap;

use crate::error::PipelineError;

/// A single cell of the record table.
///
/// After normalization the designated numeric columns hold only `Number` or
/// `Missing`; identifier columns keep their original text.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Missing,
}

impl Value {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Numeric coercion used by the normalizer: numbers pass through,
    /// parseable text becomes a number, everything else becomes `Missing`.
    pub fn coerce_numeric(&self) -> Value {
        match self {
            Value::Number(n) => Value::Number(*n),
            Value::Text(s) => match s.trim().parse::<f64>() {
                Ok(n) => Value::Number(n),
                Err(_) => Value::Missing,
            },
            Value::Missing => Value::Missing,
        }
    }

    /// Textual form used when a cell serves as a grouping key.
    pub fn key_string(&self) -> Option<String> {
        match self {
            Value::Text(s) => Some(s.clone()),
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(format!("{}", n))
                }
            }
            Value::Missing => None,
        }
    }
}

/// In-memory table of the current upload: named columns over rows of values.
///
/// The table has no identity beyond the current session; a new upload
/// replaces it wholesale.
#[derive(Clone, Debug, Default)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl DataTable {
    pub fn new(columns: Vec<String>) -> Self {
        DataTable {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Appends a row, padding short rows with `Missing` and dropping any
    /// cells beyond the header width.
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Missing);
        self.rows.push(row);
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Looks up a column the aggregator depends on, failing with an error
    /// that names the column when it is absent.
    pub fn require_column(&self, name: &str) -> Result<usize, PipelineError> {
        self.column_index(name)
            .ok_or_else(|| PipelineError::MissingColumn(name.to_string()))
    }

    pub fn value(&self, row: usize, col: usize) -> &Value {
        &self.rows[row][col]
    }
}

/// Partitions row indices by the values of the given key columns, preserving
/// first-seen group order. Rows with a missing key cell are skipped, matching
/// the usual tabular-library convention for null group keys.
pub fn group_rows(table: &DataTable, key_cols: &[usize]) -> Vec<(Vec<String>, Vec<usize>)> {
    let mut groups: Vec<(Vec<String>, Vec<usize>)> = Vec::new();
    let mut index: HashMap<Vec<String>, usize> = HashMap::new();

    'rows: for (r, row) in table.rows.iter().enumerate() {
        let mut key = Vec::with_capacity(key_cols.len());
        for &c in key_cols {
            match row[c].key_string() {
                Some(k) => key.push(k),
                None => continue 'rows,
            }
        }

        match index.get(&key) {
            Some(&g) => groups[g].1.push(r),
            None => {
                index.insert(key.clone(), groups.len());
                groups.push((key, vec![r]));
            }
        }
    }

    groups
}

/// Mean over the defined values only; `None` when no value is defined.
pub fn mean(values: impl Iterator<Item = Option<f64>>) -> Option<f64> {
    let mut sum = 0.0;
    let mut count = 0usize;
    for v in values.flatten() {
        sum += v;
        count += 1;
    }
    if count == 0 {
        None
    } else {
        Some(sum / count as f64)
    }
}

/// Division that propagates an undefined result instead of producing
/// infinities: `None` when the denominator is zero or either side is missing.
pub fn safe_div(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}
