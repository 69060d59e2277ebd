//! Minimal tabular container shared by every pipeline step.
//!
//! A [`Table`] is an ordered list of named columns over row-major cells.
//! It supports exactly what the steps need: CSV ingestion, in-place
//! timestamp coercion, derived columns, and an inner join.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

mod csv_read;
mod join;
mod value;

pub use csv_read::read_csv;
pub use join::JoinOutput;
pub use value::{JoinKey, Value};

/// An immutable-by-convention table: steps take snapshots in and return
/// new tables out. Serialization preserves column and row order so a
/// rerun over identical input persists byte-identical output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    /// Index of a named column, or `UnknownColumn`.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| PipelineError::UnknownColumn(name.to_string()))
    }

    /// Append a row; arity must match the column count.
    pub fn push_row(&mut self, row: Vec<Value>) -> Result<()> {
        if row.len() != self.columns.len() {
            return Err(PipelineError::RowArity {
                expected: self.columns.len(),
                got: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// Cell accessor used by tests and the CLI preview.
    pub fn cell(&self, row: usize, column: &str) -> Result<&Value> {
        let idx = self.column_index(column)?;
        Ok(&self.rows[row][idx])
    }

    /// Coerce every cell of `column` to a timestamp in place.
    ///
    /// Fails with `Parse` on the first unparseable cell; the table is
    /// only mutated if every cell coerces, so callers never observe a
    /// half-coerced column.
    pub fn coerce_timestamps(&mut self, column: &str) -> Result<()> {
        let idx = self.column_index(column)?;
        let mut coerced = Vec::with_capacity(self.rows.len());
        for (row_no, row) in self.rows.iter().enumerate() {
            let ts = row[idx].to_timestamp().ok_or_else(|| {
                PipelineError::parse(column, row_no, row[idx].render())
            })?;
            coerced.push(ts);
        }
        for (row, ts) in self.rows.iter_mut().zip(coerced) {
            row[idx] = Value::Timestamp(ts);
        }
        Ok(())
    }

    /// Append a derived column computed from each full row.
    pub fn with_derived_column<F>(mut self, name: &str, mut derive: F) -> Result<Table>
    where
        F: FnMut(&Table, usize) -> Result<Value>,
    {
        let mut derived = Vec::with_capacity(self.rows.len());
        for row_no in 0..self.rows.len() {
            derived.push(derive(&self, row_no)?);
        }
        self.columns.push(name.to_string());
        for (row, value) in self.rows.iter_mut().zip(derived) {
            row.push(value);
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        let mut t = Table::new(vec!["id".into(), "ts".into()]);
        t.push_row(vec![Value::Int(1), Value::Str("2025-01-01 10:05:00".into())])
            .unwrap();
        t.push_row(vec![Value::Int(2), Value::Str("2025-01-01 11:10:00".into())])
            .unwrap();
        t
    }

    #[test]
    fn push_row_rejects_wrong_arity() {
        let mut t = Table::new(vec!["a".into()]);
        let err = t.push_row(vec![Value::Int(1), Value::Int(2)]).unwrap_err();
        assert!(matches!(err, PipelineError::RowArity { expected: 1, got: 2 }));
    }

    #[test]
    fn coerce_timestamps_converts_whole_column() {
        let mut t = sample();
        t.coerce_timestamps("ts").unwrap();
        for row in t.rows() {
            assert!(matches!(row[1], Value::Timestamp(_)));
        }
    }

    #[test]
    fn coerce_timestamps_leaves_table_untouched_on_failure() {
        let mut t = sample();
        t.push_row(vec![Value::Int(3), Value::Str("not-a-date".into())])
            .unwrap();
        let err = t.coerce_timestamps("ts").unwrap_err();
        assert!(err.is_parse());
        // earlier rows were not mutated
        assert!(matches!(t.rows()[0][1], Value::Str(_)));
    }

    #[test]
    fn derived_column_appends_in_order() {
        let t = sample()
            .with_derived_column("doubled", |t, row| {
                let Value::Int(i) = t.rows()[row][0] else {
                    unreachable!()
                };
                Ok(Value::Int(i * 2))
            })
            .unwrap();
        assert_eq!(t.columns().last().map(String::as_str), Some("doubled"));
        assert_eq!(*t.cell(1, "doubled").unwrap(), Value::Int(4));
    }

    #[test]
    fn unknown_column_is_an_error() {
        let t = sample();
        assert!(matches!(
            t.column_index("missing"),
            Err(PipelineError::UnknownColumn(_))
        ));
    }

    #[test]
    fn serialization_round_trips_and_is_stable() {
        let mut t = sample();
        t.coerce_timestamps("ts").unwrap();
        let a = serde_json::to_vec(&t).unwrap();
        let b = serde_json::to_vec(&serde_json::from_slice::<Table>(&a).unwrap()).unwrap();
        assert_eq!(a, b);
    }
}
