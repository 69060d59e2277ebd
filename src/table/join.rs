//! Inner join between two tables on a single key column.

use std::collections::HashMap;

use super::{JoinKey, Table};
use crate::error::Result;

/// Outcome of an inner join, including how many left rows found no match.
pub struct JoinOutput {
    pub table: Table,
    pub dropped_left: usize,
}

impl Table {
    /// Inner-join `self` (left) with `right` on `left_on` = `right_on`.
    ///
    /// The right key column is dropped from the output; the left key
    /// survives. Left row order is preserved, and a left row matching
    /// several right rows produces one output row per match. Rows whose
    /// key is null (or a float) never match and are dropped, as are
    /// right rows nothing joins to.
    pub fn inner_join(&self, right: &Table, left_on: &str, right_on: &str) -> Result<JoinOutput> {
        let left_key = self.column_index(left_on)?;
        let right_key = right.column_index(right_on)?;

        let mut by_key: HashMap<JoinKey, Vec<usize>> = HashMap::new();
        for (idx, row) in right.rows().iter().enumerate() {
            if let Some(key) = row[right_key].join_key() {
                by_key.entry(key).or_default().push(idx);
            }
        }

        let mut columns: Vec<String> = self.columns().to_vec();
        columns.extend(
            right
                .columns()
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != right_key)
                .map(|(_, c)| c.clone()),
        );

        let mut out = Table::new(columns);
        let mut dropped_left = 0usize;
        for row in self.rows() {
            let matches = row[left_key]
                .join_key()
                .and_then(|key| by_key.get(&key));
            let Some(matches) = matches else {
                dropped_left += 1;
                continue;
            };
            for &right_idx in matches {
                let mut joined = row.clone();
                joined.extend(
                    right.rows()[right_idx]
                        .iter()
                        .enumerate()
                        .filter(|(i, _)| *i != right_key)
                        .map(|(_, v)| v.clone()),
                );
                out.push_row(joined)?;
            }
        }

        Ok(JoinOutput {
            table: out,
            dropped_left,
        })
    }
}
