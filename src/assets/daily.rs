//! Daily view: joined rows tagged with their calendar date.

use tracing::debug;

use super::clicks::CLICK_TIMESTAMP;
use super::AssetContext;
use crate::error::{PipelineError, Result};
use crate::partition::day_of;
use crate::table::{Table, Value};

pub const DAY_PARTITION: &str = "day_partition";

/// Tag every joined row with the calendar date of its click timestamp.
///
/// The source pipeline declared this asset daily-partitioned while
/// processing its whole input unconditionally; here the partition
/// declaration is dropped and the tag always derives from each row's
/// own timestamp.
pub fn daily_partitioned(_ctx: &AssetContext, inputs: &[Table]) -> Result<Table> {
    let [joined] = inputs else {
        return Err(PipelineError::Config(format!(
            "daily_partitioned expects 1 upstream table, got {}",
            inputs.len()
        )));
    };

    let ts_idx = joined.column_index(CLICK_TIMESTAMP)?;
    let table = joined
        .clone()
        .with_derived_column(DAY_PARTITION, |t, row| match t.rows()[row][ts_idx] {
            Value::Timestamp(ts) => Ok(Value::Date(day_of(ts))),
            ref other => Err(PipelineError::parse(CLICK_TIMESTAMP, row, other.render())),
        })?;

    debug!(rows = table.len(), "tagged joined rows with day");
    Ok(table)
}
