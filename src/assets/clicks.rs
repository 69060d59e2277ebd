//! Clicks loader: raw click events with an hour tag.

use tracing::debug;

use super::AssetContext;
use crate::error::{PipelineError, Result};
use crate::partition::floor_to_hour;
use crate::table::{read_csv, Table, Value};

pub const SESSION_START: &str = "session_start";
pub const CLICK_TIMESTAMP: &str = "click_timestamp";
pub const HOUR_PARTITION: &str = "hour_partition";

/// Load the click events CSV, coerce its two timestamp columns, and tag
/// each row with the hour containing its click timestamp.
///
/// The asset is declared hourly-partitioned, but like the source
/// pipeline it re-reads and emits the whole file on every invocation;
/// the slot boundary only scopes where the output is persisted.
pub fn clicks_table(ctx: &AssetContext, _inputs: &[Table]) -> Result<Table> {
    let mut table = read_csv(&ctx.config.clicks_path)?;
    table.coerce_timestamps(SESSION_START)?;
    table.coerce_timestamps(CLICK_TIMESTAMP)?;

    let ts_idx = table.column_index(CLICK_TIMESTAMP)?;
    let table = table.with_derived_column(HOUR_PARTITION, |t, row| {
        match t.rows()[row][ts_idx] {
            Value::Timestamp(ts) => Ok(Value::Timestamp(floor_to_hour(ts))),
            // unreachable after coercion, but keep the error honest
            ref other => Err(PipelineError::parse(CLICK_TIMESTAMP, row, other.render())),
        }
    })?;

    debug!(rows = table.len(), "loaded click events");
    Ok(table)
}
