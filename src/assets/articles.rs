//! Articles loader: article metadata with a parsed creation timestamp.

use tracing::debug;

use super::AssetContext;
use crate::error::Result;
use crate::table::{read_csv, Table};

pub const CREATED_AT_TS: &str = "created_at_ts";

/// Load the article metadata CSV and coerce its creation timestamp.
/// Unpartitioned; the whole table is materialized on every run.
pub fn articles_table(ctx: &AssetContext, _inputs: &[Table]) -> Result<Table> {
    let mut table = read_csv(&ctx.config.articles_path)?;
    table.coerce_timestamps(CREATED_AT_TS)?;

    debug!(rows = table.len(), "loaded article metadata");
    Ok(table)
}
