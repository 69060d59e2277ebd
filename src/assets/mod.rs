//! The four transformation steps.
//!
//! Every step has the same shape: a pure function from a context plus
//! zero or more upstream table snapshots to one output table. The
//! runner in [`crate::pipeline`] wires them to the store; nothing here
//! performs I/O beyond reading the configured source files.

pub mod articles;
pub mod clicks;
pub mod daily;
pub mod joined;

pub use articles::articles_table;
pub use clicks::clicks_table;
pub use daily::daily_partitioned;
pub use joined::joined_data;

use crate::config::PipelineConfig;
use crate::error::Result;
use crate::partition::PartitionKey;
use crate::table::Table;

/// Table names as addressed through the store.
pub const CLICKS_TABLE: &str = "clicks_table";
pub const ARTICLES_TABLE: &str = "articles_table";
pub const JOINED_DATA: &str = "joined_data";
pub const DAILY_PARTITIONED: &str = "daily_partitioned";

/// Invocation context handed to every step.
pub struct AssetContext<'a> {
    pub config: &'a PipelineConfig,
    /// Partition key for this run; `None` for unpartitioned runs.
    pub partition: Option<&'a PartitionKey>,
}

/// Uniform step signature: loaders ignore `inputs`, transforms receive
/// their upstream tables in declared dependency order.
pub type AssetFn = fn(&AssetContext, &[Table]) -> Result<Table>;
