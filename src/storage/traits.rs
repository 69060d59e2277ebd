//! Core trait definition for the table store port.

use async_trait::async_trait;

use super::error::StorageResult;
use crate::partition::PartitionKey;
use crate::table::Table;

/// The persistence port every step writes through and reads from.
///
/// A table is addressed by name plus an optional partition key. A write
/// fully supersedes any prior materialization for the same address; a
/// read of an address that was never written fails with `NotFound`.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Persist a table, replacing any prior write for the same address.
    async fn write(
        &self,
        table: &str,
        partition: Option<&PartitionKey>,
        data: &Table,
    ) -> StorageResult<()>;

    /// Retrieve a previously written table.
    async fn read(&self, table: &str, partition: Option<&PartitionKey>) -> StorageResult<Table>;

    /// Whether a write exists for the address.
    async fn exists(&self, table: &str, partition: Option<&PartitionKey>) -> StorageResult<bool>;

    /// Names of all tables with at least one materialization.
    async fn list_tables(&self) -> StorageResult<Vec<String>>;
}
