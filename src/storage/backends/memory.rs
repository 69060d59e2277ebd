//! In-memory table store for testing.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::partition::PartitionKey;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::traits::TableStore;
use crate::table::Table;

type Address = (String, Option<String>);

/// In-memory table store for testing
#[derive(Default)]
pub struct MemoryStore {
    tables: Arc<RwLock<HashMap<Address, Table>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn address(table: &str, partition: Option<&PartitionKey>) -> Address {
        (
            table.to_string(),
            partition.map(|p| p.as_str().to_string()),
        )
    }

    fn describe(table: &str, partition: Option<&PartitionKey>) -> String {
        match partition {
            Some(p) => format!("{table}@{p}"),
            None => table.to_string(),
        }
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn write(
        &self,
        table: &str,
        partition: Option<&PartitionKey>,
        data: &Table,
    ) -> StorageResult<()> {
        self.tables
            .write()
            .await
            .insert(Self::address(table, partition), data.clone());
        Ok(())
    }

    async fn read(&self, table: &str, partition: Option<&PartitionKey>) -> StorageResult<Table> {
        self.tables
            .read()
            .await
            .get(&Self::address(table, partition))
            .cloned()
            .ok_or_else(|| StorageError::not_found(Self::describe(table, partition)))
    }

    async fn exists(&self, table: &str, partition: Option<&PartitionKey>) -> StorageResult<bool> {
        Ok(self
            .tables
            .read()
            .await
            .contains_key(&Self::address(table, partition)))
    }

    async fn list_tables(&self) -> StorageResult<Vec<String>> {
        let tables = self.tables.read().await;
        let mut names: Vec<String> = tables.keys().map(|(name, _)| name.clone()).collect();
        names.sort();
        names.dedup();
        Ok(names)
    }
}
