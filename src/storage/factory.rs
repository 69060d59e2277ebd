//! Storage factory for creating table store instances.

use super::backends::{FileStore, MemoryStore};
use super::error::StorageResult;
use super::traits::TableStore;
use crate::config::{StorageBackend, StorageConfig};

/// Factory for creating table store instances
pub struct StorageFactory;

impl StorageFactory {
    /// Create a store from explicit configuration
    pub async fn from_config(config: &StorageConfig) -> StorageResult<Box<dyn TableStore>> {
        match config.backend {
            StorageBackend::File => {
                let store = FileStore::new(config.base_dir.clone()).await?;
                Ok(Box::new(store))
            }
            StorageBackend::Memory => Ok(Box::new(MemoryStore::new())),
        }
    }
}
