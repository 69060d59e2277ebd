//! File-based table store implementation.
//!
//! Each materialization is one JSON file under the base directory:
//! `<base>/<table>/<partition>.json`, with `_full.json` standing in for
//! unpartitioned tables. Writes go through a temp file and rename so a
//! failed write never leaves a truncated materialization behind.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;

use crate::partition::PartitionKey;
use crate::storage::error::{StorageError, StorageResult};
use crate::storage::traits::TableStore;
use crate::table::Table;

const UNPARTITIONED: &str = "_full";

/// File-based table store
pub struct FileStore {
    base_dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `base_dir`, creating it if needed.
    pub async fn new(base_dir: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_dir = base_dir.into();
        fs::create_dir_all(&base_dir).await.map_err(StorageError::Io)?;
        Ok(Self { base_dir })
    }

    fn table_path(&self, table: &str, partition: Option<&PartitionKey>) -> PathBuf {
        let file = match partition {
            Some(p) => sanitize(p.as_str()),
            None => UNPARTITIONED.to_string(),
        };
        self.base_dir.join(table).join(format!("{file}.json"))
    }

    async fn ensure_dir(path: &Path) -> StorageResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(StorageError::Io)?;
        }
        Ok(())
    }

    fn describe(table: &str, partition: Option<&PartitionKey>) -> String {
        match partition {
            Some(p) => format!("{table}@{p}"),
            None => table.to_string(),
        }
    }
}

/// Partition keys carry spaces and colons; keep filenames portable.
fn sanitize(key: &str) -> String {
    key.chars()
        .map(|c| match c {
            ' ' => '_',
            ':' => '-',
            '/' => '-',
            c => c,
        })
        .collect()
}

#[async_trait]
impl TableStore for FileStore {
    async fn write(
        &self,
        table: &str,
        partition: Option<&PartitionKey>,
        data: &Table,
    ) -> StorageResult<()> {
        let path = self.table_path(table, partition);
        Self::ensure_dir(&path).await?;

        let content = serde_json::to_string_pretty(data)?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, content).await.map_err(StorageError::Io)?;
        fs::rename(&tmp, &path).await.map_err(StorageError::Io)?;
        Ok(())
    }

    async fn read(&self, table: &str, partition: Option<&PartitionKey>) -> StorageResult<Table> {
        let path = self.table_path(table, partition);
        let content = match fs::read_to_string(&path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::not_found(Self::describe(table, partition)))
            }
            Err(e) => return Err(StorageError::Io(e)),
        };
        serde_json::from_str(&content).map_err(StorageError::serialization)
    }

    async fn exists(&self, table: &str, partition: Option<&PartitionKey>) -> StorageResult<bool> {
        Ok(fs::try_exists(self.table_path(table, partition))
            .await
            .map_err(StorageError::Io)?)
    }

    async fn list_tables(&self) -> StorageResult<Vec<String>> {
        let mut names = Vec::new();
        let mut entries = fs::read_dir(&self.base_dir).await.map_err(StorageError::Io)?;
        while let Some(entry) = entries.next_entry().await.map_err(StorageError::Io)? {
            if entry.file_type().await.map_err(StorageError::Io)?.is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }
}
