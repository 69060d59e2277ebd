//! Configuration management for the pipeline.
//!
//! Settings come from `clickflow.toml` when present, then environment
//! variables (`CLICKFLOW_*`), then CLI flags. Later layers win.

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};
use crate::partition::HourlyPartitions;

/// Top-level pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Path to the click events CSV
    pub clicks_path: PathBuf,
    /// Path to the article metadata CSV
    pub articles_path: PathBuf,
    pub storage: StorageConfig,
    pub partitions: PartitionConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            clicks_path: PathBuf::from("data/clicks.csv"),
            articles_path: PathBuf::from("data/articles_metadata.csv"),
            storage: StorageConfig::default(),
            partitions: PartitionConfig::default(),
        }
    }
}

/// Which table store backend to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    File,
    Memory,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Base directory for the file backend
    pub base_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            base_dir: PathBuf::from(".clickflow/tables"),
        }
    }
}

/// The hourly window the clicks asset is partitioned over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// First slot of the window
    pub start: NaiveDateTime,
    /// Number of one-hour slots
    pub hours: u32,
}

impl Default for PartitionConfig {
    fn default() -> Self {
        // One week of hourly slots, as the source pipeline declares
        Self {
            start: chrono::DateTime::UNIX_EPOCH.naive_utc(),
            hours: 168,
        }
    }
}

impl PartitionConfig {
    pub fn hourly(&self) -> HourlyPartitions {
        HourlyPartitions::new(self.start, self.hours)
    }
}

impl PipelineConfig {
    /// Load configuration: defaults, then the TOML file (explicit path or
    /// `clickflow.toml` in the working directory), then env overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new("clickflow.toml");
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.merge_env_vars();
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| PipelineError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|e| PipelineError::Config(e.to_string()))
    }

    /// Environment variables override file values.
    fn merge_env_vars(&mut self) {
        if let Ok(path) = std::env::var("CLICKFLOW_CLICKS") {
            self.clicks_path = PathBuf::from(path);
        }
        if let Ok(path) = std::env::var("CLICKFLOW_ARTICLES") {
            self.articles_path = PathBuf::from(path);
        }
        if let Ok(dir) = std::env::var("CLICKFLOW_STORAGE_DIR") {
            self.storage.base_dir = PathBuf::from(dir);
        }
        if let Ok(backend) = std::env::var("CLICKFLOW_STORAGE_BACKEND") {
            match backend.as_str() {
                "file" => self.storage.backend = StorageBackend::File,
                "memory" => self.storage.backend = StorageBackend::Memory,
                other => {
                    tracing::warn!("ignoring unknown CLICKFLOW_STORAGE_BACKEND: {other}");
                }
            }
        }
    }
}
