//! Unified error type for the pipeline core.

use std::path::PathBuf;
use thiserror::Error;

use crate::storage::StorageError;

/// Result type used throughout the pipeline core
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors surfaced by the pipeline steps and the runner
#[derive(Error, Debug)]
pub enum PipelineError {
    /// A timestamp field failed to parse; the step produces no output
    #[error("parse error in column '{column}', row {row}: {value:?} is not a timestamp")]
    Parse {
        column: String,
        row: usize,
        value: String,
    },

    /// CSV-level failure (malformed record, ragged row)
    #[error("CSV error reading {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// I/O failure reading a source file
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A step referenced a column the table does not carry
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// Row arity does not match the table's column count
    #[error("row has {got} cells but table has {expected} columns")]
    RowArity { expected: usize, got: usize },

    /// An asset name was not found in the registry
    #[error("unknown asset '{0}'")]
    UnknownAsset(String),

    /// Two assets were registered under the same name
    #[error("duplicate asset '{0}'")]
    DuplicateAsset(String),

    /// The declared dependency edges contain a cycle
    #[error("dependency cycle involving asset '{0}'")]
    Cycle(String),

    /// The supplied partition key is not in the declared partition set
    #[error("partition key '{0}' is not in the hourly partition set")]
    InvalidPartition(String),

    /// A partitioned asset was run without a partition key
    #[error("asset '{0}' is partitioned but no partition key was supplied")]
    MissingPartition(String),

    /// Failure at the storage port
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Configuration file or environment problem
    #[error("configuration error: {0}")]
    Config(String),
}

impl PipelineError {
    /// Parse failure for a named column/row
    pub fn parse(column: impl Into<String>, row: usize, value: impl Into<String>) -> Self {
        Self::Parse {
            column: column.into(),
            row,
            value: value.into(),
        }
    }

    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(e) if e.is_not_found())
    }
}
