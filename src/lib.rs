//! # Clickflow
//!
//! A small dataflow pipeline: load click events and article metadata from
//! CSV, join them, and materialize hourly and daily tagged views through a
//! pluggable table store.
//!
//! ## Modules
//!
//! - `assets` - The four transformation steps (clicks, articles, join, daily)
//! - `config` - Configuration loading (TOML file, env overrides)
//! - `error` - Unified error type for the pipeline core
//! - `partition` - Hourly partition window and timestamp tagging helpers
//! - `pipeline` - Asset registry, dependency ordering, sequential runner
//! - `storage` - The table store port with file and memory backends
//! - `table` - Minimal tabular container with CSV ingestion and inner join
pub mod assets;
pub mod config;
pub mod error;
pub mod partition;
pub mod pipeline;
pub mod storage;
pub mod table;

pub use error::{PipelineError, Result};
