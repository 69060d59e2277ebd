//! Asset registry, dependency ordering, and the sequential runner.
//!
//! The dependency graph is an explicit ordered list of specs with
//! declared upstream names, validated and evaluated in topological
//! order. Each asset's output is written through the store before any
//! dependent reads it, so within a run every table observes
//! write-then-read ordering.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::assets::{self, AssetContext, AssetFn};
use crate::config::PipelineConfig;
use crate::error::{PipelineError, Result};
use crate::partition::PartitionKey;
use crate::storage::TableStore;
use crate::table::{Table, Value};

/// How an asset's materializations are scoped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Partitioning {
    /// One materialization replacing the whole table per run
    None,
    /// One materialization per slot of the configured hourly window
    Hourly,
}

/// A named step with its declared upstream dependencies.
pub struct AssetSpec {
    pub name: &'static str,
    pub deps: &'static [&'static str],
    pub partitioning: Partitioning,
    pub run: AssetFn,
}

/// One materialized asset in a completed run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaterializedAsset {
    pub name: String,
    pub partition: Option<String>,
    pub rows: usize,
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub materialized: Vec<MaterializedAsset>,
}

/// Store table holding one row per materialized asset of a run.
pub const RUNS_TABLE: &str = "_runs";

impl RunSummary {
    /// Render the summary as a table so it can persist through the
    /// same port the assets use.
    pub fn to_table(&self) -> Table {
        let mut table = Table::new(vec![
            "asset".into(),
            "partition".into(),
            "rows".into(),
            "completed_at".into(),
        ]);
        for asset in &self.materialized {
            let partition = match &asset.partition {
                Some(p) => Value::Str(p.clone()),
                None => Value::Null,
            };
            // arity is fixed by construction
            table
                .push_row(vec![
                    Value::Str(asset.name.clone()),
                    partition,
                    Value::Int(asset.rows as i64),
                    Value::Timestamp(self.completed_at.naive_utc()),
                ])
                .expect("summary rows match summary columns");
        }
        table
    }
}

/// The declared dependency chain, evaluated sequentially.
pub struct Pipeline {
    specs: Vec<AssetSpec>,
}

impl Pipeline {
    /// The four-step chain from the source pipeline:
    /// two loaders, the join, and the daily view.
    pub fn standard() -> Self {
        Self::new(vec![
            AssetSpec {
                name: assets::CLICKS_TABLE,
                deps: &[],
                partitioning: Partitioning::Hourly,
                run: assets::clicks_table,
            },
            AssetSpec {
                name: assets::ARTICLES_TABLE,
                deps: &[],
                partitioning: Partitioning::None,
                run: assets::articles_table,
            },
            AssetSpec {
                name: assets::JOINED_DATA,
                deps: &[assets::CLICKS_TABLE, assets::ARTICLES_TABLE],
                partitioning: Partitioning::None,
                run: assets::joined_data,
            },
            AssetSpec {
                name: assets::DAILY_PARTITIONED,
                deps: &[assets::JOINED_DATA],
                partitioning: Partitioning::None,
                run: assets::daily_partitioned,
            },
        ])
    }

    pub fn new(specs: Vec<AssetSpec>) -> Self {
        Self { specs }
    }

    pub fn asset_names(&self) -> Vec<&'static str> {
        self.specs.iter().map(|s| s.name).collect()
    }

    fn spec(&self, name: &str) -> Result<&AssetSpec> {
        self.specs
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| PipelineError::UnknownAsset(name.to_string()))
    }

    /// Validate names and edges and return execution order (indices
    /// into `specs`) via Kahn's algorithm. Declaration order breaks
    /// ties, keeping runs deterministic.
    pub fn execution_order(&self) -> Result<Vec<usize>> {
        for (i, spec) in self.specs.iter().enumerate() {
            if self.specs[..i].iter().any(|s| s.name == spec.name) {
                return Err(PipelineError::DuplicateAsset(spec.name.to_string()));
            }
            for dep in spec.deps {
                self.spec(dep)?;
            }
        }

        let mut indegree: Vec<usize> = self.specs.iter().map(|s| s.deps.len()).collect();
        let mut consumed = vec![false; self.specs.len()];
        let mut order = Vec::with_capacity(self.specs.len());
        while order.len() < self.specs.len() {
            let next = (0..self.specs.len()).find(|&i| !consumed[i] && indegree[i] == 0);
            let Some(next) = next else {
                let stuck = (0..self.specs.len())
                    .find(|&i| !consumed[i])
                    .map(|i| self.specs[i].name)
                    .unwrap_or("?");
                return Err(PipelineError::Cycle(stuck.to_string()));
            };
            consumed[next] = true;
            order.push(next);
            for (i, spec) in self.specs.iter().enumerate() {
                if consumed[i] {
                    continue;
                }
                let edges = spec
                    .deps
                    .iter()
                    .filter(|d| **d == self.specs[next].name)
                    .count();
                indegree[i] -= edges;
            }
        }
        Ok(order)
    }

    /// Run the whole chain through `store`.
    pub async fn run(
        &self,
        store: &dyn TableStore,
        config: &PipelineConfig,
        partition: Option<&PartitionKey>,
    ) -> Result<RunSummary> {
        let order = self.execution_order()?;
        self.run_indices(&order, store, config, partition).await
    }

    /// Run one asset and its upstream closure.
    pub async fn materialize(
        &self,
        target: &str,
        store: &dyn TableStore,
        config: &PipelineConfig,
        partition: Option<&PartitionKey>,
    ) -> Result<RunSummary> {
        self.spec(target)?;
        let order = self.execution_order()?;
        let mut wanted = vec![target.to_string()];
        let mut i = 0;
        while i < wanted.len() {
            for dep in self.spec(&wanted[i].clone())?.deps {
                if !wanted.iter().any(|w| w == dep) {
                    wanted.push(dep.to_string());
                }
            }
            i += 1;
        }
        let subset: Vec<usize> = order
            .into_iter()
            .filter(|&i| wanted.iter().any(|w| w == self.specs[i].name))
            .collect();
        self.run_indices(&subset, store, config, partition).await
    }

    async fn run_indices(
        &self,
        order: &[usize],
        store: &dyn TableStore,
        config: &PipelineConfig,
        partition: Option<&PartitionKey>,
    ) -> Result<RunSummary> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let mut materialized = Vec::with_capacity(order.len());

        for &idx in order {
            let spec = &self.specs[idx];
            let key = self.partition_for(spec, config, partition)?;

            let mut inputs = Vec::with_capacity(spec.deps.len());
            for dep in spec.deps {
                let dep_key = self.partition_for(self.spec(dep)?, config, partition)?;
                inputs.push(store.read(dep, dep_key).await?);
            }

            let ctx = AssetContext {
                config,
                partition: key,
            };
            let output = (spec.run)(&ctx, &inputs)?;
            store.write(spec.name, key, &output).await?;

            info!(
                asset = spec.name,
                partition = key.map(|k| k.as_str()),
                rows = output.len(),
                "materialized asset"
            );
            materialized.push(MaterializedAsset {
                name: spec.name.to_string(),
                partition: key.map(|k| k.as_str().to_string()),
                rows: output.len(),
            });
        }

        let summary = RunSummary {
            run_id,
            started_at,
            completed_at: Utc::now(),
            materialized,
        };
        let run_key = PartitionKey::new(run_id.to_string());
        store
            .write(RUNS_TABLE, Some(&run_key), &summary.to_table())
            .await?;
        Ok(summary)
    }

    /// Resolve the partition key an asset materializes under, checking
    /// membership in the configured hourly window.
    fn partition_for<'a>(
        &self,
        spec: &AssetSpec,
        config: &PipelineConfig,
        partition: Option<&'a PartitionKey>,
    ) -> Result<Option<&'a PartitionKey>> {
        match spec.partitioning {
            Partitioning::None => Ok(None),
            Partitioning::Hourly => {
                let key = partition
                    .ok_or_else(|| PipelineError::MissingPartition(spec.name.to_string()))?;
                if !config.partitions.hourly().contains(key) {
                    return Err(PipelineError::InvalidPartition(key.to_string()));
                }
                Ok(Some(key))
            }
        }
    }
}
