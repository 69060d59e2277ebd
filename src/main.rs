use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use clickflow::config::PipelineConfig;
use clickflow::partition::PartitionKey;
use clickflow::pipeline::Pipeline;
use clickflow::storage::StorageFactory;

/// Join click events with article metadata into hourly and daily views
#[derive(Parser)]
#[command(name = "clickflow")]
#[command(about = "Dataflow pipeline over click events and article metadata", long_about = None)]
struct Cli {
    /// Enable verbose output (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to configuration file (default: clickflow.toml if present)
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full four-step chain
    Run {
        /// Hourly partition key for the clicks asset, e.g. "1970-01-01 03:00:00"
        #[arg(short, long)]
        partition: String,

        /// Override the clicks CSV path
        #[arg(long)]
        clicks: Option<PathBuf>,

        /// Override the articles CSV path
        #[arg(long)]
        articles: Option<PathBuf>,

        /// Override the storage base directory
        #[arg(long)]
        storage_dir: Option<PathBuf>,
    },
    /// Run a single asset and its upstream dependencies
    Materialize {
        /// Asset name (clicks_table, articles_table, joined_data, daily_partitioned)
        asset: String,

        /// Hourly partition key, required when the closure includes clicks_table
        #[arg(short, long)]
        partition: Option<String>,
    },
    /// List the hourly partition keys of the configured window
    Partitions,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_target(cli.verbose >= 2)
        .init();

    debug!("clickflow started with verbosity level: {}", cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = PipelineConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Run {
            partition,
            clicks,
            articles,
            storage_dir,
        } => {
            if let Some(path) = clicks {
                config.clicks_path = path;
            }
            if let Some(path) = articles {
                config.articles_path = path;
            }
            if let Some(dir) = storage_dir {
                config.storage.base_dir = dir;
            }

            let store = StorageFactory::from_config(&config.storage).await?;
            let key = PartitionKey::new(partition);
            let summary = Pipeline::standard()
                .run(store.as_ref(), &config, Some(&key))
                .await?;

            println!("✅ Run {} completed", summary.run_id);
            for asset in &summary.materialized {
                match &asset.partition {
                    Some(p) => println!("  {} [{}] - {} rows", asset.name, p, asset.rows),
                    None => println!("  {} - {} rows", asset.name, asset.rows),
                }
            }
        }
        Commands::Materialize { asset, partition } => {
            let store = StorageFactory::from_config(&config.storage).await?;
            let key = partition.map(PartitionKey::new);
            let summary = Pipeline::standard()
                .materialize(&asset, store.as_ref(), &config, key.as_ref())
                .await?;

            println!("✅ Materialized {} asset(s)", summary.materialized.len());
            for asset in &summary.materialized {
                println!("  {} - {} rows", asset.name, asset.rows);
            }
        }
        Commands::Partitions => {
            for key in config.partitions.hourly().keys() {
                println!("{key}");
            }
        }
    }

    Ok(())
}
