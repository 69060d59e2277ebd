//! End-to-end tests for the four-step chain against both store backends.

use std::collections::HashSet;
use std::io::Write;
use std::path::PathBuf;

use tempfile::TempDir;

use clickflow::assets::{ARTICLES_TABLE, CLICKS_TABLE, DAILY_PARTITIONED, JOINED_DATA};
use clickflow::config::PipelineConfig;
use clickflow::partition::PartitionKey;
use clickflow::pipeline::Pipeline;
use clickflow::storage::{FileStore, MemoryStore, TableStore};
use clickflow::table::Value;
use clickflow::PipelineError;

const CLICKS_CSV: &str = "\
user_id,session_id,session_start,session_size,click_article_id,click_timestamp,click_environment,click_deviceGroup,click_os,click_country,click_region,click_referrer_type
1,1001,2025-01-01 10:00:00,3,101,2025-01-01 10:05:00,web,smartphone,Android,US,CA,search
2,1002,2025-01-01 11:00:00,4,102,2025-01-01 11:10:00,mobile,tablet,iOS,IN,NY,social
";

const ARTICLES_CSV: &str = "\
article_id,category_id,created_at_ts,publisher_id,words_count
101,1,2025-01-01 09:00:00,501,1000
102,2,2025-01-01 09:30:00,502,1500
";

struct Fixture {
    dir: TempDir,
    config: PipelineConfig,
}

fn fixture(clicks_csv: &str, articles_csv: &str) -> Fixture {
    let dir = TempDir::new().unwrap();
    let write = |name: &str, content: &str| -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        path
    };
    let config = PipelineConfig {
        clicks_path: write("clicks.csv", clicks_csv),
        articles_path: write("articles_metadata.csv", articles_csv),
        ..PipelineConfig::default()
    };
    Fixture { dir, config }
}

fn hour_key(s: &str) -> PartitionKey {
    PartitionKey::new(s)
}

#[tokio::test]
async fn full_chain_materializes_all_four_assets() {
    let fx = fixture(CLICKS_CSV, ARTICLES_CSV);
    let store = MemoryStore::new();
    let key = hour_key("1970-01-01 00:00:00");

    let summary = Pipeline::standard()
        .run(&store, &fx.config, Some(&key))
        .await
        .unwrap();

    let names: Vec<&str> = summary
        .materialized
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(
        names,
        [CLICKS_TABLE, ARTICLES_TABLE, JOINED_DATA, DAILY_PARTITIONED]
    );

    assert!(store.exists(CLICKS_TABLE, Some(&key)).await.unwrap());
    assert!(store.exists(ARTICLES_TABLE, None).await.unwrap());
    assert!(store.exists(JOINED_DATA, None).await.unwrap());
    assert!(store.exists(DAILY_PARTITIONED, None).await.unwrap());
}

#[tokio::test]
async fn join_output_carries_combined_columns_without_duplicate_key() {
    let fx = fixture(CLICKS_CSV, ARTICLES_CSV);
    let store = MemoryStore::new();
    let key = hour_key("1970-01-01 00:00:00");

    Pipeline::standard()
        .run(&store, &fx.config, Some(&key))
        .await
        .unwrap();

    let joined = store.read(JOINED_DATA, None).await.unwrap();
    assert_eq!(joined.len(), 2);
    assert_eq!(
        joined.columns(),
        [
            "user_id",
            "session_id",
            "session_start",
            "session_size",
            "click_article_id",
            "click_timestamp",
            "click_environment",
            "click_deviceGroup",
            "click_os",
            "click_country",
            "click_region",
            "click_referrer_type",
            "hour_partition",
            "category_id",
            "created_at_ts",
            "publisher_id",
            "words_count",
        ]
    );
    // no null-filled rows from non-matches
    for row in joined.rows() {
        assert!(row.iter().all(|v| !v.is_null()));
    }
}

#[tokio::test]
async fn unmatched_clicks_are_dropped_from_the_join() {
    let extra = format!(
        "{CLICKS_CSV}3,1003,2025-01-01 12:00:00,1,999,2025-01-01 12:01:00,web,desktop,Linux,DE,BE,direct\n"
    );
    let fx = fixture(&extra, ARTICLES_CSV);
    let store = MemoryStore::new();
    let key = hour_key("1970-01-01 00:00:00");

    Pipeline::standard()
        .run(&store, &fx.config, Some(&key))
        .await
        .unwrap();

    let joined = store.read(JOINED_DATA, None).await.unwrap();
    assert_eq!(joined.len(), 2);
    let key_idx = 4; // click_article_id
    for row in joined.rows() {
        assert_ne!(row[key_idx], Value::Int(999));
    }
}

#[tokio::test]
async fn daily_view_has_one_tag_per_calendar_date() {
    let fx = fixture(CLICKS_CSV, ARTICLES_CSV);
    let store = MemoryStore::new();
    let key = hour_key("1970-01-01 00:00:00");

    Pipeline::standard()
        .run(&store, &fx.config, Some(&key))
        .await
        .unwrap();

    let daily = store.read(DAILY_PARTITIONED, None).await.unwrap();
    assert_eq!(daily.len(), 2);
    let days: HashSet<String> = (0..daily.len())
        .map(|i| daily.cell(i, "day_partition").unwrap().render())
        .collect();
    // both sample clicks fall on 2025-01-01
    assert_eq!(days.len(), 1);
    assert!(days.contains("2025-01-01"));
}

#[tokio::test]
async fn unparseable_timestamp_aborts_before_any_write() {
    let bad = CLICKS_CSV.replace("2025-01-01 10:05:00", "not-a-date");
    let fx = fixture(&bad, ARTICLES_CSV);
    let store = MemoryStore::new();
    let key = hour_key("1970-01-01 00:00:00");

    let err = Pipeline::standard()
        .run(&store, &fx.config, Some(&key))
        .await
        .unwrap_err();

    assert!(err.is_parse());
    assert!(!store.exists(CLICKS_TABLE, Some(&key)).await.unwrap());
    assert!(store.list_tables().await.unwrap().is_empty());
}

#[tokio::test]
async fn partition_key_outside_the_window_is_rejected() {
    let fx = fixture(CLICKS_CSV, ARTICLES_CSV);
    let store = MemoryStore::new();
    // the default window is the first week of 1970
    let key = hour_key("1999-01-01 00:00:00");

    let err = Pipeline::standard()
        .run(&store, &fx.config, Some(&key))
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::InvalidPartition(_)));
}

#[tokio::test]
async fn missing_partition_key_is_rejected() {
    let fx = fixture(CLICKS_CSV, ARTICLES_CSV);
    let store = MemoryStore::new();

    let err = Pipeline::standard()
        .run(&store, &fx.config, None)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::MissingPartition(_)));
}

#[tokio::test]
async fn reruns_persist_byte_identical_tables() {
    let mut fx = fixture(CLICKS_CSV, ARTICLES_CSV);
    let tables_dir = fx.dir.path().join("tables");
    fx.config.storage.base_dir = tables_dir.clone();
    let store = FileStore::new(&tables_dir).await.unwrap();
    let key = hour_key("1970-01-01 02:00:00");

    let clicks_file = tables_dir
        .join(CLICKS_TABLE)
        .join("1970-01-01_02-00-00.json");

    Pipeline::standard()
        .run(&store, &fx.config, Some(&key))
        .await
        .unwrap();
    let first = std::fs::read(&clicks_file).unwrap();

    Pipeline::standard()
        .run(&store, &fx.config, Some(&key))
        .await
        .unwrap();
    let second = std::fs::read(&clicks_file).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn materialize_runs_only_the_upstream_closure() {
    let fx = fixture(CLICKS_CSV, ARTICLES_CSV);
    let store = MemoryStore::new();
    let key = hour_key("1970-01-01 00:00:00");

    let summary = Pipeline::standard()
        .materialize(JOINED_DATA, &store, &fx.config, Some(&key))
        .await
        .unwrap();

    let names: HashSet<&str> = summary
        .materialized
        .iter()
        .map(|m| m.name.as_str())
        .collect();
    assert_eq!(
        names,
        HashSet::from([CLICKS_TABLE, ARTICLES_TABLE, JOINED_DATA])
    );
    assert!(!store.exists(DAILY_PARTITIONED, None).await.unwrap());
}

#[tokio::test]
async fn materialize_unknown_asset_fails() {
    let fx = fixture(CLICKS_CSV, ARTICLES_CSV);
    let store = MemoryStore::new();

    let err = Pipeline::standard()
        .materialize("ghost", &store, &fx.config, None)
        .await
        .unwrap_err();
    assert!(matches!(err, PipelineError::UnknownAsset(_)));
}

#[tokio::test]
async fn run_summary_is_persisted_through_the_store() {
    let fx = fixture(CLICKS_CSV, ARTICLES_CSV);
    let store = MemoryStore::new();
    let key = hour_key("1970-01-01 00:00:00");

    let summary = Pipeline::standard()
        .run(&store, &fx.config, Some(&key))
        .await
        .unwrap();

    let run_key = PartitionKey::new(summary.run_id.to_string());
    let runs = store.read("_runs", Some(&run_key)).await.unwrap();
    assert_eq!(runs.len(), 4);
}

#[tokio::test]
async fn hour_tag_floors_the_click_timestamp() {
    let fx = fixture(CLICKS_CSV, ARTICLES_CSV);
    let store = MemoryStore::new();
    let key = hour_key("1970-01-01 00:00:00");

    Pipeline::standard()
        .run(&store, &fx.config, Some(&key))
        .await
        .unwrap();

    let clicks = store.read(CLICKS_TABLE, Some(&key)).await.unwrap();
    assert_eq!(
        clicks.cell(0, "hour_partition").unwrap().render(),
        "2025-01-01 10:00:00"
    );
    assert_eq!(
        clicks.cell(1, "hour_partition").unwrap().render(),
        "2025-01-01 11:00:00"
    );
}
