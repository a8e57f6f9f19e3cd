//! End-to-end tests of the fetch-parse-cache pipeline through the public API
//!
//! Uses a local file as the upstream so refreshes and outages can be staged
//! by rewriting or deleting it.

use std::fs;
use std::sync::Arc;

use cfbfeed::clock::ManualClock;
use cfbfeed::data::{FileSource, TransportError};
use cfbfeed::{FeedConfig, FeedError, Record, TableFeed};
use chrono::{Duration, TimeZone, Utc};
use tempfile::TempDir;

fn setup() -> (TempDir, std::path::PathBuf, Arc<ManualClock>) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    let path = dir.path().join("portal.csv");
    let clock = Arc::new(ManualClock::new(
        Utc.with_ymd_and_hms(2025, 4, 12, 12, 0, 0).unwrap(),
    ));
    (dir, path, clock)
}

#[tokio::test]
async fn test_refresh_cycle_with_outage() {
    let (_dir, path, clock) = setup();
    let feed = TableFeed::with_clock(FileSource::new(&path), FeedConfig::default(), clock.clone());

    fs::write(&path, "Program,Conference,Date\nAlabama,SEC,2025-04-12\n").unwrap();
    let first = feed.get_table().await.unwrap();
    assert_eq!(first, vec![Record::new("Alabama", "SEC", "2025-04-12")]);

    // Upstream changes but the cache is still fresh
    fs::write(&path, "Program,Conference,Date\nTexas,SEC,2025-04-19\n").unwrap();
    clock.advance(Duration::minutes(2));
    assert_eq!(feed.get_table().await.unwrap(), first);

    // Window expires: the new table is picked up
    clock.advance(Duration::minutes(3));
    let second = feed.get_table().await.unwrap();
    assert_eq!(second, vec![Record::new("Texas", "SEC", "2025-04-19")]);

    // Upstream disappears: the last good table is served
    fs::remove_file(&path).unwrap();
    clock.advance(Duration::hours(1));
    assert_eq!(feed.get_table().await.unwrap(), second);
    assert!(!feed.is_fresh());
}

#[tokio::test]
async fn test_cold_start_outage_fails() {
    let (_dir, path, clock) = setup();
    let feed = TableFeed::with_clock(FileSource::new(&path), FeedConfig::default(), clock);

    let err = feed.get_table().await.unwrap_err();

    assert!(matches!(
        err,
        FeedError::UpstreamUnavailable(TransportError::Io(_))
    ));
}

#[tokio::test]
async fn test_malformed_rows_degrade_silently() {
    let (_dir, path, clock) = setup();
    let feed = TableFeed::with_clock(FileSource::new(&path), FeedConfig::default(), clock);
    fs::write(
        &path,
        "Program,Conference,Date\n\
         \"Unclosed, quote,SEC\n\
         ,,\n\
         Ohio State\n\
         \"Miami, FL\",ACC,2025-04-12,extra\n",
    )
    .unwrap();

    let response = feed.get_response().await.unwrap();

    assert_eq!(
        response.data,
        vec![
            Record::new("Unclosed, quote,SEC", "", ""),
            Record::new("Ohio State", "", ""),
            Record::new("Miami, FL", "ACC", "2025-04-12"),
        ]
    );
}

#[tokio::test]
async fn test_concurrent_callers_see_same_table() {
    let (_dir, path, clock) = setup();
    fs::write(&path, "Program,Conference,Date\nLSU,SEC,2025-04-12\n").unwrap();
    let feed = Arc::new(TableFeed::with_clock(
        FileSource::new(&path),
        FeedConfig::default(),
        clock,
    ));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let feed = feed.clone();
            tokio::spawn(async move { feed.get_table().await })
        })
        .collect();

    for handle in handles {
        let records = handle.await.unwrap().unwrap();
        assert_eq!(records, vec![Record::new("LSU", "SEC", "2025-04-12")]);
    }
    assert!(feed.last_refreshed().is_some());
}
