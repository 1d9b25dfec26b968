// SnapshotRepo tests: load, save, upsert, cap, latest, history filtering

mod common;

use botstatd::models::*;
use botstatd::snapshot_repo::{
    cutoff_date, filter_history, HistoryFilter, HistoryPeriod, SnapshotRepo, MAX_SNAPSHOTS,
};
use chrono::{TimeZone, Utc};
use common::{bot, payload, snapshot};
use tempfile::TempDir;

#[tokio::test]
async fn snapshot_repo_load_missing_file_returns_empty() {
    let dir = TempDir::new().unwrap();
    let repo = SnapshotRepo::new(dir.path().join("statistics.json"));

    assert!(repo.load().await.is_empty());
    assert!(repo.latest().await.is_none());
}

#[tokio::test]
async fn snapshot_repo_load_corrupt_file_returns_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("statistics.json");
    tokio::fs::write(&path, b"{not json[").await.unwrap();

    let repo = SnapshotRepo::new(&path);
    assert!(repo.load().await.is_empty());
}

#[tokio::test]
async fn snapshot_repo_save_and_load_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("statistics.json");
    let repo = SnapshotRepo::new(&path);

    let series = vec![
        snapshot("2025-03-01", 10),
        snapshot("2025-03-02", 20),
        snapshot("2025-03-03", 30),
    ];
    repo.save(&series).await.unwrap();

    assert_eq!(repo.load().await, series);

    // Pretty-printed on disk, and the temp file is gone after the rename.
    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(raw.contains("\n  "));
    assert!(!dir.path().join("statistics.json.tmp").exists());
}

#[tokio::test]
async fn snapshot_repo_save_creates_parent_dirs() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data").join("nested").join("statistics.json");
    let repo = SnapshotRepo::new(&path);

    repo.save(&[snapshot("2025-03-01", 10)]).await.unwrap();
    assert_eq!(repo.load().await.len(), 1);
}

#[tokio::test]
async fn snapshot_repo_upsert_appends_then_replaces_in_place() {
    let dir = TempDir::new().unwrap();
    let repo = SnapshotRepo::new(dir.path().join("statistics.json"));

    assert_eq!(repo.upsert(snapshot("2025-03-01", 10)).await.unwrap(), 1);
    assert_eq!(repo.upsert(snapshot("2025-03-02", 20)).await.unwrap(), 2);

    // Re-running the same day overwrites that entry without growing the series
    // or moving it to the end.
    assert_eq!(repo.upsert(snapshot("2025-03-01", 15)).await.unwrap(), 2);

    let series = repo.load().await;
    assert_eq!(series[0].date, "2025-03-01");
    assert_eq!(series[0].total, 15);
    assert_eq!(series[1].date, "2025-03-02");

    let latest = repo.latest().await.unwrap();
    assert_eq!(latest.date, "2025-03-02");
}

#[tokio::test]
async fn snapshot_repo_upsert_evicts_oldest_inserted_past_cap() {
    let dir = TempDir::new().unwrap();
    let repo = SnapshotRepo::new(dir.path().join("statistics.json"));

    // Seed a full store with dates running backwards, so the first-inserted
    // entry carries the newest date. Eviction must go by insertion order,
    // not by date.
    let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let date_at = |i: usize| {
        (start + chrono::Duration::days(i as i64))
            .format("%Y-%m-%d")
            .to_string()
    };
    let full: Vec<DailySnapshot> = (0..MAX_SNAPSHOTS)
        .map(|i| snapshot(&date_at(MAX_SNAPSHOTS - 1 - i), i as u64))
        .collect();
    repo.save(&full).await.unwrap();

    let stored = repo
        .upsert(snapshot(&date_at(MAX_SNAPSHOTS), 999))
        .await
        .unwrap();
    assert_eq!(stored, MAX_SNAPSHOTS);

    let series = repo.load().await;
    assert_eq!(series.len(), MAX_SNAPSHOTS);
    // The first-inserted entry (newest date) fell off the front.
    assert!(!series.iter().any(|s| s.date == date_at(MAX_SNAPSHOTS - 1)));
    // The oldest date survived because it was inserted last in the seed.
    assert!(series.iter().any(|s| s.date == date_at(0)));
    assert_eq!(series.last().unwrap().date, date_at(MAX_SNAPSHOTS));
}

#[tokio::test]
async fn snapshot_repo_latest_is_insertion_order_not_date_order() {
    let dir = TempDir::new().unwrap();
    let repo = SnapshotRepo::new(dir.path().join("statistics.json"));

    repo.save(&[snapshot("2025-03-02", 20), snapshot("2025-03-01", 10)])
        .await
        .unwrap();

    assert_eq!(repo.latest().await.unwrap().date, "2025-03-01");
}

#[test]
fn filter_history_all_sorts_ascending_by_date() {
    let series = vec![
        snapshot("2025-03-03", 30),
        snapshot("2025-03-01", 10),
        snapshot("2025-03-02", 20),
    ];
    let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();

    let dates: Vec<String> = filter_history(series, &HistoryFilter::All, now)
        .iter()
        .map(|s| s.date.clone())
        .collect();
    assert_eq!(dates, vec!["2025-03-01", "2025-03-02", "2025-03-03"]);
}

#[test]
fn filter_history_range_bounds_are_inclusive() {
    let series: Vec<DailySnapshot> = (1..=5)
        .map(|d| snapshot(&format!("2025-03-0{d}"), d as u64 * 10))
        .collect();
    let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();

    let filter = HistoryFilter::Range {
        from: "2025-03-02".into(),
        to: "2025-03-04".into(),
    };
    let dates: Vec<String> = filter_history(series, &filter, now)
        .iter()
        .map(|s| s.date.clone())
        .collect();
    assert_eq!(dates, vec!["2025-03-02", "2025-03-03", "2025-03-04"]);
}

#[test]
fn filter_history_period_keeps_trailing_window() {
    let series = vec![
        snapshot("2025-03-07", 10),
        snapshot("2025-03-08", 20),
        snapshot("2025-03-15", 30),
    ];
    let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();

    let kept = filter_history(series, &HistoryFilter::Period(HistoryPeriod::Week), now);
    let dates: Vec<&str> = kept.iter().map(|s| s.date.as_str()).collect();
    assert_eq!(dates, vec!["2025-03-08", "2025-03-15"]);
}

#[test]
fn cutoff_date_anchors_to_now() {
    let now = Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap();
    assert_eq!(cutoff_date(HistoryPeriod::Week, now), "2025-03-08");
    assert_eq!(cutoff_date(HistoryPeriod::Month, now), "2025-02-13");
    assert_eq!(cutoff_date(HistoryPeriod::Year, now), "2024-03-15");
}

#[test]
fn history_period_parses_dashboard_spellings() {
    assert_eq!(HistoryPeriod::parse("7d"), Some(HistoryPeriod::Week));
    assert_eq!(HistoryPeriod::parse("30d"), Some(HistoryPeriod::Month));
    assert_eq!(HistoryPeriod::parse("3m"), Some(HistoryPeriod::Quarter));
    assert_eq!(HistoryPeriod::parse("1y"), Some(HistoryPeriod::Year));
    assert_eq!(HistoryPeriod::parse("90d"), None);
    assert_eq!(HistoryPeriod::parse(""), None);
}

#[tokio::test]
async fn snapshot_repo_bot_history_projects_per_bot_points() {
    let dir = TempDir::new().unwrap();
    let repo = SnapshotRepo::new(dir.path().join("statistics.json"));

    let day1 = DailySnapshot {
        bots: vec![
            BotSnapshot::new(&bot(1, "alpha", 8101), payload(40, 4)),
            BotSnapshot::new(&bot(2, "beta", 8102), payload(60, 6)),
        ],
        ..snapshot("2025-03-01", 100)
    };
    // Bot 2 missing on day two; its point falls back to the aggregate.
    let day2 = DailySnapshot {
        bots: vec![BotSnapshot::new(&bot(1, "alpha", 8101), payload(45, 5))],
        ..snapshot("2025-03-02", 120)
    };
    repo.save(&[day1, day2]).await.unwrap();

    let points = repo
        .bot_history(BotSelector::Port(8102), &HistoryFilter::All)
        .await;
    assert_eq!(points.len(), 2);
    assert_eq!(points[0].date, "2025-03-01");
    assert_eq!(points[0].total, 60);
    assert_eq!(points[1].date, "2025-03-02");
    assert_eq!(points[1].total, 120);
}
