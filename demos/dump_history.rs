// Dump the stored snapshot history as JSON.
//
// Usage: cargo run --example dump_history -- [DATA_PATH] [PERIOD]
//   DATA_PATH  default: ./data/statistics.json
//   PERIOD     7d | 30d | 3m | 1y (default: everything)

use std::env;

use botstatd::snapshot_repo::{HistoryFilter, HistoryPeriod, SnapshotRepo};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args: Vec<String> = env::args().collect();
    let path = args
        .get(1)
        .map(String::as_str)
        .unwrap_or("./data/statistics.json");
    let filter = args
        .get(2)
        .and_then(|s| HistoryPeriod::parse(s))
        .map(HistoryFilter::Period)
        .unwrap_or(HistoryFilter::All);

    let repo = SnapshotRepo::new(path);
    let snapshots = repo.history(&filter).await;

    println!("{}", serde_json::to_string_pretty(&snapshots)?);
    Ok(())
}
