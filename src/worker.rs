// One collection pass: acquire the day's counters, aggregate, upsert into the
// snapshot store. Scheduling lives in scheduler; run_once stays directly
// callable for tests and manual triggers.

use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use crate::bot_repo::BotRepo;
use crate::models::DailySnapshot;
use crate::snapshot_repo::{SnapshotRepo, aggregation};

/// Where a collection pass gets its numbers from.
pub enum StatsSource {
    /// Poll every registered bot and aggregate the responses here.
    Bots(BotRepo),
    /// Fetch a ready-made aggregate from a remote stats API.
    Remote(RemoteStatsRepo),
}

impl StatsSource {
    async fn acquire(&self) -> Option<DailySnapshot> {
        match self {
            StatsSource::Bots(bots) => {
                let results = bots.poll_all().await;
                let timestamp = Utc::now().timestamp() as u64;
                aggregation::aggregate_bot_stats(&results, timestamp)
            }
            StatsSource::Remote(remote) => remote.fetch().await,
        }
    }
}

pub struct RemoteStatsRepo {
    client: reqwest::Client,
    source_url: String,
}

impl RemoteStatsRepo {
    pub fn new(source_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            source_url: source_url.into(),
        })
    }

    /// One aggregate from the remote API, or None on any failure. Failures
    /// are logged and leave the store untouched, same as a failed fleet poll.
    pub async fn fetch(&self) -> Option<DailySnapshot> {
        let response = match self.client.get(&self.source_url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "remote stats source unreachable");
                return None;
            }
        };
        if !response.status().is_success() {
            warn!(status = %response.status(), "remote stats source refused the request");
            return None;
        }
        let snapshot: DailySnapshot = match response.json().await {
            Ok(s) => s,
            Err(e) => {
                warn!(error = %e, "remote stats source returned an unreadable body");
                return None;
            }
        };
        if !snapshot.ok {
            warn!("remote stats source reported ok=false, skipping save");
            return None;
        }
        Some(snapshot)
    }
}

/// Runs one collection pass: acquire, stamp today's UTC date, upsert. A pass
/// with nothing usable leaves the store byte-identical and returns Ok(None);
/// only the save itself can fail, and the next scheduled run retries it.
pub async fn run_once(
    source: &StatsSource,
    repo: &SnapshotRepo,
) -> anyhow::Result<Option<DailySnapshot>> {
    let mut snapshot = match source.acquire().await {
        Some(s) => s,
        None => {
            warn!(operation = "run_once", "collection pass produced no snapshot");
            return Ok(None);
        }
    };
    snapshot.date = Utc::now().format("%Y-%m-%d").to_string();
    let days = repo.upsert(snapshot.clone()).await?;
    info!(
        date = %snapshot.date,
        total = snapshot.total,
        bots = snapshot.bots.len(),
        days,
        "daily snapshot saved"
    );
    Ok(Some(snapshot))
}
