// JSON-document snapshot history. The whole series lives in one pretty-printed
// array; saves go through a temp file and rename so readers never observe a
// torn file.

pub mod aggregation;

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::instrument;

use crate::models::{BotSelector, DailySnapshot, GrowthChartPoint};

/// Most recent entries kept; older ones fall off the front in insertion order.
pub const MAX_SNAPSHOTS: usize = 400;

/// Trailing window a history query may ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryPeriod {
    Week,
    Month,
    Quarter,
    Year,
}

impl HistoryPeriod {
    /// Query-string spelling used by the dashboard.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "7d" => Some(HistoryPeriod::Week),
            "30d" => Some(HistoryPeriod::Month),
            "3m" => Some(HistoryPeriod::Quarter),
            "1y" => Some(HistoryPeriod::Year),
            _ => None,
        }
    }

    pub fn days(self) -> i64 {
        match self {
            HistoryPeriod::Week => 7,
            HistoryPeriod::Month => 30,
            HistoryPeriod::Quarter => 90,
            HistoryPeriod::Year => 365,
        }
    }
}

/// Which slice of the series a history query selects.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum HistoryFilter {
    /// Everything, oldest date first.
    #[default]
    All,
    /// Inclusive date-string bounds; both must be present to take effect.
    Range { from: String, to: String },
    /// Entries no older than the period's cutoff, anchored to now.
    Period(HistoryPeriod),
}

pub struct SnapshotRepo {
    path: PathBuf,
    // Serializes load-modify-save cycles; plain readers go straight to the
    // file and rely on the atomic rename in save().
    write_lock: Mutex<()>,
}

impl SnapshotRepo {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the full series in insertion order. A missing, unreadable or
    /// corrupt file yields an empty series so the history endpoints keep
    /// answering while collection recovers.
    pub async fn load(&self) -> Vec<DailySnapshot> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "snapshot file unreadable, serving empty history");
                return Vec::new();
            }
        };
        match serde_json::from_slice(&raw) {
            Ok(snapshots) => snapshots,
            Err(e) => {
                tracing::warn!(error = %e, path = %self.path.display(), "snapshot file corrupt, serving empty history");
                Vec::new()
            }
        }
    }

    /// Writes the whole series as pretty-printed JSON. The bytes go to a
    /// sibling temp file, get fsynced, then renamed over the target, so a
    /// crash mid-write cannot truncate existing history.
    #[instrument(skip(self, snapshots), fields(repo = "snapshot", operation = "save", count = snapshots.len()))]
    pub async fn save(&self, snapshots: &[DailySnapshot]) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(snapshots)?;
        let tmp = self.path.with_extension("json.tmp");
        let mut file = tokio::fs::File::create(&tmp).await?;
        file.write_all(&json).await?;
        file.sync_all().await?;
        drop(file);
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    /// Replaces the entry carrying the same `date` or appends, then drops the
    /// oldest entries past the cap. The load-modify-save cycle runs under a
    /// lock so a manual run racing the scheduled one cannot interleave.
    /// Returns the stored length.
    #[instrument(skip(self, snapshot), fields(repo = "snapshot", operation = "upsert", date = %snapshot.date))]
    pub async fn upsert(&self, snapshot: DailySnapshot) -> anyhow::Result<usize> {
        let _guard = self.write_lock.lock().await;
        let mut snapshots = self.load().await;
        match snapshots.iter_mut().find(|s| s.date == snapshot.date) {
            Some(slot) => *slot = snapshot,
            None => snapshots.push(snapshot),
        }
        if snapshots.len() > MAX_SNAPSHOTS {
            let excess = snapshots.len() - MAX_SNAPSHOTS;
            snapshots.drain(..excess);
        }
        self.save(&snapshots).await?;
        Ok(snapshots.len())
    }

    /// Most recently inserted snapshot; None while the store is empty.
    pub async fn latest(&self) -> Option<DailySnapshot> {
        self.load().await.pop()
    }

    /// Snapshots matching the filter, sorted ascending by date.
    #[instrument(skip(self), fields(repo = "snapshot", operation = "history"))]
    pub async fn history(&self, filter: &HistoryFilter) -> Vec<DailySnapshot> {
        filter_history(self.load().await, filter, Utc::now())
    }

    /// Per-day chart points for a single bot over the filtered range. Days
    /// where the bot is absent project from the aggregate instead.
    pub async fn bot_history(
        &self,
        selector: BotSelector,
        filter: &HistoryFilter,
    ) -> Vec<GrowthChartPoint> {
        self.history(filter)
            .await
            .iter()
            .map(|s| s.bot_chart_point(selector))
            .collect()
    }
}

/// Applies a history filter and sorts ascending by date string. Dates are ISO
/// `YYYY-MM-DD`, so lexicographic order is chronological. `now` anchors
/// period cutoffs.
pub fn filter_history(
    mut snapshots: Vec<DailySnapshot>,
    filter: &HistoryFilter,
    now: DateTime<Utc>,
) -> Vec<DailySnapshot> {
    match filter {
        HistoryFilter::All => {}
        HistoryFilter::Range { from, to } => {
            snapshots.retain(|s| s.date >= *from && s.date <= *to);
        }
        HistoryFilter::Period(period) => {
            let cutoff = cutoff_date(*period, now);
            snapshots.retain(|s| s.date >= cutoff);
        }
    }
    snapshots.sort_by(|a, b| a.date.cmp(&b.date));
    snapshots
}

/// Oldest date (inclusive) a period keeps, `YYYY-MM-DD`.
pub fn cutoff_date(period: HistoryPeriod, now: DateTime<Utc>) -> String {
    (now - chrono::Duration::days(period.days()))
        .format("%Y-%m-%d")
        .to_string()
}
