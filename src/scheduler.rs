// Cron-aligned trigger for the daily collection pass. The next fire time is
// recomputed after every run, so the trigger stays pinned to the wall clock
// instead of drifting the way a free-running 24h interval would.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::snapshot_repo::SnapshotRepo;
use crate::worker::{self, StatsSource};

pub struct DailyScheduler {
    shutdown_tx: oneshot::Sender<()>,
    handle: tokio::task::JoinHandle<()>,
}

impl DailyScheduler {
    /// Spawns the trigger loop. The schedule is evaluated in UTC; config
    /// validation guarantees it parses and yields future fire times.
    pub fn start(
        schedule: cron::Schedule,
        source: Arc<StatsSource>,
        repo: Arc<SnapshotRepo>,
    ) -> Self {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel();
        let handle = tokio::spawn(async move {
            loop {
                let now = Utc::now();
                let Some(next) = next_run_after(&schedule, now) else {
                    // A schedule with no future fire time cannot trigger
                    // anything; check again in an hour.
                    warn!("schedule yields no future run");
                    tokio::time::sleep(Duration::from_secs(3600)).await;
                    continue;
                };
                let delay = (next - now).to_std().unwrap_or(Duration::from_secs(1));
                info!(next_run = %next, "next collection run scheduled");
                tokio::select! {
                    _ = tokio::time::sleep(delay) => {
                        if let Err(e) = worker::run_once(&source, &repo).await {
                            warn!(error = %e, "scheduled collection run failed");
                        }
                    }
                    _ = &mut shutdown_rx => {
                        tracing::debug!("scheduler shutting down");
                        return;
                    }
                }
            }
        });
        Self {
            shutdown_tx,
            handle,
        }
    }

    /// Stops the loop and waits for it to wind down. A collection pass
    /// already in flight finishes first.
    pub async fn stop(self) {
        let _ = self.shutdown_tx.send(());
        let _ = self.handle.await;
    }
}

/// Next fire time strictly after `now`. Today's trigger time already being
/// past rolls the run over to tomorrow.
pub fn next_run_after(schedule: &cron::Schedule, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    schedule.after(&now).next()
}
