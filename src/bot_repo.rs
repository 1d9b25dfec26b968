// Bot fleet access over HTTP: the backend registry listing and the per-bot
// stats endpoints on localhost ports

use std::time::Duration;

use tracing::warn;

use crate::models::{BotDescriptor, BotStatsPayload};

/// Why a single bot's poll yielded nothing. Always tolerated; the variant
/// only shapes the log line.
#[derive(Debug, thiserror::Error)]
pub enum BotFetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("stats endpoint answered {0}")]
    Status(reqwest::StatusCode),
    #[error("stats payload reported ok=false")]
    NotOk,
}

pub struct BotRepo {
    client: reqwest::Client,
    backend_url: String,
}

impl BotRepo {
    /// `timeout` bounds every request this repo makes, so one hung bot costs
    /// at most the timeout instead of stalling the whole cycle.
    pub fn new(backend_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            backend_url: backend_url.into(),
        })
    }

    /// Bots currently registered with the backend that expose a stats port.
    /// A registry outage degrades to an empty list so the collection pass
    /// becomes a no-op instead of an error.
    pub async fn list_active_bots(&self) -> Vec<BotDescriptor> {
        let url = format!("{}/bots/", self.backend_url.trim_end_matches('/'));
        let response = match self.client.get(&url).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "bot registry unreachable, skipping cycle");
                return Vec::new();
            }
        };
        if !response.status().is_success() {
            warn!(status = %response.status(), "bot registry refused the listing");
            return Vec::new();
        }
        let body: serde_json::Value = match response.json().await {
            Ok(v) => v,
            Err(e) => {
                warn!(error = %e, "bot registry returned an unreadable body");
                return Vec::new();
            }
        };
        registry_items(&body)
            .iter()
            .filter_map(descriptor_from_registry)
            .collect()
    }

    /// One bot's counters, or None on any failure (connect, timeout, non-2xx,
    /// bad JSON, `ok: false`). Failures are logged and never abort the cycle.
    pub async fn fetch_bot_stats(&self, bot: &BotDescriptor) -> Option<BotStatsPayload> {
        match self.try_fetch_stats(bot).await {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(bot = %bot.title, port = bot.stats_port, error = %e, "bot stats poll failed");
                None
            }
        }
    }

    async fn try_fetch_stats(&self, bot: &BotDescriptor) -> Result<BotStatsPayload, BotFetchError> {
        let url = format!("http://127.0.0.1:{}/v1/stats", bot.stats_port);
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(BotFetchError::Status(response.status()));
        }
        let stats: BotStatsPayload = response.json().await?;
        if !stats.ok {
            return Err(BotFetchError::NotOk);
        }
        Ok(stats)
    }

    /// Lists the registry and polls each bot in order. Only successful polls
    /// make it into the result; order follows the registry.
    pub async fn poll_all(&self) -> Vec<(BotDescriptor, BotStatsPayload)> {
        let bots = self.list_active_bots().await;
        let mut results = Vec::with_capacity(bots.len());
        for bot in bots {
            if let Some(stats) = self.fetch_bot_stats(&bot).await {
                results.push((bot, stats));
            }
        }
        results
    }
}

/// The registry has answered with a bare array, `{"results": [...]}` and
/// `{"data": [...]}` across backend versions. All three normalize here; any
/// other shape means no bots.
fn registry_items(body: &serde_json::Value) -> &[serde_json::Value] {
    if let Some(items) = body.as_array() {
        return items;
    }
    for key in ["results", "data"] {
        if let Some(items) = body.get(key).and_then(|v| v.as_array()) {
            return items;
        }
    }
    &[]
}

/// One registry item to a pollable descriptor. Items without a usable stats
/// port are dropped. Ids arrive as numbers or numeric strings depending on
/// the backend version; `title` falls back to `username`.
fn descriptor_from_registry(item: &serde_json::Value) -> Option<BotDescriptor> {
    let id = item.get("id").and_then(|v| {
        v.as_i64()
            .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
    })?;
    let port = item.get("request_port").and_then(|v| v.as_u64())?;
    let port = u16::try_from(port).ok().filter(|p| *p > 0)?;
    let title = non_empty_str(item, "title")
        .or_else(|| non_empty_str(item, "username"))
        .unwrap_or_default()
        .to_string();
    Some(BotDescriptor {
        id,
        title,
        stats_port: port,
    })
}

fn non_empty_str<'a>(item: &'a serde_json::Value, key: &str) -> Option<&'a str> {
    item.get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
}
