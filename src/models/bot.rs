// Bot identity as the backend registry lists it, plus the per-bot slice
// stored inside a daily snapshot

use serde::{Deserialize, Serialize};

use super::BotStatsPayload;

/// One pollable bot from the backend registry. Registry entries without a
/// stats port never make it into a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotDescriptor {
    pub id: i64,
    pub title: String,
    #[serde(rename = "statsPort")]
    pub stats_port: u16,
}

/// One bot's contribution to a day, kept verbatim so the dashboard can drill
/// down below the fleet aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotSnapshot {
    pub id: i64,
    pub title: String,
    #[serde(rename = "statsPort")]
    pub stats_port: u16,
    pub stats: BotStatsPayload,
}

impl BotSnapshot {
    pub fn new(bot: &BotDescriptor, stats: BotStatsPayload) -> Self {
        Self {
            id: bot.id,
            title: bot.title.clone(),
            stats_port: bot.stats_port,
            stats,
        }
    }
}
