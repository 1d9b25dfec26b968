// Per-bot usage counters as reported by a bot's local stats endpoint

use serde::{Deserialize, Serialize};

/// Counts partitioned by interface language. The components need not sum to
/// `count`; bots may track locales this breakdown does not list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LanguageBreakdown {
    pub count: u64,
    pub ru: u64,
    pub en: u64,
    #[serde(rename = "uz__lotin")]
    pub uz_latin: u64,
    #[serde(rename = "uz__kiril")]
    pub uz_cyrillic: u64,
}

impl LanguageBreakdown {
    /// Element-wise add, used when folding per-bot breakdowns into the daily
    /// aggregate.
    pub fn add(&mut self, other: &LanguageBreakdown) {
        self.count += other.count;
        self.ru += other.ru;
        self.en += other.en;
        self.uz_latin += other.uz_latin;
        self.uz_cyrillic += other.uz_cyrillic;
    }
}

/// Raw shape returned by `GET /v1/stats` on one bot. Every field defaults so
/// a partial or otherwise malformed payload deserializes with zeros instead
/// of failing the whole poll.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BotStatsPayload {
    pub ok: bool,
    pub total: u64,
    pub new_users: u64,
    pub new_groups: u64,
    pub premium_users: u64,
    pub unique_groups: u64,
    pub blocked_users: u64,
    pub downloads: u64,
    pub users: LanguageBreakdown,
    pub groups: LanguageBreakdown,
    pub unique_users: LanguageBreakdown,
    /// Bot-reported wall clock (epoch seconds); the daily aggregate stamps
    /// its own timestamp instead.
    pub timestamp: u64,
}
