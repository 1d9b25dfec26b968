// Daily aggregate snapshot (the persisted unit of the time series) and its
// chart-facing projection

use serde::{Deserialize, Serialize};

use super::{BotSnapshot, LanguageBreakdown};

/// All bots' counters summed for one calendar date, plus the raw per-bot
/// breakdown. `date` is the store's natural key.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DailySnapshot {
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
    /// Aggregation wall clock, epoch seconds.
    pub timestamp: u64,
    /// Calendar date `YYYY-MM-DD` (UTC).
    pub date: String,
    /// Per-bot breakdown in registry order. Empty when the snapshot came from
    /// a remote aggregate rather than a fleet poll.
    pub bots: Vec<BotSnapshot>,
}

/// Names the bot a scoped history query is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotSelector {
    Id(i64),
    Port(u16),
}

impl BotSelector {
    fn matches(&self, bot: &BotSnapshot) -> bool {
        match *self {
            BotSelector::Id(id) => bot.id == id,
            BotSelector::Port(port) => bot.stats_port == port,
        }
    }
}

/// One day reduced to the counters the dashboard growth charts bind to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrowthChartPoint {
    pub date: String,
    pub total: u64,
    pub new_users: u64,
    pub new_groups: u64,
    pub premium_users: u64,
    pub blocked_users: u64,
    pub downloads: u64,
}

impl DailySnapshot {
    /// Chart point built from the fleet-wide aggregate fields.
    pub fn chart_point(&self) -> GrowthChartPoint {
        GrowthChartPoint {
            date: self.date_label(),
            total: self.total,
            new_users: self.new_users,
            new_groups: self.new_groups,
            premium_users: self.premium_users,
            blocked_users: self.blocked_users,
            downloads: self.downloads,
        }
    }

    /// Chart point for a single bot's slice of the day. Days where the bot is
    /// absent fall back to the aggregate values so the chart stays continuous.
    pub fn bot_chart_point(&self, selector: BotSelector) -> GrowthChartPoint {
        match self.bots.iter().find(|b| selector.matches(b)) {
            Some(bot) => GrowthChartPoint {
                date: self.date_label(),
                total: bot.stats.total,
                new_users: bot.stats.new_users,
                new_groups: bot.stats.new_groups,
                premium_users: bot.stats.premium_users,
                blocked_users: bot.stats.blocked_users,
                downloads: bot.stats.downloads,
            },
            None => self.chart_point(),
        }
    }

    /// Axis label for the day. Snapshots persisted before dates were recorded
    /// only carry a timestamp; those render as `DD.MM`.
    fn date_label(&self) -> String {
        if !self.date.is_empty() {
            return self.date.clone();
        }
        chrono::DateTime::from_timestamp(self.timestamp as i64, 0)
            .map(|t| t.format("%d.%m").to_string())
            .unwrap_or_default()
    }
}
