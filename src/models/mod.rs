// Domain models (wire shapes shared with the dashboard and the bot fleet)

mod bot;
mod snapshot;
mod stats;

pub use bot::{BotDescriptor, BotSnapshot};
pub use snapshot::{BotSelector, DailySnapshot, GrowthChartPoint};
pub use stats::{BotStatsPayload, LanguageBreakdown};
