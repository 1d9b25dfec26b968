// Folding one poll cycle's per-bot payloads into a single daily aggregate.
// File access (load, save, upsert) stays in snapshot_repo::mod.

use crate::models::{BotDescriptor, BotSnapshot, BotStatsPayload, DailySnapshot};

/// Merges the successful responses of one poll cycle into a daily snapshot.
/// Returns None when no bot responded. `date` is left empty for the caller to
/// stamp. Scalar counters are summed, language breakdowns element-wise; the
/// raw payloads are retained under `bots` in the order given.
pub fn aggregate_bot_stats(
    results: &[(BotDescriptor, BotStatsPayload)],
    timestamp: u64,
) -> Option<DailySnapshot> {
    if results.is_empty() {
        return None;
    }

    let mut snapshot = DailySnapshot {
        ok: true,
        timestamp,
        ..DailySnapshot::default()
    };

    for (bot, stats) in results {
        snapshot.total += stats.total;
        snapshot.new_users += stats.new_users;
        snapshot.new_groups += stats.new_groups;
        snapshot.premium_users += stats.premium_users;
        snapshot.unique_groups += stats.unique_groups;
        snapshot.blocked_users += stats.blocked_users;
        snapshot.downloads += stats.downloads;
        snapshot.users.add(&stats.users);
        snapshot.groups.add(&stats.groups);
        snapshot.unique_users.add(&stats.unique_users);
        snapshot.bots.push(BotSnapshot::new(bot, stats.clone()));
    }

    Some(snapshot)
}
