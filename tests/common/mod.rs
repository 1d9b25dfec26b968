// Shared test helpers

use botstatd::models::*;

pub fn breakdown(count: u64, ru: u64, en: u64, uz_latin: u64, uz_cyrillic: u64) -> LanguageBreakdown {
    LanguageBreakdown {
        count,
        ru,
        en,
        uz_latin,
        uz_cyrillic,
    }
}

pub fn bot(id: i64, title: &str, port: u16) -> BotDescriptor {
    BotDescriptor {
        id,
        title: title.into(),
        stats_port: port,
    }
}

pub fn payload(total: u64, new_users: u64) -> BotStatsPayload {
    BotStatsPayload {
        ok: true,
        total,
        new_users,
        new_groups: 1,
        premium_users: 2,
        unique_groups: 3,
        blocked_users: 4,
        downloads: 5,
        users: breakdown(total, total / 2, total / 4, total / 8, total / 8),
        groups: breakdown(3, 1, 1, 1, 0),
        unique_users: breakdown(total, total, 0, 0, 0),
        timestamp: 1_700_000_000,
    }
}

pub fn snapshot(date: &str, total: u64) -> DailySnapshot {
    DailySnapshot {
        ok: true,
        total,
        new_users: total / 10,
        timestamp: 1_700_000_000,
        date: date.into(),
        ..DailySnapshot::default()
    }
}
