// GET handlers for the statistics endpoints served locally (never proxied)

use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use super::AppState;
use crate::models::BotSelector;
use crate::snapshot_repo::{HistoryFilter, HistoryPeriod};

/// All params arrive as strings and parse leniently: anything malformed is
/// ignored rather than rejected, so the dashboard always gets an answer.
#[derive(Debug, Deserialize)]
pub(super) struct HistoryParams {
    period: Option<String>,
    from: Option<String>,
    to: Option<String>,
    bot: Option<String>,
    port: Option<String>,
}

/// GET /api/statistics/latest — the most recently stored snapshot; 404 until
/// the first collection pass lands.
pub(super) async fn latest_handler(State(state): State<AppState>) -> Response {
    match state.snapshot_repo.latest().await {
        Some(snapshot) => Json(snapshot).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": "No data yet" })),
        )
            .into_response(),
    }
}

/// GET /api/statistics/history — snapshots for a `period` or a `from`+`to`
/// date range, ascending by date. `bot` (id) or `port` narrows the answer to
/// one bot's chart points.
pub(super) async fn history_handler(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Response {
    let filter = history_filter(&params);
    match bot_selector(&params) {
        Some(selector) => {
            Json(state.snapshot_repo.bot_history(selector, &filter).await).into_response()
        }
        None => Json(state.snapshot_repo.history(&filter).await).into_response(),
    }
}

fn history_filter(params: &HistoryParams) -> HistoryFilter {
    if let (Some(from), Some(to)) = (&params.from, &params.to) {
        return HistoryFilter::Range {
            from: from.clone(),
            to: to.clone(),
        };
    }
    if let Some(period) = params.period.as_deref().and_then(HistoryPeriod::parse) {
        return HistoryFilter::Period(period);
    }
    HistoryFilter::All
}

fn bot_selector(params: &HistoryParams) -> Option<BotSelector> {
    if let Some(id) = params.bot.as_deref().and_then(|s| s.parse().ok()) {
        return Some(BotSelector::Id(id));
    }
    params
        .port
        .as_deref()
        .and_then(|s| s.parse().ok())
        .map(BotSelector::Port)
}
