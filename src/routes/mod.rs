// HTTP routes: statistics served locally, the rest of /api proxied to the
// backend, every other path the SPA bundle

mod proxy;
mod static_files;
mod statistics;

use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Router,
    routing::{any, get},
};
use tower_http::cors::{Any, CorsLayer};

use crate::config::AppConfig;
use crate::snapshot_repo::SnapshotRepo;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) snapshot_repo: Arc<SnapshotRepo>,
    pub(crate) proxy_client: reqwest::Client,
    pub(crate) backend_url: String,
    pub(crate) static_dir: PathBuf,
}

pub fn app(snapshot_repo: Arc<SnapshotRepo>, config: &AppConfig) -> Router {
    let state = AppState {
        snapshot_repo,
        // No timeout here: slow backend endpoints (exports, uploads) keep
        // their own pace through the proxy.
        proxy_client: reqwest::Client::new(),
        backend_url: config.backend.base_url.trim_end_matches('/').to_string(),
        static_dir: PathBuf::from(&config.server.static_dir),
    };
    Router::new()
        .route("/api/statistics/latest", get(statistics::latest_handler)) // GET /api/statistics/latest
        .route("/api/statistics/latest/", get(statistics::latest_handler))
        .route("/api/statistics/history", get(statistics::history_handler)) // GET /api/statistics/history
        .route("/api/statistics/history/", get(statistics::history_handler))
        .route("/api", any(proxy::proxy_handler)) // everything else under /api -> backend
        .route("/api/", any(proxy::proxy_handler))
        .route("/api/{*path}", any(proxy::proxy_handler))
        .fallback(static_files::spa_handler) // SPA bundle
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
