use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use botstatd::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;

    let snapshot_repo = Arc::new(snapshot_repo::SnapshotRepo::new(&app_config.stats.data_path));
    let timeout = Duration::from_secs(app_config.stats.fetch_timeout_secs);
    let source = Arc::new(match &app_config.stats.source_url {
        Some(url) => worker::StatsSource::Remote(worker::RemoteStatsRepo::new(url, timeout)?),
        None => worker::StatsSource::Bots(bot_repo::BotRepo::new(
            &app_config.backend.base_url,
            timeout,
        )?),
    });

    let schedule = cron::Schedule::from_str(&app_config.stats.schedule)?;
    let scheduler = scheduler::DailyScheduler::start(schedule, source, snapshot_repo.clone());

    let app = routes::app(snapshot_repo, &app_config);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        backend = %app_config.backend.base_url,
        source = %app_config
            .stats
            .source_url
            .as_deref()
            .unwrap_or("bot fleet"),
        "Listening on http://{}",
        addr
    );

    let in_container = std::path::Path::new("/.dockerenv").exists()
        || std::env::var("CONTAINER").as_deref() == Ok("1");

    if in_container {
        // In Docker: run server until error or SIGTERM (no signal handler; avoids immediate exit)
        axum::serve(listener, app).await?;
    } else {
        tokio::select! {
            result = axum::serve(listener, app) => {
                result?;
            }
            _ = async {
                #[cfg(unix)]
                {
                    let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                        Ok(s) => s,
                        Err(_) => {
                            let _ = tokio::signal::ctrl_c().await;
                            return;
                        }
                    };
                    tokio::select! {
                        _ = tokio::signal::ctrl_c() => {}
                        _ = sigterm.recv() => {}
                    }
                }
                #[cfg(not(unix))]
                {
                    tokio::signal::ctrl_c().await
                }
            } => {
                tracing::info!("Received shutdown signal");
                scheduler.stop().await;
            }
        }
    }

    Ok(())
}
