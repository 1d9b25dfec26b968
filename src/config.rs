use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub backend: BackendConfig,
    pub stats: StatsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Directory holding the built dashboard bundle served at `/`.
    pub static_dir: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8081,
            static_dir: "dist".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base URL of the bot-management backend (registry plus everything the
    /// `/api` proxy forwards to).
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StatsConfig {
    /// Snapshot history file. Parent directories are created on first save.
    pub data_path: String,
    /// Cron expression (with seconds) for the daily aggregation run, UTC.
    pub schedule: String,
    /// When set, the worker fetches a ready-made aggregate from this URL
    /// instead of polling each bot's stats port.
    pub source_url: Option<String>,
    pub fetch_timeout_secs: u64,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            data_path: "data/statistics.json".into(),
            schedule: "0 55 23 * * *".into(),
            source_url: None,
            fetch_timeout_secs: 10,
        }
    }
}

impl AppConfig {
    /// Load from the file named by `CONFIG_FILE` (default `config.toml`),
    /// then apply `PORT`, `BACKEND_URL` and `STATS_SOURCE_URL` overrides.
    /// A missing config file just means defaults.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let mut config: AppConfig = match std::fs::read_to_string(&path) {
            Ok(s) => toml::from_str(&s)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => AppConfig::default(),
            Err(e) => return Err(e.into()),
        };
        config.apply_env()?;
        config.finish()
    }

    /// Parse and validate config from a string (e.g. for tests). Environment
    /// overrides are not applied.
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.finish()
    }

    fn apply_env(&mut self) -> anyhow::Result<()> {
        if let Ok(raw) = std::env::var("PORT") {
            self.server.port = raw
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a port number, got {raw:?}"))?;
        }
        if let Ok(url) = std::env::var("BACKEND_URL") {
            self.backend.base_url = url;
        }
        if let Ok(url) = std::env::var("STATS_SOURCE_URL") {
            self.stats.source_url = Some(url);
        }
        Ok(())
    }

    fn finish(mut self) -> anyhow::Result<Self> {
        // An empty source_url means "poll the fleet", same as absent.
        if self
            .stats
            .source_url
            .as_deref()
            .is_some_and(|u| u.trim().is_empty())
        {
            self.stats.source_url = None;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            !self.server.static_dir.is_empty(),
            "server.static_dir must be non-empty"
        );
        reqwest::Url::parse(&self.backend.base_url)
            .map_err(|e| anyhow::anyhow!("backend.base_url is not a valid URL: {e}"))?;
        if let Some(url) = self.stats.source_url.as_deref() {
            reqwest::Url::parse(url)
                .map_err(|e| anyhow::anyhow!("stats.source_url is not a valid URL: {e}"))?;
        }
        anyhow::ensure!(
            !self.stats.data_path.is_empty(),
            "stats.data_path must be non-empty"
        );
        anyhow::ensure!(
            self.stats.fetch_timeout_secs > 0,
            "stats.fetch_timeout_secs must be > 0, got {}",
            self.stats.fetch_timeout_secs
        );
        cron::Schedule::from_str(&self.stats.schedule)
            .map_err(|e| anyhow::anyhow!("stats.schedule is not a valid cron expression: {e}"))?;
        Ok(())
    }
}
