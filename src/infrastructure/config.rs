use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use crate::application::series_projector::DEFAULT_LABEL_FORMAT;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

#[derive(Debug, Deserialize, Clone)]
pub struct DashboardConfig {
    pub api: ApiSettings,
    pub refresh: RefreshSettings,
    pub display: DisplaySettings,
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ApiSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RefreshMode {
    /// Fetch only on an explicit trigger.
    Explicit,
    /// Fetch again whenever parameters change, after a debounce.
    Live,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RefreshSettings {
    pub mode: RefreshMode,
    pub debounce_ms: u64,
}

impl RefreshSettings {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct DisplaySettings {
    pub utc_offset_minutes: i32,
    pub label_format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    pub bind: SocketAddr,
}

/// Defaults, then `config/dashboard.*` if present, then `DASHBOARD__*`
/// environment variables (e.g. `DASHBOARD__API__BASE_URL`).
pub fn load_dashboard_config() -> anyhow::Result<DashboardConfig> {
    let builder = with_defaults(config::Config::builder())?
        .add_source(config::File::with_name("config/dashboard").required(false))
        .add_source(
            config::Environment::with_prefix("DASHBOARD")
                .separator("__")
                .try_parsing(true),
        );

    finish(builder.build()?)
}

fn with_defaults(
    builder: config::ConfigBuilder<config::builder::DefaultState>,
) -> anyhow::Result<config::ConfigBuilder<config::builder::DefaultState>> {
    Ok(builder
        .set_default("api.base_url", DEFAULT_BASE_URL)?
        .set_default("refresh.mode", "live")?
        .set_default("refresh.debounce_ms", 300_i64)?
        .set_default("display.utc_offset_minutes", 0_i64)?
        .set_default("display.label_format", DEFAULT_LABEL_FORMAT)?
        .set_default("server.bind", "0.0.0.0:8080")?)
}

fn finish(settings: config::Config) -> anyhow::Result<DashboardConfig> {
    let mut config: DashboardConfig = settings.try_deserialize()?;
    config.api.base_url = normalize_base_url(&config.api.base_url);
    if config.api.base_url.is_empty() {
        anyhow::bail!("api.base_url cannot be empty");
    }
    Ok(config)
}

/// Trim whitespace and trailing slashes so paths can be appended directly.
pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load_from_toml(toml: &str) -> anyhow::Result<DashboardConfig> {
        let builder = with_defaults(config::Config::builder())?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml));
        finish(builder.build()?)
    }

    #[test]
    fn test_defaults() {
        let config = load_from_toml("").unwrap();
        assert_eq!(config.api.base_url, "http://localhost:8000");
        assert_eq!(config.api.timeout(), None);
        assert_eq!(config.refresh.mode, RefreshMode::Live);
        assert_eq!(config.refresh.debounce(), Duration::from_millis(300));
        assert_eq!(config.display.utc_offset_minutes, 0);
        assert_eq!(config.display.label_format, DEFAULT_LABEL_FORMAT);
        assert_eq!(config.server.bind.port(), 8080);
    }

    #[test]
    fn test_overrides() {
        let config = load_from_toml(
            r#"
            [api]
            base_url = "https://metrics.example.com/api/"
            timeout_secs = 15

            [refresh]
            mode = "explicit"

            [display]
            utc_offset_minutes = -480
            "#,
        )
        .unwrap();

        assert_eq!(config.api.base_url, "https://metrics.example.com/api");
        assert_eq!(config.api.timeout(), Some(Duration::from_secs(15)));
        assert_eq!(config.refresh.mode, RefreshMode::Explicit);
        assert_eq!(config.refresh.debounce_ms, 300);
        assert_eq!(config.display.utc_offset_minutes, -480);
    }

    #[test]
    fn test_rejects_unknown_refresh_mode() {
        assert!(load_from_toml("[refresh]\nmode = \"sometimes\"").is_err());
    }

    #[test]
    fn test_rejects_blank_base_url() {
        assert!(load_from_toml("[api]\nbase_url = \" / \"").is_err());
    }

    #[test]
    fn test_normalize_base_url() {
        assert_eq!(normalize_base_url(" http://localhost:8000// "), "http://localhost:8000");
    }
}
