use serde::Deserialize;
use std::time::Duration;

use crate::collector::AssemblerConfig;
use crate::models::BuildIdentity;
use crate::worker::SchedulerConfig;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub collector: CollectorConfig,
    #[serde(default)]
    pub build: BuildConfig,
    #[serde(default)]
    pub auth: AuthConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CollectorConfig {
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
    /// Gap between the two CPU tick readings of one refresh.
    #[serde(default = "default_cpu_window_ms")]
    pub cpu_window_ms: u64,
    /// Reported when no interface can be read.
    #[serde(default = "default_interface")]
    pub default_interface: String,
    #[serde(default = "default_disk_mount")]
    pub disk_mount: String,
    #[serde(default = "default_stats_log_interval_secs")]
    pub stats_log_interval_secs: u64,
}

fn default_refresh_interval_secs() -> u64 {
    10
}

fn default_cpu_window_ms() -> u64 {
    200
}

fn default_interface() -> String {
    crate::collector::assembler::DEFAULT_INTERFACE.into()
}

fn default_disk_mount() -> String {
    "/".into()
}

fn default_stats_log_interval_secs() -> u64 {
    300
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
            cpu_window_ms: default_cpu_window_ms(),
            default_interface: default_interface(),
            disk_mount: default_disk_mount(),
            stats_log_interval_secs: default_stats_log_interval_secs(),
        }
    }
}

/// Build identity; `BUILD_HASH` / `DEPLOYED_AT` in the environment win over the file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BuildConfig {
    #[serde(default)]
    pub hash: String,
    #[serde(default)]
    pub deployed_at: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfig {
    /// Shared token for protected routes. Unset means every request is allowed.
    pub token: Option<String>,
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading config {}: {}", path, e))?;
        let mut config = Self::load_from_str(&s)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse and validate config from a string (e.g. for tests). No env overrides.
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(hash) = std::env::var("BUILD_HASH") {
            self.build.hash = hash;
        }
        if let Ok(deployed_at) = std::env::var("DEPLOYED_AT") {
            self.build.deployed_at = deployed_at;
        }
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(!self.server.host.is_empty(), "server.host must be non-empty");
        anyhow::ensure!(
            self.collector.refresh_interval_secs > 0,
            "collector.refresh_interval_secs must be > 0, got {}",
            self.collector.refresh_interval_secs
        );
        anyhow::ensure!(
            self.collector.cpu_window_ms > 0,
            "collector.cpu_window_ms must be > 0, got {}",
            self.collector.cpu_window_ms
        );
        anyhow::ensure!(
            self.collector.cpu_window_ms < self.collector.refresh_interval_secs * 1000,
            "collector.cpu_window_ms must be shorter than the refresh interval, got {}",
            self.collector.cpu_window_ms
        );
        anyhow::ensure!(
            !self.collector.default_interface.is_empty(),
            "collector.default_interface must be non-empty"
        );
        anyhow::ensure!(
            !self.collector.disk_mount.is_empty(),
            "collector.disk_mount must be non-empty"
        );
        anyhow::ensure!(
            self.collector.stats_log_interval_secs > 0,
            "collector.stats_log_interval_secs must be > 0, got {}",
            self.collector.stats_log_interval_secs
        );
        if let Some(token) = &self.auth.token {
            anyhow::ensure!(!token.is_empty(), "auth.token must be non-empty when set");
        }
        Ok(())
    }

    pub fn assembler_config(&self) -> AssemblerConfig {
        AssemblerConfig {
            cpu_window: Duration::from_millis(self.collector.cpu_window_ms),
            default_interface: self.collector.default_interface.clone(),
            disk_mount: self.collector.disk_mount.clone(),
            build: BuildIdentity {
                hash: self.build.hash.clone(),
                deployed_at: self.build.deployed_at.clone(),
            },
        }
    }

    pub fn scheduler_config(&self) -> SchedulerConfig {
        SchedulerConfig {
            refresh_interval: Duration::from_secs(self.collector.refresh_interval_secs),
            stats_log_interval: Duration::from_secs(self.collector.stats_log_interval_secs),
        }
    }
}
