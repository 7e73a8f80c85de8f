//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `hometick.toml` in the working directory, or the file named by
//! `HOMETICK_CONFIG`. Every field has a default so the file is optional.
//! Environment variables take precedence over file values.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use hometick_adapter_cli::{NestConfig, PcConfig};
use hometick_adapter_harmony::HarmonyConfig;
use hometick_adapter_hue::HueConfig;
use hometick_adapter_kasa::KasaConfig;
use hometick_app::orchestrator::Schedule;
use hometick_domain::button::ButtonRule;
use hometick_domain::inactivity::InactivityRule;
use hometick_domain::plug_link::PlugLink;
use hometick_domain::reactor::ReactorConfig;
use hometick_domain::topic::TopicTable;
use serde::Deserialize;

const DEFAULT_PATH: &str = "hometick.toml";

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub schedule: ScheduleConfig,
    pub integrations: IntegrationsConfig,

    pub harmony: HarmonyConfig,
    pub hue: HueConfig,
    pub kasa: KasaConfig,
    pub pcs: BTreeMap<String, PcConfig>,
    pub thermostat: NestConfig,

    pub reactors: Vec<ReactorConfig>,
    pub buttons: Vec<ButtonRule>,
    pub inactivity: InactivityConfig,
    pub plug_links: Vec<PlugLink>,
    pub topics: TopicTable,
}

/// Inbound listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    pub port: u16,
    /// Payloads waiting for the poll loop before new ones are dropped.
    pub inbox_capacity: usize,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
    /// Write logs to this file instead of stderr.
    pub file: Option<PathBuf>,
}

/// Poll loop timing. The `*_every` periods count ticks.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ScheduleConfig {
    pub tick_ms: u64,
    pub sensor_every: u64,
    pub activity_every: u64,
    pub heartbeat_every: u64,
    /// Attempts per device call before the error is propagated.
    pub attempts: u32,
    pub thermostat_queue: usize,
    /// How long queued thermostat commands may take on shutdown.
    pub shutdown_grace_secs: u64,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct IntegrationsConfig {
    /// Run against simulated devices instead of the real ones.
    pub virtual_enabled: bool,
}

/// The `[inactivity]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct InactivityConfig {
    /// When set, every motion sensor the bridge links to a group gets a
    /// rule with this timeout, unless listed in `rules`.
    pub discover_timeout_secs: Option<u64>,
    pub rules: Vec<InactivityRule>,
}

impl Config {
    /// Load configuration from the config file (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed, or
    /// if the result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var("HOMETICK_CONFIG").unwrap_or_else(|_| DEFAULT_PATH.to_string());
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_overrides<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = var("HOMETICK_HOST") {
            self.server.host = val;
        }
        if let Some(port) = var("HOMETICK_PORT").and_then(|val| val.parse().ok()) {
            self.server.port = port;
        }
        if let Some(val) = var("HOMETICK_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Some(val) = var("HOMETICK_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        let schedule = &self.schedule;
        for (name, value) in [
            ("tick_ms", schedule.tick_ms),
            ("sensor_every", schedule.sensor_every),
            ("activity_every", schedule.activity_every),
            ("heartbeat_every", schedule.heartbeat_every),
        ] {
            if value == 0 {
                return Err(ConfigError::Validation(format!(
                    "schedule.{name} must be non-zero"
                )));
            }
        }
        if schedule.attempts == 0 {
            return Err(ConfigError::Validation(
                "schedule.attempts must be non-zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

impl ScheduleConfig {
    #[must_use]
    pub fn schedule(&self) -> Schedule {
        Schedule {
            tick: Duration::from_millis(self.tick_ms),
            sensor_every: self.sensor_every,
            activity_every: self.activity_every,
            heartbeat_every: self.heartbeat_every,
        }
    }

    #[must_use]
    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8321,
            inbox_capacity: 64,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "hometickd=info,hometick=info,tower_http=debug".to_string(),
            file: None,
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        let schedule = Schedule::default();
        Self {
            tick_ms: 1000,
            sensor_every: schedule.sensor_every,
            activity_every: schedule.activity_every,
            heartbeat_every: schedule.heartbeat_every,
            attempts: 3,
            thermostat_queue: 16,
            shutdown_grace_secs: 30,
        }
    }
}

impl Default for IntegrationsConfig {
    fn default() -> Self {
        Self {
            virtual_enabled: true,
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    #[error("invalid configuration: {0}")]
    Validation(String),
}
