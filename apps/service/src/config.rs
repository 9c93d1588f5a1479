//! Host configuration: the service table plus optional monitor
//! overrides, layered as compiled-in defaults, then file values, then
//! CLI flags.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use watchpost::{ConfigError, ServiceRegistry};

const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
const DEFAULT_PROBE_TIMEOUT_SECS: u64 = 5;

fn default_listen() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 5000))
}

/// Settings rejected at resolution time, before any task starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SettingsError {
    #[error("poll interval must be at least 1 second")]
    ZeroPollInterval,
    #[error("probe timeout must be at least 1 second")]
    ZeroProbeTimeout,
}

/// Optional `[monitor]` section of the config file.
#[derive(Debug, Default, Deserialize)]
struct MonitorSection {
    poll_interval: Option<u64>,
    probe_timeout: Option<u64>,
    listen: Option<SocketAddr>,
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    monitor: MonitorSection,
}

/// CLI-provided overrides. Highest precedence layer.
#[derive(Debug, Default, Clone, Copy)]
pub struct Overrides {
    pub poll_interval: Option<u64>,
    pub probe_timeout: Option<u64>,
    pub listen: Option<SocketAddr>,
}

/// Fully-resolved runtime settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub poll_interval: Duration,
    pub probe_timeout: Duration,
    pub listen: SocketAddr,
}

/// Parsed config file: the `[services]` table the registry is built
/// from, plus the `[monitor]` overrides.
#[derive(Debug)]
pub struct Config {
    registry: ServiceRegistry,
    monitor: MonitorSection,
}

impl Config {
    /// Read and parse the config file once.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let registry = ServiceRegistry::from_toml_str(&raw).map_err(|source| {
            ConfigError::Parse { path: path.display().to_string(), source }
        })?;
        let file: ConfigFile = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;

        Ok(Self { registry, monitor: file.monitor })
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    /// Resolve settings: defaults, then `[monitor]` values, then CLI
    /// flags. Zero durations are rejected here so the poller never
    /// sees an un-tickable period.
    pub fn resolve(&self, overrides: Overrides) -> Result<Settings, SettingsError> {
        let poll_interval = overrides
            .poll_interval
            .or(self.monitor.poll_interval)
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);
        if poll_interval == 0 {
            return Err(SettingsError::ZeroPollInterval);
        }

        let probe_timeout = overrides
            .probe_timeout
            .or(self.monitor.probe_timeout)
            .unwrap_or(DEFAULT_PROBE_TIMEOUT_SECS);
        if probe_timeout == 0 {
            return Err(SettingsError::ZeroProbeTimeout);
        }

        let listen = overrides
            .listen
            .or(self.monitor.listen)
            .unwrap_or_else(default_listen);

        Ok(Settings {
            poll_interval: Duration::from_secs(poll_interval),
            probe_timeout: Duration::from_secs(probe_timeout),
            listen,
        })
    }
}
