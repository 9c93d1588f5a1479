//! Error taxonomy for the monitoring engine.
//!
//! Per-probe and per-frame failures are contained at their origin and
//! converted into stored state; only registry loading surfaces an error
//! the host has to act on.

use std::io::Error as IoError;

use thiserror::Error;

/// Failure to load the service registry.
///
/// The host decides what to do with this; the engine never starts a
/// poller without a loaded registry.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read service table {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: IoError,
    },
    #[error("failed to parse service table {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Failure modes of a single probe.
///
/// Never escapes [`HealthPoller::poll_once`](crate::HealthPoller::poll_once):
/// every variant is folded into a stored critical status.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The endpoint answered with a non-2xx status.
    #[error("HTTP error")]
    Status(u16),
    /// Timeout, DNS failure, refused connection, TLS error.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

/// Failure to open or read a live capture handle.
///
/// Non-fatal to the process: the host logs it once and leaves the
/// telemetry counters frozen at their last values.
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("no capture interface named {0}")]
    UnknownInterface(String),
    #[error("no usable capture interface found")]
    NoInterface,
    #[error("failed to open capture channel on {interface}: {source}")]
    Open {
        interface: String,
        #[source]
        source: IoError,
    },
    #[error("capture channel on {0} is not an Ethernet channel")]
    UnsupportedChannel(String),
    #[error("failed to read from capture channel: {0}")]
    Read(#[source] IoError),
}
