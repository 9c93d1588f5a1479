//! Watchpost - concurrent monitoring engine
//!
//! This library provides the shared-state core of the watchpost monitor:
//! a scheduled health-polling loop with per-endpoint status tracking, a
//! passive packet-observation counter, and a read-only query facade over
//! both. Presentation layers (HTTP front end, dashboards) consume
//! snapshots through [`QueryFacade`] and never mutate engine state.

pub mod capture;
pub mod error;
pub mod poller;
pub mod query;
pub mod registry;
pub mod status;
pub mod telemetry;

// Re-export main types
pub use capture::{DatalinkSource, FrameSource, PacketObserver};
pub use error::{CaptureError, ConfigError, ProbeError};
pub use poller::{HealthPoller, PollerConfig, ProbeTarget};
pub use query::QueryFacade;
pub use registry::ServiceRegistry;
pub use status::{HealthStatus, Indicator, StatusStore};
pub use telemetry::{PacketCounters, TelemetryStore};

/// Re-export common error types
pub use anyhow;

/// Watchpost result type using anyhow for error handling
pub type Result<T> = anyhow::Result<T>;
