//! Read-only query port over the shared stores.

use std::collections::HashMap;
use std::sync::Arc;

use crate::status::{HealthStatus, StatusStore};
use crate::telemetry::{PacketCounters, TelemetryStore};

/// Snapshot accessor handed to presentation layers.
///
/// Both operations are side-effect-free and return copies, never live
/// references into the stores. Nothing in the engine depends on this
/// type; it is purely a consumer-facing read port.
#[derive(Clone)]
pub struct QueryFacade {
    statuses: Arc<StatusStore>,
    telemetry: Arc<TelemetryStore>,
}

impl QueryFacade {
    pub fn new(statuses: Arc<StatusStore>, telemetry: Arc<TelemetryStore>) -> Self {
        Self { statuses, telemetry }
    }

    /// Last-known health per registered endpoint URL.
    pub fn statuses(&self) -> HashMap<String, HealthStatus> {
        self.statuses.snapshot()
    }

    /// Current packet counters.
    pub fn packet_stats(&self) -> PacketCounters {
        self.telemetry.snapshot()
    }
}
