//! Shared packet counters written by the observer.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Point-in-time copy of the packet counters.
///
/// Counters are monotonically non-decreasing for the life of the
/// process; only a restart resets them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketCounters {
    pub total_packets: u64,
    pub http_requests: u64,
}

/// Singleton counter store shared between the capture loop and readers.
///
/// Writes come from one logical observation loop, reads from any
/// thread at any time. Relaxed ordering is enough: the counters are
/// independent and readers only want a coarse snapshot.
#[derive(Debug, Default)]
pub struct TelemetryStore {
    total_packets: AtomicU64,
    http_requests: AtomicU64,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one observed frame.
    pub fn record_frame(&self, is_http_request: bool) {
        self.total_packets.fetch_add(1, Ordering::Relaxed);
        if is_http_request {
            self.http_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn snapshot(&self) -> PacketCounters {
        PacketCounters {
            total_packets: self.total_packets.load(Ordering::Relaxed),
            http_requests: self.http_requests.load(Ordering::Relaxed),
        }
    }
}
