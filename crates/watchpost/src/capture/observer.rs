//! The passive observation loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::classify::is_http_request;
use super::source::FrameSource;
use crate::error::CaptureError;
use crate::telemetry::TelemetryStore;

/// Classifies observed frames and tallies them into the shared
/// telemetry store.
pub struct PacketObserver {
    telemetry: Arc<TelemetryStore>,
}

impl PacketObserver {
    pub fn new(telemetry: Arc<TelemetryStore>) -> Self {
        Self { telemetry }
    }

    /// Count one frame: total unconditionally, the request counter when
    /// the frame classifies as an HTTP request.
    pub fn observe(&self, frame: &[u8]) {
        self.telemetry.record_frame(is_http_request(frame));
    }

    /// Drain `source` until `bound` elapses or `token` fires.
    ///
    /// Returning is not an error; the host re-invokes this on a cadence
    /// to bound the lifetime of the underlying capture handle. The
    /// source reads on a blocking thread so frame waits never stall the
    /// runtime.
    pub async fn run(
        &self,
        mut source: impl FrameSource + 'static,
        bound: Duration,
        token: CancellationToken,
    ) -> Result<(), CaptureError> {
        let telemetry = Arc::clone(&self.telemetry);
        let deadline = Instant::now() + bound;

        let handle = tokio::task::spawn_blocking(move || -> Result<(), CaptureError> {
            while Instant::now() < deadline && !token.is_cancelled() {
                if let Some(frame) = source.next_frame()? {
                    telemetry.record_frame(is_http_request(&frame));
                }
            }
            Ok(())
        });

        match handle.await {
            Ok(result) => {
                debug!("capture pass finished");
                result
            }
            Err(err) => {
                // Join failure means the blocking task panicked; the
                // counters are still valid, so treat the pass as over.
                warn!("capture task did not shut down cleanly: {err}");
                Ok(())
            }
        }
    }
}
