//! Passive traffic observation.
//!
//! The observer classifies each link-layer frame it sees and tallies
//! coarse counters in [`TelemetryStore`](crate::TelemetryStore). It
//! never modifies or drops traffic, and it never parses beyond layer
//! detection.

mod classify;
mod observer;
mod source;

pub use classify::is_http_request;
pub use observer::PacketObserver;
pub use source::{DatalinkSource, FrameSource};
