//! Capture supervision: re-arms the observer on a fixed cadence.

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use watchpost::{DatalinkSource, PacketObserver};

/// How long each capture pass runs before the handle is re-armed.
const CAPTURE_WINDOW: Duration = Duration::from_secs(60);

/// Run capture passes until shutdown.
///
/// A handle that cannot be opened disables observation for the rest of
/// the process: the failure is logged once and the telemetry counters
/// stay frozen at their last values. The read interface keeps serving
/// them.
pub async fn run_capture(
    observer: PacketObserver,
    interface: Option<String>,
    token: CancellationToken,
) {
    while !token.is_cancelled() {
        let source = match DatalinkSource::open(interface.as_deref()) {
            Ok(source) => source,
            Err(err) => {
                warn!("packet observation disabled: {err}");
                return;
            }
        };

        if let Err(err) = observer.run(source, CAPTURE_WINDOW, token.child_token()).await {
            warn!("packet observation disabled after channel failure: {err}");
            return;
        }
    }
    info!("packet observation stopped");
}
