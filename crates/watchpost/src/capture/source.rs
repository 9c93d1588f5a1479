//! Frame sources: the seam between the observer and the wire.

use std::time::Duration;

use pnet::datalink::{self, Channel, DataLinkReceiver, NetworkInterface};
use tracing::info;

use crate::error::CaptureError;

/// How long a live read waits before giving the caller a chance to
/// check its deadline and cancellation token.
const READ_TIMEOUT: Duration = Duration::from_millis(200);

/// A source of raw link-layer frames.
///
/// `Ok(None)` means no frame arrived within the source's read timeout;
/// the caller re-checks its deadline before polling again. Only a
/// genuinely broken channel returns an error.
pub trait FrameSource: Send {
    fn next_frame(&mut self) -> Result<Option<Vec<u8>>, CaptureError>;
}

/// Live capture over a datalink channel.
pub struct DatalinkSource {
    rx: Box<dyn DataLinkReceiver>,
}

impl DatalinkSource {
    /// Open a capture handle on the named interface, or on the first
    /// usable non-loopback interface when no name is given.
    ///
    /// Failure here (no privilege, no interface) is the degraded-mode
    /// signal: the host logs it once and leaves observation off.
    pub fn open(interface: Option<&str>) -> Result<Self, CaptureError> {
        let iface = select_interface(interface)?;
        info!(interface = %iface.name, "opening capture channel");

        let config = datalink::Config {
            read_timeout: Some(READ_TIMEOUT),
            promiscuous: true,
            ..datalink::Config::default()
        };

        match datalink::channel(&iface, config) {
            Ok(Channel::Ethernet(_tx, rx)) => Ok(Self { rx }),
            Ok(_) => Err(CaptureError::UnsupportedChannel(iface.name)),
            Err(source) => Err(CaptureError::Open { interface: iface.name, source }),
        }
    }
}

impl FrameSource for DatalinkSource {
    fn next_frame(&mut self) -> Result<Option<Vec<u8>>, CaptureError> {
        match self.rx.next() {
            Ok(frame) => Ok(Some(frame.to_vec())),
            Err(err) => match err.kind() {
                std::io::ErrorKind::TimedOut
                | std::io::ErrorKind::WouldBlock
                | std::io::ErrorKind::Interrupted => Ok(None),
                _ => Err(CaptureError::Read(err)),
            },
        }
    }
}

fn select_interface(name: Option<&str>) -> Result<NetworkInterface, CaptureError> {
    let interfaces = datalink::interfaces();

    match name {
        Some(name) => interfaces
            .into_iter()
            .find(|iface| iface.name == name)
            .ok_or_else(|| CaptureError::UnknownInterface(name.to_string())),
        None => interfaces
            .into_iter()
            .find(|iface| iface.is_up() && !iface.is_loopback() && !iface.ips.is_empty())
            .ok_or(CaptureError::NoInterface),
    }
}
