//! Packet observer tests with synthetic frames.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pnet::packet::ethernet::{EtherTypes, MutableEthernetPacket};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::MutableIpv4Packet;
use pnet::packet::tcp::MutableTcpPacket;
use tokio_util::sync::CancellationToken;
use watchpost::{CaptureError, FrameSource, PacketObserver, TelemetryStore};

const ETH_HEADER: usize = 14;
const IPV4_HEADER: usize = 20;
const TCP_HEADER: usize = 20;

/// Ethernet/IPv4/TCP frame with the given segment payload.
fn tcp_frame(payload: &[u8]) -> Vec<u8> {
    let ip_len = IPV4_HEADER + TCP_HEADER + payload.len();
    let mut buf = vec![0u8; ETH_HEADER + ip_len];

    {
        let mut eth = MutableEthernetPacket::new(&mut buf).unwrap();
        eth.set_ethertype(EtherTypes::Ipv4);
    }
    {
        let mut ip = MutableIpv4Packet::new(&mut buf[ETH_HEADER..]).unwrap();
        ip.set_version(4);
        ip.set_header_length(5);
        ip.set_total_length(ip_len as u16);
        ip.set_next_level_protocol(IpNextHeaderProtocols::Tcp);
        ip.set_source("10.0.0.1".parse().unwrap());
        ip.set_destination("10.0.0.2".parse().unwrap());
    }
    {
        let mut tcp = MutableTcpPacket::new(&mut buf[ETH_HEADER + IPV4_HEADER..]).unwrap();
        tcp.set_source(49152);
        tcp.set_destination(80);
        tcp.set_data_offset(5);
        tcp.set_payload(payload);
    }

    buf
}

fn http_request_frame() -> Vec<u8> {
    tcp_frame(b"GET /status HTTP/1.1\r\nHost: example.com\r\n\r\n")
}

fn http_response_frame() -> Vec<u8> {
    tcp_frame(b"HTTP/1.1 200 OK\r\nContent-Length: 0\r\n\r\n")
}

fn udp_frame() -> Vec<u8> {
    let payload = b"GET / HTTP/1.1\r\n";
    let ip_len = IPV4_HEADER + 8 + payload.len();
    let mut buf = vec![0u8; ETH_HEADER + ip_len];
    {
        let mut eth = MutableEthernetPacket::new(&mut buf).unwrap();
        eth.set_ethertype(EtherTypes::Ipv4);
    }
    {
        let mut ip = MutableIpv4Packet::new(&mut buf[ETH_HEADER..]).unwrap();
        ip.set_version(4);
        ip.set_header_length(5);
        ip.set_total_length(ip_len as u16);
        ip.set_next_level_protocol(IpNextHeaderProtocols::Udp);
        ip.set_source("10.0.0.1".parse().unwrap());
        ip.set_destination("10.0.0.2".parse().unwrap());
    }
    buf
}

#[test]
fn observe_classifies_request_frames_only() {
    let telemetry = Arc::new(TelemetryStore::new());
    let observer = PacketObserver::new(Arc::clone(&telemetry));

    observer.observe(&http_request_frame());
    observer.observe(&http_response_frame());
    observer.observe(&udp_frame());
    observer.observe(&[0u8; 32]);

    let counters = telemetry.snapshot();
    assert_eq!(counters.total_packets, 4);
    assert_eq!(counters.http_requests, 1);
}

#[tokio::test]
async fn concurrent_producers_lose_no_updates() {
    const PRODUCERS: usize = 8;
    const FRAMES_EACH: usize = 200;

    let telemetry = Arc::new(TelemetryStore::new());
    let observer = Arc::new(PacketObserver::new(Arc::clone(&telemetry)));

    let mut tasks = Vec::new();
    for _ in 0..PRODUCERS {
        let observer = Arc::clone(&observer);
        tasks.push(tokio::task::spawn_blocking(move || {
            let request = http_request_frame();
            let response = http_response_frame();
            for i in 0..FRAMES_EACH {
                if i % 2 == 0 {
                    observer.observe(&request);
                } else {
                    observer.observe(&response);
                }
            }
        }));
    }
    for task in tasks {
        task.await.unwrap();
    }

    let counters = telemetry.snapshot();
    assert_eq!(counters.total_packets, (PRODUCERS * FRAMES_EACH) as u64);
    assert_eq!(counters.http_requests, (PRODUCERS * FRAMES_EACH / 2) as u64);
}

/// Feeds a fixed script of frames, then reports an idle channel.
struct ScriptedSource {
    frames: VecDeque<Vec<u8>>,
    fail_when_drained: bool,
}

impl ScriptedSource {
    fn new(frames: Vec<Vec<u8>>) -> Self {
        Self { frames: frames.into(), fail_when_drained: false }
    }
}

impl FrameSource for ScriptedSource {
    fn next_frame(&mut self) -> Result<Option<Vec<u8>>, CaptureError> {
        match self.frames.pop_front() {
            Some(frame) => Ok(Some(frame)),
            None if self.fail_when_drained => Err(CaptureError::Read(std::io::Error::other(
                "capture channel closed",
            ))),
            None => {
                std::thread::sleep(Duration::from_millis(5));
                Ok(None)
            }
        }
    }
}

#[tokio::test]
async fn run_terminates_at_the_duration_bound() {
    let telemetry = Arc::new(TelemetryStore::new());
    let observer = PacketObserver::new(Arc::clone(&telemetry));

    let source = ScriptedSource::new(vec![
        http_request_frame(),
        http_response_frame(),
        http_request_frame(),
        udp_frame(),
    ]);

    let start = Instant::now();
    observer
        .run(source, Duration::from_millis(200), CancellationToken::new())
        .await
        .unwrap();

    assert!(start.elapsed() >= Duration::from_millis(200));
    assert!(start.elapsed() < Duration::from_secs(2));

    let counters = telemetry.snapshot();
    assert_eq!(counters.total_packets, 4);
    assert_eq!(counters.http_requests, 2);
}

#[tokio::test]
async fn run_stops_on_cancellation() {
    let telemetry = Arc::new(TelemetryStore::new());
    let observer = PacketObserver::new(Arc::clone(&telemetry));
    let token = CancellationToken::new();

    let canceller = token.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(50)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    observer
        .run(ScriptedSource::new(Vec::new()), Duration::from_secs(30), token)
        .await
        .unwrap();

    assert!(start.elapsed() < Duration::from_secs(5));
}

#[tokio::test]
async fn run_is_restartable_and_counters_carry_over() {
    let telemetry = Arc::new(TelemetryStore::new());
    let observer = PacketObserver::new(Arc::clone(&telemetry));

    observer
        .run(
            ScriptedSource::new(vec![http_request_frame()]),
            Duration::from_millis(50),
            CancellationToken::new(),
        )
        .await
        .unwrap();
    observer
        .run(
            ScriptedSource::new(vec![http_request_frame(), udp_frame()]),
            Duration::from_millis(50),
            CancellationToken::new(),
        )
        .await
        .unwrap();

    let counters = telemetry.snapshot();
    assert_eq!(counters.total_packets, 3);
    assert_eq!(counters.http_requests, 2);
}

#[tokio::test]
async fn broken_channel_surfaces_and_freezes_counters() {
    let telemetry = Arc::new(TelemetryStore::new());
    let observer = PacketObserver::new(Arc::clone(&telemetry));

    let mut source = ScriptedSource::new(vec![http_request_frame(), http_response_frame()]);
    source.fail_when_drained = true;

    let result = observer
        .run(source, Duration::from_secs(30), CancellationToken::new())
        .await;

    assert!(matches!(result, Err(CaptureError::Read(_))));

    // The frames seen before the failure are still counted, and stay.
    let counters = telemetry.snapshot();
    assert_eq!(counters.total_packets, 2);
    assert_eq!(counters.http_requests, 1);
    assert_eq!(telemetry.snapshot(), counters);
}
