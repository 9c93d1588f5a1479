//! Frame classification by protocol-layer inspection.

use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::packet::ip::IpNextHeaderProtocols;
use pnet::packet::ipv4::Ipv4Packet;
use pnet::packet::ipv6::Ipv6Packet;
use pnet::packet::tcp::TcpPacket;
use pnet::packet::Packet;

const METHODS: [&[u8]; 8] = [
    b"GET ", b"POST ", b"PUT ", b"DELETE ", b"HEAD ", b"OPTIONS ", b"PATCH ", b"TRACE ",
];

/// Whether a raw Ethernet frame carries an HTTP request.
///
/// Walks Ethernet -> IPv4/IPv6 -> TCP and then checks that the segment
/// payload opens with a well-formed HTTP/1.x request line. Anything
/// that fails to parse at any layer simply classifies as non-HTTP.
pub fn is_http_request(frame: &[u8]) -> bool {
    let Some(eth) = EthernetPacket::new(frame) else {
        return false;
    };

    match eth.get_ethertype() {
        EtherTypes::Ipv4 => {
            let Some(ip) = Ipv4Packet::new(eth.payload()) else {
                return false;
            };
            if ip.get_next_level_protocol() != IpNextHeaderProtocols::Tcp {
                return false;
            }
            let Some(tcp) = TcpPacket::new(ip.payload()) else {
                return false;
            };
            is_request_line(tcp.payload())
        }
        EtherTypes::Ipv6 => {
            let Some(ip) = Ipv6Packet::new(eth.payload()) else {
                return false;
            };
            if ip.get_next_header() != IpNextHeaderProtocols::Tcp {
                return false;
            }
            let Some(tcp) = TcpPacket::new(ip.payload()) else {
                return false;
            };
            is_request_line(tcp.payload())
        }
        _ => false,
    }
}

/// `METHOD <target> HTTP/1.x` at the start of the segment payload.
fn is_request_line(payload: &[u8]) -> bool {
    if !METHODS.iter().any(|method| payload.starts_with(method)) {
        return false;
    }
    let line_end = payload.iter().position(|&b| b == b'\r').unwrap_or(payload.len());
    payload[..line_end].windows(8).any(|w| w == b" HTTP/1.")
}
