//! Frame and capture builders shared by the unit tests
use std::time::Duration;

use etherparse::PacketBuilder;

use crate::{
    byte_order::Endianness,
    link_type::LinkType,
    pcap::{PcapWriter, file_header::PcapFileHeader},
    pcap_ng::PcapNgWriter,
};

const SOURCE_MAC: [u8; 6] = [0x02, 0, 0, 0, 0, 0x01];
const DESTINATION_MAC: [u8; 6] = [0x02, 0, 0, 0, 0, 0x02];

/// Ethernet + IPv4 + TCP frame padded with payload up to `frame_length` bytes
pub(crate) fn ethernet_ipv4(
    source: [u8; 4],
    destination: [u8; 4],
    frame_length: usize,
) -> anyhow::Result<Vec<u8>> {
    let builder = PacketBuilder::ethernet2(SOURCE_MAC, DESTINATION_MAC)
        .ipv4(source, destination, 64)
        .tcp(1234, 80, 1, 1024);
    let payload = vec![0xAB; frame_length.saturating_sub(builder.size(0))];
    let mut frame = Vec::with_capacity(frame_length);
    builder.write(&mut frame, &payload)?;
    Ok(frame)
}

/// Ethernet + IPv6 + UDP frame padded with payload up to `frame_length` bytes
pub(crate) fn ethernet_ipv6(
    source: [u8; 16],
    destination: [u8; 16],
    frame_length: usize,
) -> anyhow::Result<Vec<u8>> {
    let builder = PacketBuilder::ethernet2(SOURCE_MAC, DESTINATION_MAC)
        .ipv6(source, destination, 64)
        .udp(5353, 53);
    let payload = vec![0xCD; frame_length.saturating_sub(builder.size(0))];
    let mut frame = Vec::with_capacity(frame_length);
    builder.write(&mut frame, &payload)?;
    Ok(frame)
}

/// ARP who-has request for 192.168.1.5 from 192.168.1.1
pub(crate) fn arp_frame() -> Vec<u8> {
    let mut frame = Vec::with_capacity(42);
    frame.extend_from_slice(&[0xFF; 6]);
    frame.extend_from_slice(&SOURCE_MAC);
    frame.extend_from_slice(&0x0806u16.to_be_bytes());
    // Ethernet / IPv4, 6 byte hardware and 4 byte protocol addresses, request
    frame.extend_from_slice(&[0x00, 0x01, 0x08, 0x00, 6, 4, 0x00, 0x01]);
    frame.extend_from_slice(&SOURCE_MAC);
    frame.extend_from_slice(&[192, 168, 1, 1]);
    frame.extend_from_slice(&[0; 6]);
    frame.extend_from_slice(&[192, 168, 1, 5]);
    frame
}

/// Little-endian microsecond pcap capture with an Ethernet link type
pub(crate) fn pcap_capture(frames: &[(Duration, Vec<u8>)]) -> anyhow::Result<Vec<u8>> {
    let mut writer = PcapWriter::new(Vec::new(), PcapFileHeader::new(LinkType::Ethernet, 65535))?;
    for (timestamp, data) in frames {
        writer.write_packet(*timestamp, data)?;
    }
    Ok(writer.into_inner())
}

/// Single section pcapng capture with one interface of the given link type
pub(crate) fn pcapng_capture(
    link_type: LinkType,
    frames: &[(Duration, Vec<u8>)],
) -> anyhow::Result<Vec<u8>> {
    let mut writer = PcapNgWriter::new(Vec::new(), Endianness::LittleEndian)?;
    let interface = writer.add_interface(link_type, 0, None)?;
    for (timestamp, data) in frames {
        writer.write_packet(interface, *timestamp, data)?;
    }
    Ok(writer.into_inner())
}
