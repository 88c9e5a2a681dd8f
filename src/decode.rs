//! Network address extraction from link-layer frames
//!
//! Slicing is lax: a frame snapped in the middle of its payload still yields
//! addresses as long as the IP header itself is complete.
use std::net::IpAddr;

use etherparse::{LaxNetSlice, LaxSlicedPacket};

use crate::link_type::LinkType;

const ETHER_TYPE_IPV4: u16 = 0x0800;
const ETHER_TYPE_IPV6: u16 = 0x86DD;

/// Source and destination of an IPv4 or IPv6 packet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AddressPair {
    pub source: IpAddr,
    pub destination: IpAddr,
}

/// Extracts the network layer addresses from a frame
///
/// Returns `None` for anything that is not IPv4 or IPv6 (ARP, unknown ether
/// types, unsupported link types, truncated headers).
pub fn decode(link_type: LinkType, data: &[u8]) -> Option<AddressPair> {
    let packet = match link_type {
        LinkType::Ethernet => LaxSlicedPacket::from_ethernet(data).ok()?,
        LinkType::Raw | LinkType::Ipv4 | LinkType::Ipv6 => LaxSlicedPacket::from_ip(data).ok()?,
        // 4 byte address family in host byte order, the IP version nibble is enough
        LinkType::Null | LinkType::Loop => LaxSlicedPacket::from_ip(data.get(4..)?).ok()?,
        LinkType::LinuxSll => cooked(data, 14, 16)?,
        LinkType::LinuxSll2 => cooked(data, 0, 20)?,
        _ => return None,
    };
    match packet.net? {
        LaxNetSlice::Ipv4(ipv4) => {
            let header = ipv4.header();
            Some(AddressPair {
                source: header.source_addr().into(),
                destination: header.destination_addr().into(),
            })
        }
        LaxNetSlice::Ipv6(ipv6) => {
            let header = ipv6.header();
            Some(AddressPair {
                source: header.source_addr().into(),
                destination: header.destination_addr().into(),
            })
        }
        _ => None,
    }
}

/// Linux cooked capture headers carry the ether type of the payload at a fixed offset
fn cooked(data: &[u8], protocol_offset: usize, header_length: usize) -> Option<LaxSlicedPacket<'_>> {
    let protocol = data.get(protocol_offset..protocol_offset + 2)?;
    match u16::from_be_bytes([protocol[0], protocol[1]]) {
        ETHER_TYPE_IPV4 | ETHER_TYPE_IPV6 => LaxSlicedPacket::from_ip(data.get(header_length..)?).ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use std::net::{Ipv4Addr, Ipv6Addr};

    use etherparse::{PacketBuilder, VlanId};

    use super::*;
    use crate::test_helpers::{arp_frame, ethernet_ipv4, ethernet_ipv6};

    const CLIENT: [u8; 4] = [192, 168, 1, 1];
    const SERVER: [u8; 4] = [192, 168, 1, 5];

    fn ipv4_pair() -> anyhow::Result<Vec<u8>> {
        ethernet_ipv4(CLIENT, SERVER, 80)
    }

    #[test]
    fn ipv4_over_ethernet() -> anyhow::Result<()> {
        let frame = ipv4_pair()?;
        let pair = decode(LinkType::Ethernet, &frame).ok_or_else(|| anyhow::anyhow!("not addressable"))?;
        assert_eq!(pair.source, IpAddr::V4(Ipv4Addr::from(CLIENT)));
        assert_eq!(pair.destination, IpAddr::V4(Ipv4Addr::from(SERVER)));
        // Decoding is a pure function of the frame
        assert_eq!(decode(LinkType::Ethernet, &frame), Some(pair));
        Ok(())
    }

    #[test]
    fn ipv6_over_ethernet() -> anyhow::Result<()> {
        let source = Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1);
        let destination = Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 2);
        let frame = ethernet_ipv6(source.octets(), destination.octets(), 100)?;
        let pair = decode(LinkType::Ethernet, &frame).ok_or_else(|| anyhow::anyhow!("not addressable"))?;
        assert_eq!(pair.source, IpAddr::V6(source));
        assert_eq!(pair.destination, IpAddr::V6(destination));
        Ok(())
    }

    #[test]
    fn arp_is_not_addressable() {
        assert_eq!(decode(LinkType::Ethernet, &arp_frame()), None);
    }

    #[test]
    fn truncated_headers_are_not_addressable() -> anyhow::Result<()> {
        let frame = ipv4_pair()?;
        // Ethernet header plus half an IPv4 header
        assert_eq!(decode(LinkType::Ethernet, &frame[..24]), None);
        assert_eq!(decode(LinkType::Ethernet, &frame[..6]), None);
        assert_eq!(decode(LinkType::Ethernet, &[]), None);
        Ok(())
    }

    #[test]
    fn snapped_payload_still_decodes() -> anyhow::Result<()> {
        let frame = ipv4_pair()?;
        // Ethernet + IPv4 header, transport payload cut off
        assert!(decode(LinkType::Ethernet, &frame[..34]).is_some());
        Ok(())
    }

    #[test]
    fn other_link_types() -> anyhow::Result<()> {
        let frame = ipv4_pair()?;
        let ip = &frame[14..];
        let expected = decode(LinkType::Ethernet, &frame);
        assert!(expected.is_some());

        assert_eq!(decode(LinkType::Raw, ip), expected);
        assert_eq!(decode(LinkType::Ipv4, ip), expected);

        let mut loopback = vec![2, 0, 0, 0];
        loopback.extend_from_slice(ip);
        assert_eq!(decode(LinkType::Null, &loopback), expected);
        // OpenBSD loopback stores the family in network byte order
        let mut openbsd = vec![0, 0, 0, 2];
        openbsd.extend_from_slice(ip);
        assert_eq!(decode(LinkType::Loop, &openbsd), expected);

        let mut sll = vec![0u8; 16];
        sll[14..16].copy_from_slice(&ETHER_TYPE_IPV4.to_be_bytes());
        sll.extend_from_slice(ip);
        assert_eq!(decode(LinkType::LinuxSll, &sll), expected);

        let mut sll2 = vec![0u8; 20];
        sll2[0..2].copy_from_slice(&ETHER_TYPE_IPV4.to_be_bytes());
        sll2.extend_from_slice(ip);
        assert_eq!(decode(LinkType::LinuxSll2, &sll2), expected);

        // The same bytes on a link we do not decode
        assert_eq!(decode(LinkType::Ieee802_11, &frame), None);
        assert_eq!(decode(LinkType::Unknown(147), &frame), None);
        Ok(())
    }

    #[test]
    fn vlan_tagged_ethernet() -> anyhow::Result<()> {
        let builder = PacketBuilder::ethernet2([2, 0, 0, 0, 0, 1], [2, 0, 0, 0, 0, 2])
            .single_vlan(VlanId::try_new(42)?)
            .ipv4(CLIENT, SERVER, 64)
            .udp(5353, 53);
        let mut frame = Vec::with_capacity(builder.size(4));
        builder.write(&mut frame, &[1, 2, 3, 4])?;
        assert_eq!(
            decode(LinkType::Ethernet, &frame),
            Some(AddressPair {
                source: IpAddr::from(CLIENT),
                destination: IpAddr::from(SERVER),
            })
        );
        Ok(())
    }

    #[test]
    fn raw_ipv6() -> anyhow::Result<()> {
        let source = Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1);
        let destination = Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 2);
        let frame = ethernet_ipv6(source.octets(), destination.octets(), 90)?;
        let expected = Some(AddressPair {
            source: IpAddr::V6(source),
            destination: IpAddr::V6(destination),
        });
        assert_eq!(decode(LinkType::Ipv6, &frame[14..]), expected);
        assert_eq!(decode(LinkType::Raw, &frame[14..]), expected);
        Ok(())
    }

    #[test]
    fn raw_ip_with_ethernet_assumption() -> anyhow::Result<()> {
        // A raw IP frame read as Ethernet does not produce the real addresses
        let frame = ipv4_pair()?;
        let ip = &frame[14..];
        assert_ne!(decode(LinkType::Ethernet, ip), decode(LinkType::Raw, ip));
        Ok(())
    }
}
