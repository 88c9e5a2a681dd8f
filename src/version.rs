use std::fmt;

use crate::byte_order::ByteOrder;

/// Major/minor format version found in both capture containers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u16,
    pub minor: u16,
}
impl Version {
    /// Current classic pcap version, also written by [crate::pcap::PcapWriter]
    pub const PCAP: Version = Version { major: 2, minor: 4 };
    /// Current pcapng section version
    pub const PCAP_NG: Version = Version { major: 1, minor: 0 };
    /// Parses the version from the bytes
    #[inline(always)]
    pub(crate) fn parse(bytes: [u8; 4], byte_order: impl ByteOrder) -> Self {
        let major = byte_order.u16_from_bytes([bytes[0], bytes[1]]);
        let minor = byte_order.u16_from_bytes([bytes[2], bytes[3]]);
        Self { major, minor }
    }
}
impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}
