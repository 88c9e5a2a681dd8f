//! Parsing for PCAP Files based on the libpcap format
//!
//! Sources
//! - [Wireshark Wiki - File Format](https://wiki.wireshark.org/Development/LibpcapFileFormat)
pub mod file_header;
pub mod packet_header;
mod reader;
mod writer;
pub use reader::PcapReader;
pub use writer::PcapWriter;

use thiserror::Error;

use crate::{byte_order::UnexpectedSize, utils::Truncated};

/// Errors that can occur when parsing pcap files
#[derive(Debug, Error)]
pub enum PcapParseError {
    #[error(transparent)]
    Truncated(#[from] Truncated),
    #[error("Invalid magic number got {0:?}")]
    InvalidMagicNumber(Option<[u8; 4]>),
    #[error(
        "Invalid packet length: included length {incl_len} is greater than snap length {snap_length}"
    )]
    InvalidPacketLength { snap_length: u32, incl_len: u32 },
    /// This should never happen. But preventing panics
    #[error(transparent)]
    UnexpectedSize(#[from] UnexpectedSize),
}
