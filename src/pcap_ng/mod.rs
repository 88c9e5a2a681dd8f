//! This module provides pcap-ng parsing functionality
//!
//! [Source](https://www.ietf.org/archive/id/draft-tuexen-opsawg-pcapng-03.html)
//!
//! Currently, only supports reading files from beginning to end and does not support reverse reading.
use thiserror::Error;

use crate::{byte_order::Endianness, utils::Truncated};
pub mod blocks;
pub mod options;
mod reader;
mod writer;
pub use reader::PcapNgReader;
pub use writer::PcapNgWriter;
/// Magic number for pcap-ng files
///
/// All pcap-ng files should start with this magic number
pub const PCAP_NG_MAGIC: [u8; 4] = [0x0A, 0x0D, 0x0D, 0x0A];
#[derive(Debug, Error)]
pub enum PcapNgParseError {
    #[error("Invalid block ID: expected {expected:?}, got {got:?}")]
    UnexpectedBlockId { expected: [u8; 4], got: [u8; 4] },
    #[error("Invalid endianness: got {got:?}")]
    InvalidEndianness { got: [u8; 4] },
    #[error(transparent)]
    Truncated(#[from] Truncated),
    #[error("Invalid length {length} for block {block_id}: must be a multiple of 4 and at least 12")]
    InvalidBlockLength { block_id: u32, length: u32 },
    #[error("Block length mismatch: header says {leading}, trailer says {trailing}")]
    BlockLengthMismatch { leading: u32, trailing: u32 },
    #[error("Minimum size for this block is {0} bytes, but got {1} bytes")]
    MinimumSizeNotMet(usize, usize),
    #[error("Captured length {captured_length} does not fit in the {available} bytes of the block")]
    InvalidCapturedLength { captured_length: u32, available: usize },
    #[error("Packet refers to interface {0} which has not been described in this section")]
    UnknownInterface(u32),
    #[error("Unsupported timestamp resolution {0:#04x}")]
    InvalidTimestampResolution(u8),
    #[error(transparent)]
    UnexpectedSize(#[from] crate::byte_order::UnexpectedSize),
    #[error("Error parsing options: {0}")]
    OptionParseError(#[from] options::OptionParseError),
}

impl Endianness {
    pub fn from_pcap_ng_bytes(bytes: &[u8; 4]) -> Result<Self, PcapNgParseError> {
        match bytes {
            [0x1A, 0x2B, 0x3C, 0x4D] => Ok(Self::BigEndian),
            [0x4D, 0x3C, 0x2B, 0x1A] => Ok(Self::LittleEndian),
            _ => Err(PcapNgParseError::InvalidEndianness { got: *bytes }),
        }
    }
}

/// Pads the length to the next multiple of 4 bytes (32 bits)
pub(crate) fn pad_length_to_32_bits(length: usize) -> usize {
    length.next_multiple_of(4)
}
