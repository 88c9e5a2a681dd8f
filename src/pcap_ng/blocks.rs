//! Block Types for pcap-ng files
use std::io::Write;

use crate::{
    byte_order::{ByteOrder, Endianness, ExtendedByteOrder},
    pcap_ng::{PCAP_NG_MAGIC, PcapNgParseError},
    utils::SliceReader,
};

mod enhanced_packet;
mod generic;
mod header;
mod interface;
mod simple_packet;
pub use enhanced_packet::EnhancedPacket;

pub use generic::GenericBlock;
pub use header::{SHBOptionCodes, SectionHeaderBlock};
pub use interface::{InterfaceDescriptionBlock, InterfaceOptionCodes, TimestampResolution};
pub use simple_packet::SimplePacket;
pub trait Block<'a>: Sized {
    /// Returns the block ID for this block type
    fn block_id() -> u32;
    /// Minimum size of the block, including the header
    ///
    /// Should be at least 12 bytes for the header and footer.
    fn minimum_size() -> usize {
        12
    }
    /// Parses the block body, the bytes between the block header and the
    /// trailing block length
    fn parse_body(body: &'a [u8], byte_order: Endianness) -> Result<Self, PcapNgParseError>;
    /// Parses a raw block after checking its ID and minimum size
    fn parse(raw: &RawBlock<'a>, byte_order: Endianness) -> Result<Self, PcapNgParseError> {
        let expected = byte_order.u32_to_bytes(Self::block_id());
        if raw.header.block_id != expected {
            return Err(PcapNgParseError::UnexpectedBlockId {
                expected,
                got: raw.header.block_id,
            });
        }
        let size = raw.body.len() + 12;
        if size < Self::minimum_size() {
            return Err(PcapNgParseError::MinimumSizeNotMet(Self::minimum_size(), size));
        }
        Self::parse_body(raw.body, byte_order)
    }
}
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockHeader {
    pub block_id: [u8; 4],
    pub block_length: [u8; 4],
}
impl BlockHeader {
    pub fn new(block_id: [u8; 4], block_length: [u8; 4]) -> Self {
        Self {
            block_id,
            block_length,
        }
    }
    /// Returns the block ID as a u32
    pub fn block_id_as_u32(&self, endianness: impl ByteOrder) -> u32 {
        endianness.u32_from_bytes(self.block_id)
    }
    /// Returns the block length as a u32
    pub fn block_length_as_u32(&self, endianness: impl ByteOrder) -> u32 {
        endianness.u32_from_bytes(self.block_length)
    }
    /// Section header blocks have a palindromic ID and must be recognised
    /// before the byte order of their section is known
    pub fn is_section_header(&self) -> bool {
        self.block_id == PCAP_NG_MAGIC
    }
    pub fn read(reader: &mut SliceReader<'_>) -> Result<Self, PcapNgParseError> {
        let block_id = reader.take_array::<4>("block type")?;
        let block_length = reader.take_array::<4>("block length")?;
        Ok(Self::new(block_id, block_length))
    }
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), std::io::Error> {
        writer.write_all(&self.block_id)?;
        writer.write_all(&self.block_length)?;
        Ok(())
    }
}
/// A block split into its header and body, with its lengths validated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawBlock<'a> {
    pub header: BlockHeader,
    pub body: &'a [u8],
}
impl<'a> RawBlock<'a> {
    /// Reads the body and trailing length of a block whose header has already been read
    pub fn read_with_header(
        reader: &mut SliceReader<'a>,
        header: BlockHeader,
        byte_order: Endianness,
    ) -> Result<Self, PcapNgParseError> {
        let length = header.block_length_as_u32(byte_order);
        if length < 12 || !length.is_multiple_of(4) {
            return Err(PcapNgParseError::InvalidBlockLength {
                block_id: header.block_id_as_u32(byte_order),
                length,
            });
        }
        let body = reader.take(length as usize - 12, "block body")?;
        let trailing = byte_order.try_u32_from_bytes(reader.take(4, "block trailer")?)?;
        if trailing != length {
            return Err(PcapNgParseError::BlockLengthMismatch {
                leading: length,
                trailing,
            });
        }
        Ok(Self { header, body })
    }
    pub fn block_id(&self, byte_order: Endianness) -> u32 {
        self.header.block_id_as_u32(byte_order)
    }
}
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PcapNgBlock<'a> {
    SectionHeader(SectionHeaderBlock),
    InterfaceDescription(InterfaceDescriptionBlock),
    SimplePacket(SimplePacket<'a>),
    EnhancedPacket(EnhancedPacket<'a>),
    Generic(GenericBlock<'a>),
}
impl<'a> PcapNgBlock<'a> {
    pub fn parse(raw: &RawBlock<'a>, byte_order: Endianness) -> Result<Self, PcapNgParseError> {
        match raw.block_id(byte_order) {
            6 => Ok(PcapNgBlock::EnhancedPacket(EnhancedPacket::parse(
                raw, byte_order,
            )?)),
            3 => Ok(PcapNgBlock::SimplePacket(SimplePacket::parse(
                raw, byte_order,
            )?)),
            0x0A0D0D0A => Ok(PcapNgBlock::SectionHeader(SectionHeaderBlock::parse(
                raw, byte_order,
            )?)),
            1 => Ok(PcapNgBlock::InterfaceDescription(
                InterfaceDescriptionBlock::parse(raw, byte_order)?,
            )),
            _ => Ok(PcapNgBlock::Generic(GenericBlock::from_raw(raw, byte_order))),
        }
    }
}
