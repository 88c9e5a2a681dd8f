use crate::{
    byte_order::{Endianness, ExtendedByteOrder},
    pcap_ng::{PcapNgParseError, blocks::Block},
    utils::SliceReader,
};

/// A packet without interface, timestamp or captured length
///
/// Always belongs to the first interface of the section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimplePacket<'a> {
    pub original_length: u32,
    /// Packet data including any trailing padding
    pub padded_content: &'a [u8],
}
impl<'a> Block<'a> for SimplePacket<'a> {
    fn block_id() -> u32 {
        3
    }

    fn minimum_size() -> usize {
        16
    }
    fn parse_body(body: &'a [u8], byte_order: Endianness) -> Result<Self, PcapNgParseError> {
        let mut reader = SliceReader::new(body);
        let original_length = byte_order.try_u32_from_bytes(reader.take(4, "original length")?)?;
        let padded_content = reader.take(reader.remaining(), "packet data")?;
        Ok(Self {
            original_length,
            padded_content,
        })
    }
}
impl<'a> SimplePacket<'a> {
    /// The captured data
    ///
    /// The captured length is the smallest of the original length, the block
    /// size and the interface snap length (0 meaning unlimited).
    pub fn content(&self, snap_length: u32) -> &'a [u8] {
        let mut length = (self.original_length as usize).min(self.padded_content.len());
        if snap_length != 0 {
            length = length.min(snap_length as usize);
        }
        &self.padded_content[..length]
    }
}
