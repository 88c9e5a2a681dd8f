use crate::{byte_order::Endianness, pcap_ng::blocks::RawBlock};
/// A Generic Block in the PCAP-NG format
///
/// Used for name resolution, interface statistics, custom and unknown blocks.
/// None of these affect packet reading so their contents are left unparsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericBlock<'a> {
    /// The block ID
    pub block_id: u32,
    /// The length of the block in bytes, including the header and trailer
    pub block_length: u32,
    /// The block body
    pub data: &'a [u8],
}
impl<'a> GenericBlock<'a> {
    pub fn from_raw(raw: &RawBlock<'a>, byte_order: Endianness) -> Self {
        Self {
            block_id: raw.block_id(byte_order),
            block_length: raw.header.block_length_as_u32(byte_order),
            data: raw.body,
        }
    }
}
