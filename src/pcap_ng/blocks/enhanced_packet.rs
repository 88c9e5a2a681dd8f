use crate::{
    byte_order::{ByteOrder, Endianness, ExtendedByteOrder},
    pcap_ng::{PcapNgParseError, blocks::Block, options::BlockOptions, pad_length_to_32_bits},
    utils::SliceReader,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancedPacket<'a> {
    // 8..12
    pub interface_id: u32,
    // 12..16
    pub timestamp_high: u32,
    // 16..20
    pub timestamp_low: u32,
    // 20..24
    pub captured_length: u32,
    // 24..28
    pub original_length: u32,

    pub content: &'a [u8],

    pub options: BlockOptions,
}
impl EnhancedPacket<'_> {
    /// The block body, excluding header and trailing length
    pub(crate) fn body_bytes(&self, byte_order: Endianness) -> Result<Vec<u8>, std::io::Error> {
        let padded_length = pad_length_to_32_bits(self.content.len());
        let mut body = Vec::with_capacity(20 + padded_length);
        for value in [
            self.interface_id,
            self.timestamp_high,
            self.timestamp_low,
            self.captured_length,
            self.original_length,
        ] {
            body.extend_from_slice(&byte_order.u32_to_bytes(value));
        }
        body.extend_from_slice(self.content);
        body.resize(20 + padded_length, 0);
        self.options.write(&mut body, byte_order)?;
        Ok(body)
    }
}
impl<'a> Block<'a> for EnhancedPacket<'a> {
    fn block_id() -> u32 {
        6
    }

    fn minimum_size() -> usize {
        32
    }
    fn parse_body(body: &'a [u8], byte_order: Endianness) -> Result<Self, PcapNgParseError> {
        let mut reader = SliceReader::new(body);
        let interface_id = byte_order.try_u32_from_bytes(reader.take(4, "interface id")?)?;
        let timestamp_high = byte_order.try_u32_from_bytes(reader.take(4, "timestamp")?)?;
        let timestamp_low = byte_order.try_u32_from_bytes(reader.take(4, "timestamp")?)?;
        let captured_length = byte_order.try_u32_from_bytes(reader.take(4, "captured length")?)?;
        let original_length = byte_order.try_u32_from_bytes(reader.take(4, "original length")?)?;

        let padded_length = pad_length_to_32_bits(captured_length as usize);
        if padded_length > reader.remaining() {
            return Err(PcapNgParseError::InvalidCapturedLength {
                captured_length,
                available: reader.remaining(),
            });
        }
        let padded = reader.take(padded_length, "packet data")?;
        let options = BlockOptions::parse(reader.take(reader.remaining(), "options")?, byte_order)?;
        Ok(Self {
            interface_id,
            timestamp_high,
            timestamp_low,
            captured_length,
            original_length,
            content: &padded[..captured_length as usize],
            options,
        })
    }
}
