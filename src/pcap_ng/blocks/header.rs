use crate::{
    Version,
    byte_order::{ByteOrder, Endianness},
    pcap_ng::{
        PcapNgParseError,
        blocks::Block,
        options::{BlockOptions, define_options_enum},
    },
    utils::SliceReader,
};
define_options_enum! {
    enum SHBOptionCodes {
        Hardware = 2,
        OS = 3,
        UserApplication = 4,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionHeaderBlock {
    pub byte_order: Endianness,
    pub version: Version,
    /// `None` when the section length is -1 (unspecified)
    pub section_length: Option<u64>,
    pub options: BlockOptions,
}
impl<'a> Block<'a> for SectionHeaderBlock {
    fn block_id() -> u32 {
        0x0A0D0D0A
    }
    fn minimum_size() -> usize {
        28
    }
    /// The byte order is taken from the block itself. The one passed in is ignored.
    fn parse_body(body: &'a [u8], _byte_order: Endianness) -> Result<Self, PcapNgParseError> {
        let mut reader = SliceReader::new(body);
        let byte_order = Endianness::from_pcap_ng_bytes(&reader.take_array::<4>("byte-order magic")?)?;
        let version = Version::parse(reader.take_array::<4>("section version")?, byte_order);
        let section_length = reader.take_array::<8>("section length")?;
        let section_length = if section_length == [0xFF; 8] {
            None
        } else {
            Some(byte_order.u64_from_bytes(section_length))
        };
        let options = BlockOptions::parse(reader.take(reader.remaining(), "options")?, byte_order)?;
        Ok(Self {
            byte_order,
            version,
            section_length,
            options,
        })
    }
}
impl SectionHeaderBlock {
    pub fn new(byte_order: Endianness) -> Self {
        Self {
            byte_order,
            version: Version::PCAP_NG,
            section_length: None,
            options: BlockOptions::default(),
        }
    }
    /// The block body, excluding header and trailing length
    pub(crate) fn body_bytes(&self) -> Result<Vec<u8>, std::io::Error> {
        let byte_order = self.byte_order;
        let mut body = Vec::with_capacity(16);
        body.extend_from_slice(&byte_order.u32_to_bytes(0x1A2B3C4D));
        body.extend_from_slice(&byte_order.u16_to_bytes(self.version.major));
        body.extend_from_slice(&byte_order.u16_to_bytes(self.version.minor));
        match self.section_length {
            Some(length) => body.extend_from_slice(&byte_order.u64_to_bytes(length)),
            None => body.extend_from_slice(&[0xFF; 8]),
        }
        self.options.write(&mut body, byte_order)?;
        Ok(body)
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use crate::pcap_ng::blocks::{BlockHeader, RawBlock};

    #[test]
    fn test_parse() -> anyhow::Result<()> {
        let content = [
            10, 13, 13, 10, 96, 0, 0, 0, 77, 60, 43, 26, 1, 0, 0, 0, 255, 255, 255, 255, 255, 255,
            255, 255, 2, 0, 9, 0, 65, 112, 112, 108, 101, 32, 77, 66, 80, 0, 0, 0, 3, 0, 12, 0, 79,
            83, 45, 88, 32, 49, 48, 46, 49, 48, 46, 53, 4, 0, 15, 0, 112, 99, 97, 112, 95, 119,
            114, 105, 116, 101, 114, 46, 108, 117, 97, 0, 1, 0, 7, 0, 116, 101, 115, 116, 48, 48,
            49, 0, 0, 0, 0, 0, 96, 0, 0, 0,
        ];
        let mut reader = SliceReader::new(&content);
        let header = BlockHeader::read(&mut reader)?;
        assert!(header.is_section_header());
        let raw = RawBlock::read_with_header(&mut reader, header, Endianness::LittleEndian)?;

        let block = SectionHeaderBlock::parse(&raw, Endianness::LittleEndian)?;
        assert_eq!(block.byte_order, Endianness::LittleEndian);
        assert_eq!(block.version, Version::PCAP_NG);
        assert_eq!(block.section_length, None);
        let options = &block.options;
        assert_eq!(options.0.len(), 4);
        assert_eq!(options.0[0].code, SHBOptionCodes::Hardware as u16);
        assert_eq!(options.0[0].value, b"Apple MBP");
        assert_eq!(options.0[1].code, SHBOptionCodes::OS as u16);
        assert_eq!(options.0[1].value, b"OS-X 10.10.5");
        assert_eq!(options.0[2].code, SHBOptionCodes::UserApplication as u16);
        assert_eq!(options.0[2].value, b"pcap_writer.lua");
        assert_eq!(options.0[3].code, 1);
        assert_eq!(options.0[3].value, b"test001");

        assert_eq!(reader.position(), 96, "Reader should be at the end of the block");
        Ok(())
    }

    #[test]
    fn big_endian_body_round_trips() -> anyhow::Result<()> {
        let mut block = SectionHeaderBlock::new(Endianness::BigEndian);
        block.section_length = Some(1024);
        let body = block.body_bytes()?;
        assert_eq!(&body[0..4], &[0x1A, 0x2B, 0x3C, 0x4D]);
        // Byte order comes from the body, not the argument
        let parsed = SectionHeaderBlock::parse_body(&body, Endianness::LittleEndian)?;
        assert_eq!(parsed, block);
        Ok(())
    }
}
