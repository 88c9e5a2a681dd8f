use std::io::Write;

use crate::{
    Version,
    byte_order::{ByteOrder, Endianness, ExtendedByteOrder, WriteExt},
    link_type::LinkType,
    pcap::PcapParseError,
    utils::SliceReader,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MagicNumber {
    Microsecond,
    Nanosecond,
}
impl MagicNumber {
    /// How many sub-second units make up one second
    pub fn units_per_second(self) -> u32 {
        match self {
            MagicNumber::Microsecond => 1_000_000,
            MagicNumber::Nanosecond => 1_000_000_000,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MagicNumberAndEndianness {
    pub magic_number: MagicNumber,
    pub endianness: Endianness,
}
impl MagicNumberAndEndianness {
    /// The magic number as it would be stored in the file
    pub fn to_bytes(self) -> [u8; 4] {
        let value: u32 = match self.magic_number {
            MagicNumber::Microsecond => 0xa1b2c3d4,
            MagicNumber::Nanosecond => 0xa1b23c4d,
        };
        self.endianness.u32_to_bytes(value)
    }
}

impl TryFrom<[u8; 4]> for MagicNumberAndEndianness {
    type Error = PcapParseError;

    fn try_from(value: [u8; 4]) -> Result<Self, Self::Error> {
        match value {
            [0xa1, 0xb2, 0xc3, 0xd4] => Ok(Self {
                magic_number: MagicNumber::Microsecond,
                endianness: Endianness::BigEndian,
            }),
            [0xd4, 0xc3, 0xb2, 0xa1] => Ok(Self {
                magic_number: MagicNumber::Microsecond,
                endianness: Endianness::LittleEndian,
            }),
            [0xa1, 0xb2, 0x3c, 0x4d] => Ok(Self {
                magic_number: MagicNumber::Nanosecond,
                endianness: Endianness::BigEndian,
            }),
            [0x4d, 0x3c, 0xb2, 0xa1] => Ok(Self {
                magic_number: MagicNumber::Nanosecond,
                endianness: Endianness::LittleEndian,
            }),
            _ => Err(PcapParseError::InvalidMagicNumber(Some(value))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PcapFileHeader {
    /// First 4 bytes are the magic number and endianness
    pub magic_number_and_endianness: MagicNumberAndEndianness,
    /// 4..8
    pub version: Version,
    /// 8..12
    pub timezone: u32,
    /// 12..16
    pub sig_figs: u32,
    /// 16..20
    pub snap_length: u32,
    /// 20..24
    pub link_type: LinkType,
}

impl PcapFileHeader {
    pub const SIZE: usize = 24;
    /// A little-endian microsecond header for the given link type
    pub fn new(link_type: LinkType, snap_length: u32) -> Self {
        Self {
            magic_number_and_endianness: MagicNumberAndEndianness {
                magic_number: MagicNumber::Microsecond,
                endianness: Endianness::LittleEndian,
            },
            version: Version::PCAP,
            timezone: 0,
            sig_figs: 0,
            snap_length,
            link_type,
        }
    }
    /// Reads the file header from the start of the capture
    pub fn read(reader: &mut SliceReader<'_>) -> Result<Self, PcapParseError> {
        let header = reader.take_array::<24>("pcap file header")?;
        Self::try_from(&header)
    }
    pub fn write<W: Write>(&self, writer: &mut W) -> Result<(), std::io::Error> {
        let endianness = self.magic_number_and_endianness.endianness;
        writer.write_all(&self.magic_number_and_endianness.to_bytes())?;
        writer.write_u16(self.version.major, endianness)?;
        writer.write_u16(self.version.minor, endianness)?;
        writer.write_u32(self.timezone, endianness)?;
        writer.write_u32(self.sig_figs, endianness)?;
        writer.write_u32(self.snap_length, endianness)?;
        writer.write_u32(self.link_type.code() as u32, endianness)?;
        Ok(())
    }
}
impl TryFrom<&[u8; 24]> for PcapFileHeader {
    type Error = PcapParseError;

    fn try_from(bytes: &[u8; 24]) -> Result<Self, Self::Error> {
        let magic_number_and_endianness =
            MagicNumberAndEndianness::try_from([bytes[0], bytes[1], bytes[2], bytes[3]])?;
        let endianness = magic_number_and_endianness.endianness;

        let version = Version::parse([bytes[4], bytes[5], bytes[6], bytes[7]], endianness);
        let timezone = endianness.try_u32_from_bytes(&bytes[8..12])?;
        let sig_figs = endianness.try_u32_from_bytes(&bytes[12..16])?;
        let snap_length = endianness.try_u32_from_bytes(&bytes[16..20])?;
        let link_type = LinkType::from(endianness.try_u32_from_bytes(&bytes[20..24])?);
        Ok(Self {
            magic_number_and_endianness,
            version,
            timezone,
            sig_figs,
            snap_length,
            link_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magic_number_and_endianness() -> anyhow::Result<()> {
        let magic = MagicNumberAndEndianness::try_from([0xa1, 0xb2, 0xc3, 0xd4])?;
        assert_eq!(magic.magic_number, MagicNumber::Microsecond);
        assert_eq!(magic.endianness, Endianness::BigEndian);

        let magic = MagicNumberAndEndianness::try_from([0x4d, 0x3c, 0xb2, 0xa1])?;
        assert_eq!(magic.magic_number, MagicNumber::Nanosecond);
        assert_eq!(magic.endianness, Endianness::LittleEndian);
        assert_eq!(magic.to_bytes(), [0x4d, 0x3c, 0xb2, 0xa1]);
        Ok(())
    }

    #[test]
    fn rejects_unknown_magic() {
        let result = MagicNumberAndEndianness::try_from(*b"GIF8");
        assert!(matches!(
            result,
            Err(PcapParseError::InvalidMagicNumber(Some(magic))) if &magic == b"GIF8"
        ));
    }

    #[test]
    fn big_endian_header_written_and_read() -> anyhow::Result<()> {
        let mut header = PcapFileHeader::new(LinkType::LinuxSll, 1500);
        header.magic_number_and_endianness.endianness = Endianness::BigEndian;
        let mut bytes = Vec::new();
        header.write(&mut bytes)?;
        assert_eq!(bytes.len(), PcapFileHeader::SIZE);
        assert_eq!(&bytes[0..4], &[0xa1, 0xb2, 0xc3, 0xd4]);

        let parsed = PcapFileHeader::read(&mut SliceReader::new(&bytes))?;
        assert_eq!(parsed, header);
        assert_eq!(parsed.version, Version { major: 2, minor: 4 });
        Ok(())
    }

    #[test]
    fn short_header_is_truncated() {
        let result = PcapFileHeader::read(&mut SliceReader::new(&[0xd4, 0xc3, 0xb2, 0xa1, 2, 0]));
        assert!(matches!(result, Err(PcapParseError::Truncated(_))));
    }
}
