use std::{io::Write, time::Duration};

use crate::{
    byte_order::{Endianness, ExtendedByteOrder, WriteExt},
    pcap::{PcapParseError, file_header::MagicNumber},
};
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    pub ts_sec: u32,
    /// Microseconds or nanoseconds depending on the file's magic number
    pub ts_frac: u32,
    /// The length of the packet data included in the file
    pub include_len: u32,
    /// The original length of the packet data
    pub orig_len: u32,
}

impl PacketHeader {
    pub const SIZE: usize = 16;
    pub fn new(ts_sec: u32, ts_frac: u32, incl_len: u32, orig_len: u32) -> Self {
        Self {
            ts_sec,
            ts_frac,
            include_len: incl_len,
            orig_len,
        }
    }
    #[inline(always)]
    pub fn parse_bytes(bytes: &[u8; 16], endianness: Endianness) -> Result<Self, PcapParseError> {
        let ts_sec = endianness.try_u32_from_bytes(&bytes[0..4])?;
        let ts_frac = endianness.try_u32_from_bytes(&bytes[4..8])?;
        let include_len = endianness.try_u32_from_bytes(&bytes[8..12])?;
        let orig_len = endianness.try_u32_from_bytes(&bytes[12..16])?;
        Ok(Self {
            ts_sec,
            ts_frac,
            include_len,
            orig_len,
        })
    }
    /// Time since the Unix epoch
    ///
    /// Fractions beyond one second are carried into the seconds.
    pub fn timestamp(&self, magic_number: MagicNumber) -> Duration {
        let per_second = magic_number.units_per_second();
        let nanos_per_unit = 1_000_000_000 / per_second;
        Duration::from_secs(self.ts_sec as u64)
            + Duration::from_nanos(self.ts_frac as u64 * nanos_per_unit as u64)
    }
    pub fn write<W: Write>(
        &self,
        writer: &mut W,
        endianness: Endianness,
    ) -> Result<(), std::io::Error> {
        writer.write_u32(self.ts_sec, endianness)?;
        writer.write_u32(self.ts_frac, endianness)?;
        writer.write_u32(self.include_len, endianness)?;
        writer.write_u32(self.orig_len, endianness)?;
        Ok(())
    }
}
