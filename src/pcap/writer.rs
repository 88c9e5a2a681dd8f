use std::{io, io::Write, time::Duration};

use crate::pcap::{file_header::PcapFileHeader, packet_header::PacketHeader};
/// Writes a classic pcap capture
///
/// Packets longer than the snap length are cut to the snap length, with the
/// full length kept as the record's original length.
#[derive(Debug)]
pub struct PcapWriter<W: Write> {
    target: W,
    header: PcapFileHeader,
}

impl<W: Write> PcapWriter<W> {
    pub fn new(mut target: W, header: PcapFileHeader) -> Result<Self, io::Error> {
        header.write(&mut target)?;
        Ok(Self { target, header })
    }

    pub fn file_header(&self) -> &PcapFileHeader {
        &self.header
    }

    /// Writes one record stamped with `timestamp` (time since the Unix epoch)
    pub fn write_packet(&mut self, timestamp: Duration, content: &[u8]) -> Result<(), io::Error> {
        let magic_number = self.header.magic_number_and_endianness.magic_number;
        let units_per_second = magic_number.units_per_second();
        let ts_frac = timestamp.subsec_nanos() / (1_000_000_000 / units_per_second);

        let orig_len = content.len() as u32;
        let include_len = match self.header.snap_length {
            0 => orig_len,
            snap_length => orig_len.min(snap_length),
        };
        let header = PacketHeader::new(timestamp.as_secs() as u32, ts_frac, include_len, orig_len);
        header.write(
            &mut self.target,
            self.header.magic_number_and_endianness.endianness,
        )?;
        self.target
            .write_all(&content[..include_len as usize])?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.target
    }
}
