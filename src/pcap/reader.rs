use tracing::debug;

use crate::{
    Version,
    frame::Frame,
    pcap::{PcapParseError, file_header::PcapFileHeader, packet_header::PacketHeader},
    utils::SliceReader,
};
/// A reader for classic PCAP captures held in memory
///
/// Frames borrow their data from the capture buffer.
#[derive(Debug, Clone)]
pub struct PcapReader<'a> {
    reader: SliceReader<'a>,
    file_header: PcapFileHeader,
}
impl<'a> PcapReader<'a> {
    /// Creates a new `PcapReader` over a complete capture
    ///
    /// Returns `Err` if the file header is missing or malformed
    pub fn new(capture: &'a [u8]) -> Result<Self, PcapParseError> {
        let mut reader = SliceReader::new(capture);
        let file_header = PcapFileHeader::read(&mut reader)?;
        debug!(
            link_type = ?file_header.link_type,
            snap_length = file_header.snap_length,
            version = %file_header.version,
            "Opened pcap capture"
        );
        Ok(Self {
            reader,
            file_header,
        })
    }
    /// Returns the file header of the pcap file
    pub fn file_header(&self) -> &PcapFileHeader {
        &self.file_header
    }
    /// Returns the version of the pcap file
    pub fn version(&self) -> &Version {
        &self.file_header.version
    }
    /// Reads the next record
    ///
    /// `Ok(None)` only when the capture ends exactly on a record boundary.
    pub fn next_packet(&mut self) -> Result<Option<(PacketHeader, &'a [u8])>, PcapParseError> {
        if self.reader.is_empty() {
            return Ok(None);
        }
        let header_bytes = self.reader.take_array::<16>("pcap record header")?;
        let packet_header = PacketHeader::parse_bytes(
            &header_bytes,
            self.file_header.magic_number_and_endianness.endianness,
        )?;
        // A snap length of zero is written by some tools to mean "unlimited"
        let snap_length = self.file_header.snap_length;
        if snap_length != 0 && packet_header.include_len > snap_length {
            return Err(PcapParseError::InvalidPacketLength {
                snap_length,
                incl_len: packet_header.include_len,
            });
        }
        let data = self
            .reader
            .take(packet_header.include_len as usize, "pcap record data")?;
        Ok(Some((packet_header, data)))
    }
    /// Reads the next record as a [Frame]
    pub fn next_frame(&mut self) -> Result<Option<Frame<'a>>, PcapParseError> {
        let magic_number = self.file_header.magic_number_and_endianness.magic_number;
        let link_type = self.file_header.link_type;
        Ok(self.next_packet()?.map(|(header, data)| Frame {
            timestamp: header.timestamp(magic_number),
            original_length: header.orig_len,
            link_type,
            data,
        }))
    }
}
