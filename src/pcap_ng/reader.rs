use std::time::Duration;

use tracing::{debug, trace};

use crate::{
    byte_order::Endianness,
    frame::Frame,
    pcap_ng::{
        PCAP_NG_MAGIC, PcapNgParseError,
        blocks::{
            Block, BlockHeader, InterfaceDescriptionBlock, PcapNgBlock, RawBlock,
            SectionHeaderBlock,
        },
    },
    utils::{SliceReader, Truncated},
};

/// A reader for PCAP-NG captures held in memory
#[derive(Debug, Clone)]
pub struct PcapNgReader<'a> {
    reader: SliceReader<'a>,
    /// The current section header block
    current_section: SectionHeaderBlock,
    /// The interfaces described in the file
    ///
    /// Will reset each time a new section header block is read
    interfaces: Vec<InterfaceDescriptionBlock>,
    /// Simple packets carry no timestamp and reuse the last one seen
    last_timestamp: Duration,
}
impl<'a> PcapNgReader<'a> {
    /// Creates a new `PcapNgReader` over a complete capture
    ///
    /// The capture must start with a section header block.
    pub fn new(capture: &'a [u8]) -> Result<Self, PcapNgParseError> {
        let mut reader = SliceReader::new(capture);
        let header = BlockHeader::read(&mut reader)?;
        if !header.is_section_header() {
            return Err(PcapNgParseError::UnexpectedBlockId {
                expected: PCAP_NG_MAGIC,
                got: header.block_id,
            });
        }
        let current_section = Self::read_section_header(&mut reader, header)?;
        Ok(Self {
            reader,
            current_section,
            interfaces: Vec::with_capacity(1),
            last_timestamp: Duration::ZERO,
        })
    }
    /// Returns the current section header
    pub fn current_section(&self) -> &SectionHeaderBlock {
        &self.current_section
    }
    /// Returns the interfaces described in the current section
    pub fn interfaces(&self) -> &[InterfaceDescriptionBlock] {
        &self.interfaces
    }
    fn read_section_header(
        reader: &mut SliceReader<'a>,
        header: BlockHeader,
    ) -> Result<SectionHeaderBlock, PcapNgParseError> {
        // The block length can only be read once the byte-order magic is known
        let byte_order_magic = reader.peek_array::<4>().ok_or(Truncated {
            name: "byte-order magic",
            needed: 4,
            available: reader.remaining(),
        })?;
        let byte_order = Endianness::from_pcap_ng_bytes(&byte_order_magic)?;
        let raw = RawBlock::read_with_header(reader, header, byte_order)?;
        let section = SectionHeaderBlock::parse(&raw, byte_order)?;
        debug!(
            byte_order = ?section.byte_order,
            version = %section.version,
            "Read pcapng section header"
        );
        Ok(section)
    }
    /// Reads the next block
    ///
    /// `Ok(None)` only when the capture ends exactly on a block boundary.
    pub fn next_block(&mut self) -> Result<Option<PcapNgBlock<'a>>, PcapNgParseError> {
        if self.reader.is_empty() {
            return Ok(None);
        }
        let header = BlockHeader::read(&mut self.reader)?;
        if header.is_section_header() {
            let section = Self::read_section_header(&mut self.reader, header)?;
            self.interfaces.clear();
            self.current_section = section.clone();
            return Ok(Some(PcapNgBlock::SectionHeader(section)));
        }
        let byte_order = self.current_section.byte_order;
        let raw = RawBlock::read_with_header(&mut self.reader, header, byte_order)?;
        let block = PcapNgBlock::parse(&raw, byte_order)?;
        if let PcapNgBlock::InterfaceDescription(interface) = &block {
            debug!(
                interface_id = self.interfaces.len(),
                link_type = ?interface.link_type,
                resolution = ?interface.timestamp_resolution,
                "Read pcapng interface description"
            );
            self.interfaces.push(interface.clone());
        }
        Ok(Some(block))
    }
    fn interface(&self, interface_id: u32) -> Result<&InterfaceDescriptionBlock, PcapNgParseError> {
        self.interfaces
            .get(interface_id as usize)
            .ok_or(PcapNgParseError::UnknownInterface(interface_id))
    }
    /// Reads the next packet from the pcapng file
    ///
    /// If any other block types are encountered, they will be skipped until a packet block is found
    ///
    /// When Ok(None) is returned, it indicates the end of the file has been reached
    pub fn next_frame(&mut self) -> Result<Option<Frame<'a>>, PcapNgParseError> {
        while let Some(block) = self.next_block()? {
            match block {
                PcapNgBlock::EnhancedPacket(packet) => {
                    let interface = self.interface(packet.interface_id)?;
                    let frame = Frame {
                        timestamp: interface.timestamp(packet.timestamp_high, packet.timestamp_low),
                        original_length: packet.original_length,
                        link_type: interface.link_type,
                        data: packet.content,
                    };
                    self.last_timestamp = frame.timestamp;
                    return Ok(Some(frame));
                }
                PcapNgBlock::SimplePacket(packet) => {
                    let interface = self.interface(0)?;
                    return Ok(Some(Frame {
                        timestamp: self.last_timestamp,
                        original_length: packet.original_length,
                        link_type: interface.link_type,
                        data: packet.content(interface.snap_length),
                    }));
                }
                PcapNgBlock::Generic(generic) => {
                    trace!(
                        block_id = generic.block_id,
                        block_length = generic.block_length,
                        "Skipping pcapng block"
                    );
                }
                PcapNgBlock::SectionHeader(_) | PcapNgBlock::InterfaceDescription(_) => {}
            }
        }
        Ok(None)
    }
}
