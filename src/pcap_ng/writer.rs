use std::{io, io::Write, time::Duration};

use crate::{
    byte_order::{ByteOrder, Endianness, WriteExt},
    link_type::LinkType,
    pcap_ng::{
        blocks::{
            Block, EnhancedPacket, InterfaceDescriptionBlock, InterfaceOptionCodes,
            SectionHeaderBlock, SimplePacket, TimestampResolution,
        },
        options::{BlockOption, BlockOptions},
        pad_length_to_32_bits,
    },
};
/// Writes a pcapng capture
///
/// Writes a single section header on creation. Packets are written as
/// enhanced packet blocks unless [PcapNgWriter::write_simple_packet] is used.
#[derive(Debug)]
pub struct PcapNgWriter<W: Write> {
    target: W,
    byte_order: Endianness,
    interfaces: Vec<InterfaceDescriptionBlock>,
}
impl<W: Write> PcapNgWriter<W> {
    pub fn new(target: W, byte_order: Endianness) -> Result<Self, io::Error> {
        let mut writer = Self {
            target,
            byte_order,
            interfaces: Vec::new(),
        };
        writer.start_section(byte_order)?;
        Ok(writer)
    }
    /// Starts a new section. Interfaces from the previous section can no longer be used.
    pub fn start_section(&mut self, byte_order: Endianness) -> Result<(), io::Error> {
        self.byte_order = byte_order;
        self.interfaces.clear();
        let body = SectionHeaderBlock::new(byte_order).body_bytes()?;
        self.write_raw_block(SectionHeaderBlock::block_id(), &body)
    }
    /// Describes a new interface and returns its ID
    ///
    /// Without a resolution the pcapng default of microseconds is used.
    pub fn add_interface(
        &mut self,
        link_type: LinkType,
        snap_length: u32,
        resolution: Option<TimestampResolution>,
    ) -> Result<u32, io::Error> {
        let mut interface = InterfaceDescriptionBlock::new(link_type, snap_length);
        if let Some(resolution) = resolution {
            interface.timestamp_resolution = resolution;
            interface.options = BlockOptions(vec![BlockOption {
                code: InterfaceOptionCodes::IfTimestampResolution as u16,
                length: 1,
                pen: None,
                value: vec![resolution.to_option_byte()],
            }]);
        }
        let body = interface.body_bytes(self.byte_order)?;
        self.write_raw_block(InterfaceDescriptionBlock::block_id(), &body)?;
        self.interfaces.push(interface);
        Ok(self.interfaces.len() as u32 - 1)
    }
    /// Writes an enhanced packet block stamped with `timestamp` (time since the Unix epoch)
    ///
    /// Interfaces that were never described are written with microsecond
    /// timestamps so that malformed captures can be produced on purpose.
    pub fn write_packet(
        &mut self,
        interface_id: u32,
        timestamp: Duration,
        content: &[u8],
    ) -> Result<(), io::Error> {
        let resolution = self
            .interfaces
            .get(interface_id as usize)
            .map(|interface| interface.timestamp_resolution)
            .unwrap_or_default();
        let units = resolution.units_from_duration(timestamp);
        let packet = EnhancedPacket {
            interface_id,
            timestamp_high: (units >> 32) as u32,
            timestamp_low: units as u32,
            captured_length: content.len() as u32,
            original_length: content.len() as u32,
            content,
            options: BlockOptions::default(),
        };
        let body = packet.body_bytes(self.byte_order)?;
        self.write_raw_block(EnhancedPacket::block_id(), &body)
    }
    /// Writes a simple packet block, which always belongs to interface 0
    pub fn write_simple_packet(&mut self, content: &[u8]) -> Result<(), io::Error> {
        let padded_length = pad_length_to_32_bits(content.len());
        let mut body = Vec::with_capacity(4 + padded_length);
        body.extend_from_slice(&self.byte_order.u32_to_bytes(content.len() as u32));
        body.extend_from_slice(content);
        body.resize(4 + padded_length, 0);
        self.write_raw_block(SimplePacket::block_id(), &body)
    }
    /// Writes any block from its ID and body. The body is padded to 32 bits.
    pub fn write_raw_block(&mut self, block_id: u32, body: &[u8]) -> Result<(), io::Error> {
        let padded_length = pad_length_to_32_bits(body.len());
        let block_length = (padded_length + 12) as u32;
        self.target.write_u32(block_id, self.byte_order)?;
        self.target.write_u32(block_length, self.byte_order)?;
        self.target.write_all(body)?;
        self.target
            .write_all(&[0u8; 3][..padded_length - body.len()])?;
        self.target.write_u32(block_length, self.byte_order)?;
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.target
    }
}
