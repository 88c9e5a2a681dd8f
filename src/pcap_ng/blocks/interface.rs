use std::time::Duration;

use crate::{
    byte_order::{ByteOrder, Endianness, ExtendedByteOrder},
    link_type::LinkType,
    pcap_ng::{
        PcapNgParseError,
        blocks::Block,
        options::{BlockOption, BlockOptions, define_options_enum},
    },
    utils::SliceReader,
};
define_options_enum! {
    /// Options for the Interface Description Block
    enum InterfaceOptionCodes {
        /// The if_name option is a UTF-8 string containing the name of the device used to capture data. The string is not zero-terminated.
        IfName = 2,
        /// The if_description option is a UTF-8 string containing the description of the device used to capture data. The string is not zero-terminated.
        IfDescription = 3,
        IfIPv4Address = 4,
        IfIPv6Address = 5,
        IfMACAddress = 6,
        IfEuiAddr = 7,
        /// The if_speed option is a 64-bit unsigned value indicating the interface speed, in bits per second.
        IfSpeed = 8,
        /// Units of the packet timestamps. Defaults to microseconds.
        IfTimestampResolution = 9,
        IfTZone = 10,
        IfFilter = 11,
        IfOS = 12,
        IfFcsLength = 13,
        /// Seconds to add to every packet timestamp on this interface
        IfTsOffset = 14,
        IfHardware = 15,
        IfTxSpeed = 16,
        IfRxSpeed = 17,
    }
}

/// Units of the 64-bit enhanced packet timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampResolution {
    /// 10^-n seconds
    Decimal(u8),
    /// 2^-n seconds
    Binary(u8),
}
impl Default for TimestampResolution {
    fn default() -> Self {
        Self::MICROSECONDS
    }
}
impl TimestampResolution {
    pub const MICROSECONDS: TimestampResolution = TimestampResolution::Decimal(6);
    pub const NANOSECONDS: TimestampResolution = TimestampResolution::Decimal(9);

    /// Parses the `if_tsresol` option byte
    ///
    /// The most significant bit selects a power of two instead of a power of ten.
    pub fn from_option_byte(byte: u8) -> Result<Self, PcapNgParseError> {
        let resolution = if byte & 0x80 != 0 {
            Self::Binary(byte & 0x7F)
        } else {
            Self::Decimal(byte)
        };
        // Larger exponents can not express a single unit in a u64 count
        match resolution {
            Self::Decimal(exponent) if exponent > 19 => {
                Err(PcapNgParseError::InvalidTimestampResolution(byte))
            }
            Self::Binary(exponent) if exponent > 63 => {
                Err(PcapNgParseError::InvalidTimestampResolution(byte))
            }
            resolution => Ok(resolution),
        }
    }
    pub fn to_option_byte(self) -> u8 {
        match self {
            Self::Decimal(exponent) => exponent,
            Self::Binary(exponent) => exponent | 0x80,
        }
    }
    fn units_per_second(self) -> u128 {
        match self {
            Self::Decimal(exponent) => 10u128.pow(exponent as u32),
            Self::Binary(exponent) => 1u128 << exponent,
        }
    }
    /// Converts a timestamp in these units to a duration, truncating below nanoseconds
    pub fn to_duration(self, units: u64) -> Duration {
        let per_second = self.units_per_second();
        let units = units as u128;
        let seconds = (units / per_second) as u64;
        let nanos = ((units % per_second) * 1_000_000_000 / per_second) as u32;
        Duration::new(seconds, nanos)
    }
    /// Converts a duration to these units, saturating at `u64::MAX`
    pub fn units_from_duration(self, duration: Duration) -> u64 {
        let per_second = self.units_per_second();
        let units = duration.as_secs() as u128 * per_second
            + duration.subsec_nanos() as u128 * per_second / 1_000_000_000;
        u64::try_from(units).unwrap_or(u64::MAX)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceDescriptionBlock {
    pub link_type: LinkType,
    pub reserved: [u8; 2],
    pub snap_length: u32,
    pub timestamp_resolution: TimestampResolution,
    /// Seconds added to every timestamp
    pub timestamp_offset: i64,
    pub options: BlockOptions,
}
impl<'a> Block<'a> for InterfaceDescriptionBlock {
    fn block_id() -> u32 {
        1
    }
    fn minimum_size() -> usize {
        // 12 base + 2 for link_type + 2 for reserved + 4 for snap_length
        20
    }

    fn parse_body(body: &'a [u8], byte_order: Endianness) -> Result<Self, PcapNgParseError> {
        let mut reader = SliceReader::new(body);
        let link_type = LinkType::from(byte_order.try_u16_from_bytes(reader.take(2, "link type")?)?);
        let reserved = reader.take_array::<2>("reserved")?;
        let snap_length = byte_order.try_u32_from_bytes(reader.take(4, "snap length")?)?;
        let options = BlockOptions::parse(reader.take(reader.remaining(), "options")?, byte_order)?;

        let timestamp_resolution = match options.get(InterfaceOptionCodes::IfTimestampResolution as u16)
        {
            Some(BlockOption { value, .. }) if !value.is_empty() => {
                TimestampResolution::from_option_byte(value[0])?
            }
            _ => TimestampResolution::default(),
        };
        let timestamp_offset = match options.get(InterfaceOptionCodes::IfTsOffset as u16) {
            Some(BlockOption { value, .. }) => byte_order.try_u64_from_bytes(value)? as i64,
            None => 0,
        };
        Ok(Self {
            link_type,
            reserved,
            snap_length,
            timestamp_resolution,
            timestamp_offset,
            options,
        })
    }
}
impl InterfaceDescriptionBlock {
    pub fn new(link_type: LinkType, snap_length: u32) -> Self {
        Self {
            link_type,
            reserved: [0; 2],
            snap_length,
            timestamp_resolution: TimestampResolution::default(),
            timestamp_offset: 0,
            options: BlockOptions::default(),
        }
    }
    /// Time since the Unix epoch of a packet captured on this interface
    pub fn timestamp(&self, timestamp_high: u32, timestamp_low: u32) -> Duration {
        let units = ((timestamp_high as u64) << 32) | timestamp_low as u64;
        let timestamp = self.timestamp_resolution.to_duration(units);
        let offset = Duration::from_secs(self.timestamp_offset.unsigned_abs());
        if self.timestamp_offset >= 0 {
            timestamp.saturating_add(offset)
        } else {
            timestamp.saturating_sub(offset)
        }
    }
    /// The block body, excluding header and trailing length
    pub(crate) fn body_bytes(&self, byte_order: Endianness) -> Result<Vec<u8>, std::io::Error> {
        let mut body = Vec::with_capacity(8);
        body.extend_from_slice(&byte_order.u16_to_bytes(self.link_type.code()));
        body.extend_from_slice(&self.reserved);
        body.extend_from_slice(&byte_order.u32_to_bytes(self.snap_length));
        self.options.write(&mut body, byte_order)?;
        Ok(body)
    }
}
