//! Byte order handling for pcap and pcapng captures
//!
//! Classic pcap fixes the byte order for the whole file through its magic
//! number. Pcapng fixes it per section through the byte-order magic.
use std::io::Write;

use thiserror::Error;

/// Fixed width integer conversions in one byte order
pub trait ByteOrder: Clone + Copy {
    fn u16_from_bytes(self, bytes: [u8; 2]) -> u16;
    fn u16_to_bytes(self, value: u16) -> [u8; 2];
    fn u32_from_bytes(self, bytes: [u8; 4]) -> u32;
    fn u32_to_bytes(self, value: u32) -> [u8; 4];
    fn u64_from_bytes(self, bytes: [u8; 8]) -> u64;
    fn u64_to_bytes(self, value: u64) -> [u8; 8];
}

macro_rules! fixed_byte_order {
    ($name:ident, $from:ident, $to:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub struct $name;
        impl ByteOrder for $name {
            fn u16_from_bytes(self, bytes: [u8; 2]) -> u16 {
                u16::$from(bytes)
            }
            fn u16_to_bytes(self, value: u16) -> [u8; 2] {
                value.$to()
            }
            fn u32_from_bytes(self, bytes: [u8; 4]) -> u32 {
                u32::$from(bytes)
            }
            fn u32_to_bytes(self, value: u32) -> [u8; 4] {
                value.$to()
            }
            fn u64_from_bytes(self, bytes: [u8; 8]) -> u64 {
                u64::$from(bytes)
            }
            fn u64_to_bytes(self, value: u64) -> [u8; 8] {
                value.$to()
            }
        }
    };
}
fixed_byte_order!(BigEndian, from_be_bytes, to_be_bytes);
fixed_byte_order!(LittleEndian, from_le_bytes, to_le_bytes);

/// Byte order only known once a capture or section header has been read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endianness {
    #[default]
    LittleEndian,
    BigEndian,
}
macro_rules! dispatch {
    ($($method:ident($arg:ty) -> $ret:ty),* $(,)?) => {
        impl ByteOrder for Endianness {
            $(
                fn $method(self, value: $arg) -> $ret {
                    match self {
                        Endianness::BigEndian => BigEndian.$method(value),
                        Endianness::LittleEndian => LittleEndian.$method(value),
                    }
                }
            )*
        }
    };
}
dispatch!(
    u16_from_bytes([u8; 2]) -> u16,
    u16_to_bytes(u16) -> [u8; 2],
    u32_from_bytes([u8; 4]) -> u32,
    u32_to_bytes(u32) -> [u8; 4],
    u64_from_bytes([u8; 8]) -> u64,
    u64_to_bytes(u64) -> [u8; 8],
);

/// A field slice did not have the width of the integer read from it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unexpected Size for {name}: expected {expected}, got {got}")]
pub struct UnexpectedSize {
    pub name: &'static str,
    pub expected: usize,
    pub got: usize,
}

/// Slice based reads, for fields whose offsets are computed at runtime
pub(crate) trait ExtendedByteOrder: ByteOrder {
    fn try_u16_from_bytes(self, bytes: &[u8]) -> Result<u16, UnexpectedSize> {
        Ok(self.u16_from_bytes(sized(bytes, "u16")?))
    }
    fn try_u32_from_bytes(self, bytes: &[u8]) -> Result<u32, UnexpectedSize> {
        Ok(self.u32_from_bytes(sized(bytes, "u32")?))
    }
    fn try_u64_from_bytes(self, bytes: &[u8]) -> Result<u64, UnexpectedSize> {
        Ok(self.u64_from_bytes(sized(bytes, "u64")?))
    }
}
impl<B: ByteOrder> ExtendedByteOrder for B {}

fn sized<const SIZE: usize>(bytes: &[u8], name: &'static str) -> Result<[u8; SIZE], UnexpectedSize> {
    bytes.try_into().map_err(|_| UnexpectedSize {
        name,
        expected: SIZE,
        got: bytes.len(),
    })
}

pub trait WriteExt {
    fn write_u16<B: ByteOrder>(&mut self, value: u16, byte_order: B) -> Result<(), std::io::Error>;

    fn write_u32<B: ByteOrder>(&mut self, value: u32, byte_order: B) -> Result<(), std::io::Error>;
}
impl<W: Write> WriteExt for W {
    fn write_u16<B: ByteOrder>(&mut self, value: u16, byte_order: B) -> Result<(), std::io::Error> {
        self.write_all(&byte_order.u16_to_bytes(value))
    }
    fn write_u32<B: ByteOrder>(&mut self, value: u32, byte_order: B) -> Result<(), std::io::Error> {
        self.write_all(&byte_order.u32_to_bytes(value))
    }
}
