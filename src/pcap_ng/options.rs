use crate::{
    byte_order::{ByteOrder, ExtendedByteOrder, WriteExt},
    pcap_ng::pad_length_to_32_bits,
    utils::{SliceReader, Truncated},
};
use std::io::Write;
use thiserror::Error;

macro_rules! define_options_enum {
    (
        $(#[$docs:meta])*
        enum $name:ident {
            $(
                $(#[$variant_docs:meta])*
                $variant:ident = $value:literal,
            )*
        }
    ) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        $(#[$docs])*
        pub enum $name {
            $(
                $(#[$variant_docs])*
                $variant = $value,
            )*
        }

        impl TryFrom<u16> for $name {
            type Error = ();

            fn try_from(value: u16) -> Result<Self, Self::Error> {
                match value {
                    $(
                        $value => Ok(Self::$variant),
                    )*
                    _ => Err(()),
                }
            }
        }

    };
}
pub(crate) use define_options_enum;
define_options_enum! {
    enum StandardOptions {
        EndOfOptions = 0,
        Comment = 1,
        CustomUTF8Copied = 2988,
        CustomBinaryCopied = 2989,
        CustomUTF8NotCopied = 19372,
        CustomBinaryNotCopied = 19373,
    }
}
impl StandardOptions {
    pub fn is_custom(&self) -> bool {
        matches!(
            self,
            Self::CustomBinaryCopied
                | Self::CustomBinaryNotCopied
                | Self::CustomUTF8Copied
                | Self::CustomUTF8NotCopied
        )
    }
}
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockOption {
    pub code: u16,
    pub length: u16,
    /// Private Enterprise Number (PEN)
    ///
    /// Only present if the option is a custom option
    pub pen: Option<u32>,
    /// The value, without padding and without the PEN of custom options
    pub value: Vec<u8>,
}
#[derive(Debug, Error)]
pub enum OptionParseError {
    #[error(transparent)]
    Truncated(#[from] Truncated),
    #[error(transparent)]
    UnexpectedSize(#[from] crate::byte_order::UnexpectedSize),
}
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockOptions(pub Vec<BlockOption>);
impl BlockOptions {
    /// Parses the options area at the end of a block body
    ///
    /// Stops at the end-of-options marker or when the area is exhausted.
    pub fn parse<B: ByteOrder>(bytes: &[u8], byte_order: B) -> Result<Self, OptionParseError> {
        let mut reader = SliceReader::new(bytes);
        let mut options = Vec::new();
        // Anything shorter than an option header is trailing padding
        while reader.remaining() >= 4 {
            let code = byte_order.try_u16_from_bytes(reader.take(2, "option code")?)?;
            let length = byte_order.try_u16_from_bytes(reader.take(2, "option length")?)?;
            if code == StandardOptions::EndOfOptions as u16 {
                break;
            }
            let padded = reader.take(pad_length_to_32_bits(length as usize), "option value")?;
            let mut value = &padded[..length as usize];

            let pen = match StandardOptions::try_from(code) {
                Ok(option) if option.is_custom() && value.len() >= 4 => {
                    let pen = byte_order.try_u32_from_bytes(&value[..4])?;
                    value = &value[4..];
                    Some(pen)
                }
                _ => None,
            };
            options.push(BlockOption {
                code,
                length,
                pen,
                value: value.to_vec(),
            });
        }
        Ok(Self(options))
    }
    /// First option with the given code
    pub fn get(&self, code: u16) -> Option<&BlockOption> {
        self.0.iter().find(|option| option.code == code)
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    /// Writes the options followed by the end-of-options marker
    ///
    /// Writes nothing when there are no options.
    pub fn write<W: Write, B: ByteOrder>(
        &self,
        writer: &mut W,
        byte_order: B,
    ) -> Result<(), std::io::Error> {
        if self.0.is_empty() {
            return Ok(());
        }
        for option in &self.0 {
            let mut value = Vec::with_capacity(option.value.len() + 4);
            if let Some(pen) = option.pen {
                value.extend_from_slice(&byte_order.u32_to_bytes(pen));
            }
            value.extend_from_slice(&option.value);
            writer.write_u16(option.code, byte_order)?;
            writer.write_u16(value.len() as u16, byte_order)?;
            writer.write_all(&value)?;
            let padding = pad_length_to_32_bits(value.len()) - value.len();
            writer.write_all(&[0u8; 3][..padding])?;
        }
        writer.write_u16(StandardOptions::EndOfOptions as u16, byte_order)?;
        writer.write_u16(0, byte_order)?;
        Ok(())
    }
}
