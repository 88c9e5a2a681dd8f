//! Zero-copy reading helpers shared by both container parsers
use thiserror::Error;

/// The capture ended in the middle of a structure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Truncated {name}: needed {needed} bytes, only {available} remaining")]
pub struct Truncated {
    pub name: &'static str,
    pub needed: usize,
    pub available: usize,
}

/// A forward only reader over an in-memory capture
///
/// Hands out sub-slices of the original buffer so packet data is never copied.
#[derive(Debug, Clone)]
pub struct SliceReader<'a> {
    bytes: &'a [u8],
    position: usize,
}
impl<'a> SliceReader<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, position: 0 }
    }
    /// Number of bytes that have been consumed
    pub fn position(&self) -> usize {
        self.position
    }
    /// Number of bytes left to read
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.position
    }
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }
    /// Takes the next `len` bytes
    pub fn take(&mut self, len: usize, name: &'static str) -> Result<&'a [u8], Truncated> {
        let available = self.remaining();
        if len > available {
            return Err(Truncated {
                name,
                needed: len,
                available,
            });
        }
        let slice = &self.bytes[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }
    /// Takes the next `SIZE` bytes as an array
    pub fn take_array<const SIZE: usize>(
        &mut self,
        name: &'static str,
    ) -> Result<[u8; SIZE], Truncated> {
        let mut array = [0u8; SIZE];
        array.copy_from_slice(self.take(SIZE, name)?);
        Ok(array)
    }
    /// Looks at the next `SIZE` bytes without consuming them
    pub fn peek_array<const SIZE: usize>(&self) -> Option<[u8; SIZE]> {
        let slice = self.bytes.get(self.position..self.position + SIZE)?;
        let mut array = [0u8; SIZE];
        array.copy_from_slice(slice);
        Some(array)
    }
}
