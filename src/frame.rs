use std::time::Duration;

use crate::{
    decode::{AddressPair, decode},
    link_type::LinkType,
};

/// One link-layer frame read from a capture
///
/// The data is borrowed from the capture buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame<'a> {
    /// Capture time as a duration since the Unix epoch
    pub timestamp: Duration,
    /// Length of the frame on the wire. May exceed `data.len()` when the
    /// capture was snapped.
    pub original_length: u32,
    pub link_type: LinkType,
    pub data: &'a [u8],
}
impl Frame<'_> {
    /// Number of bytes actually stored in the capture
    pub fn captured_length(&self) -> usize {
        self.data.len()
    }
    /// Network layer source and destination, if the frame carries IPv4 or IPv6
    pub fn addresses(&self) -> Option<AddressPair> {
        decode(self.link_type, self.data)
    }
    /// Whole seconds elapsed since `epoch`
    ///
    /// The fraction is truncated. Frames stamped before the epoch land in second 0.
    pub fn relative_second(&self, epoch: Duration) -> u64 {
        self.timestamp.saturating_sub(epoch).as_secs()
    }
    #[cfg(feature = "chrono")]
    pub fn datetime(&self) -> Option<chrono::DateTime<chrono::Utc>> {
        chrono::DateTime::from_timestamp(
            i64::try_from(self.timestamp.as_secs()).ok()?,
            self.timestamp.subsec_nanos(),
        )
    }
}
