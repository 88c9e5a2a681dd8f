use std::{net::IpAddr, time::Duration};

use crate::frame::Frame;

/// Which way a frame moved relative to the target
///
/// Peers are canonical: an IPv4-mapped IPv6 peer is keyed as IPv4.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The target is the source. `bytes` is the captured frame length.
    Sent { second: u64, peer: IpAddr, bytes: u64 },
    /// The target is the destination
    Received { second: u64, peer: IpAddr },
}

/// Decides whether a frame was sent or received by the target
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    target: IpAddr,
    epoch: Duration,
}
impl Classifier {
    /// `epoch` is the timestamp of the first frame of the capture
    pub fn new(target: IpAddr, epoch: Duration) -> Self {
        Self {
            target: target.to_canonical(),
            epoch,
        }
    }
    pub fn target(&self) -> IpAddr {
        self.target
    }
    fn is_target(&self, address: IpAddr) -> bool {
        address.to_canonical() == self.target
    }
    /// `None` for frames without IP addresses, frames not involving the
    /// target, and frames the target sent to itself
    pub fn classify(&self, frame: &Frame<'_>) -> Option<Direction> {
        let addresses = frame.addresses()?;
        let second = frame.relative_second(self.epoch);
        match (
            self.is_target(addresses.source),
            self.is_target(addresses.destination),
        ) {
            (true, false) => Some(Direction::Sent {
                second,
                peer: addresses.destination.to_canonical(),
                bytes: frame.captured_length() as u64,
            }),
            (false, true) => Some(Direction::Received {
                second,
                peer: addresses.source.to_canonical(),
            }),
            _ => None,
        }
    }
}
