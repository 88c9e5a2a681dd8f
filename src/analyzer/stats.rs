use std::{collections::BTreeMap, net::IpAddr};

use crate::analyzer::classify::Direction;

/// Traffic counters relative to one target address
///
/// Used both for the partial result of a single worker and for the merged
/// result of a whole capture. Seconds are relative to the first frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct TrafficStats {
    /// Frames sent by the target per second
    pub sent_time: BTreeMap<u64, u64>,
    /// Frames received by the target per second
    pub received_time: BTreeMap<u64, u64>,
    /// Frames sent by the target per destination
    #[cfg_attr(feature = "serde", serde(rename = "sentIP"))]
    pub sent_ip: BTreeMap<IpAddr, u64>,
    /// Frames received by the target per source
    #[cfg_attr(feature = "serde", serde(rename = "receivedIP"))]
    pub received_ip: BTreeMap<IpAddr, u64>,
    /// Captured bytes sent by the target per second
    pub sent_size: BTreeMap<u64, u64>,
}

impl TrafficStats {
    pub fn record(&mut self, direction: Direction) {
        match direction {
            Direction::Sent {
                second,
                peer,
                bytes,
            } => {
                *self.sent_time.entry(second).or_default() += 1;
                *self.sent_size.entry(second).or_default() += bytes;
                *self.sent_ip.entry(peer).or_default() += 1;
            }
            Direction::Received { second, peer } => {
                *self.received_time.entry(second).or_default() += 1;
                *self.received_ip.entry(peer).or_default() += 1;
            }
        }
    }
    /// Adds every counter of `other` into `self`
    ///
    /// Keys missing on either side count as zero, so merging is associative
    /// and commutative.
    pub fn merge(&mut self, other: TrafficStats) {
        add_all(&mut self.sent_time, other.sent_time);
        add_all(&mut self.received_time, other.received_time);
        add_all(&mut self.sent_ip, other.sent_ip);
        add_all(&mut self.received_ip, other.received_ip);
        add_all(&mut self.sent_size, other.sent_size);
    }
    pub fn merge_all(partials: impl IntoIterator<Item = TrafficStats>) -> TrafficStats {
        partials
            .into_iter()
            .fold(TrafficStats::default(), |mut merged, partial| {
                merged.merge(partial);
                merged
            })
    }
    /// True when no frame involving the target was counted
    pub fn is_empty(&self) -> bool {
        self.sent_time.is_empty()
            && self.received_time.is_empty()
            && self.sent_ip.is_empty()
            && self.received_ip.is_empty()
            && self.sent_size.is_empty()
    }
    pub fn total_sent(&self) -> u64 {
        self.sent_time.values().sum()
    }
    pub fn total_received(&self) -> u64 {
        self.received_time.values().sum()
    }
    pub fn total_sent_bytes(&self) -> u64 {
        self.sent_size.values().sum()
    }
    /// The `limit` destinations the target sent the most frames to
    ///
    /// Ordered by count, highest first. Equal counts are ordered by address.
    pub fn top_sent_peers(&self, limit: usize) -> Vec<(IpAddr, u64)> {
        let mut peers: Vec<_> = self
            .sent_ip
            .iter()
            .map(|(address, count)| (*address, *count))
            .collect();
        peers.sort_by(|(a_address, a_count), (b_address, b_count)| {
            b_count.cmp(a_count).then_with(|| a_address.cmp(b_address))
        });
        peers.truncate(limit);
        peers
    }
}

fn add_all<K: Ord>(into: &mut BTreeMap<K, u64>, from: BTreeMap<K, u64>) {
    for (key, value) in from {
        *into.entry(key).or_default() += value;
    }
}
