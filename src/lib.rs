//! Per-address traffic statistics from pcap and pcapng captures
//!
//! ```no_run
//! let capture = std::fs::read("capture.pcapng")?;
//! let stats = pcap_analyzer::analyze(&capture, "192.168.1.5")?;
//! for (peer, count) in stats.top_sent_peers(20) {
//!     println!("{peer}: {count}");
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod analyzer;
pub mod byte_order;
pub mod capture;
pub mod decode;
pub mod frame;
pub mod link_type;
pub mod pcap;
pub mod pcap_ng;
pub mod utils;
mod version;
pub use analyzer::{AnalyzeError, Analyzer, AnalyzerOptions, TrafficStats, analyze};
pub use capture::{CaptureFormat, FormatError, FrameReader, PcapNgLinkType};
pub use frame::Frame;
pub use utils::Truncated;
pub use version::Version;

#[cfg(test)]
pub(crate) mod test_helpers;
