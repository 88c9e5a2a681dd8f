//! Format detection and a single frame source over both container formats
use std::{fmt, iter::FusedIterator};

use thiserror::Error;
use tracing::debug;

use crate::{
    frame::Frame,
    link_type::LinkType,
    pcap::{PcapParseError, PcapReader},
    pcap_ng::{PCAP_NG_MAGIC, PcapNgParseError, PcapNgReader},
};

#[derive(Debug, Error)]
pub enum FormatError {
    /// Not even a magic number could be read
    #[error("Capture is too short to contain a magic number ({0} bytes)")]
    TooShort(usize),
    #[error(transparent)]
    Pcap(#[from] PcapParseError),
    #[error(transparent)]
    PcapNg(#[from] PcapNgParseError),
}

/// The two supported container formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CaptureFormat {
    Pcap,
    PcapNg,
}
impl CaptureFormat {
    /// Any magic other than the pcapng section header ID is treated as classic pcap.
    /// The pcap reader rejects it later if it is not a valid pcap magic either.
    pub fn from_magic(magic: [u8; 4]) -> Self {
        if magic == PCAP_NG_MAGIC {
            CaptureFormat::PcapNg
        } else {
            CaptureFormat::Pcap
        }
    }
    pub fn detect(capture: &[u8]) -> Result<Self, FormatError> {
        let magic = capture
            .first_chunk::<4>()
            .ok_or(FormatError::TooShort(capture.len()))?;
        Ok(Self::from_magic(*magic))
    }
}
impl fmt::Display for CaptureFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CaptureFormat::Pcap => f.write_str("pcap"),
            CaptureFormat::PcapNg => f.write_str("pcapng"),
        }
    }
}

/// How the link type of pcapng frames is chosen
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PcapNgLinkType {
    /// Every pcapng frame is decoded as Ethernet regardless of its interface
    #[default]
    AssumeEthernet,
    /// Use the link type of the interface the frame was captured on
    FromInterface,
}

#[derive(Debug, Clone)]
enum Inner<'a> {
    Pcap(PcapReader<'a>),
    PcapNg {
        reader: PcapNgReader<'a>,
        link_type: PcapNgLinkType,
    },
}

/// Frames of a capture in container order
///
/// Yields `None` forever after the end of the capture or the first error.
#[derive(Debug, Clone)]
pub struct FrameReader<'a> {
    inner: Inner<'a>,
    finished: bool,
}
impl<'a> FrameReader<'a> {
    pub fn new(capture: &'a [u8], pcapng_link_type: PcapNgLinkType) -> Result<Self, FormatError> {
        let format = CaptureFormat::detect(capture)?;
        let inner = match format {
            CaptureFormat::Pcap => Inner::Pcap(PcapReader::new(capture)?),
            CaptureFormat::PcapNg => {
                debug!(link_type = ?pcapng_link_type, "Opening pcapng capture");
                Inner::PcapNg {
                    reader: PcapNgReader::new(capture)?,
                    link_type: pcapng_link_type,
                }
            }
        };
        Ok(Self {
            inner,
            finished: false,
        })
    }
    pub fn format(&self) -> CaptureFormat {
        match self.inner {
            Inner::Pcap(_) => CaptureFormat::Pcap,
            Inner::PcapNg { .. } => CaptureFormat::PcapNg,
        }
    }
    /// Reads the next frame
    ///
    /// `Ok(None)` when the capture ended cleanly on a record boundary.
    pub fn next_frame(&mut self) -> Result<Option<Frame<'a>>, FormatError> {
        if self.finished {
            return Ok(None);
        }
        let result = match &mut self.inner {
            Inner::Pcap(reader) => reader.next_frame().map_err(FormatError::from),
            Inner::PcapNg { reader, link_type } => {
                reader.next_frame().map_err(FormatError::from).map(|frame| {
                    frame.map(|mut frame| {
                        if *link_type == PcapNgLinkType::AssumeEthernet {
                            frame.link_type = LinkType::Ethernet;
                        }
                        frame
                    })
                })
            }
        };
        match &result {
            Ok(Some(_)) => {}
            Ok(None) => self.finished = true,
            Err(error) => {
                debug!(%error, "Capture stopped on a malformed record");
                self.finished = true;
            }
        }
        result
    }
}
impl<'a> Iterator for FrameReader<'a> {
    type Item = Result<Frame<'a>, FormatError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_frame().transpose()
    }
}
impl FusedIterator for FrameReader<'_> {}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::{
        pcap::file_header::PcapFileHeader,
        test_helpers::{ethernet_ipv4, pcap_capture, pcapng_capture},
        utils::Truncated,
    };

    #[test]
    fn detect() -> anyhow::Result<()> {
        assert_eq!(CaptureFormat::detect(&[0x0A, 0x0D, 0x0D, 0x0A, 0])?, CaptureFormat::PcapNg);
        assert_eq!(CaptureFormat::detect(&[0xD4, 0xC3, 0xB2, 0xA1])?, CaptureFormat::Pcap);
        assert_eq!(CaptureFormat::detect(&[0xDE, 0xAD, 0xBE, 0xEF])?, CaptureFormat::Pcap);
        assert!(matches!(CaptureFormat::detect(&[0x0A, 0x0D]), Err(FormatError::TooShort(2))));
        assert!(matches!(CaptureFormat::detect(&[]), Err(FormatError::TooShort(0))));
        Ok(())
    }

    #[test]
    fn pcapng_magic_wins_over_a_pcap_shaped_body() -> anyhow::Result<()> {
        let mut capture = pcap_capture(&[(Duration::from_secs(1), vec![0; 60])])?;
        capture[0..4].copy_from_slice(&PCAP_NG_MAGIC);
        assert_eq!(CaptureFormat::detect(&capture)?, CaptureFormat::PcapNg);
        // The body is not a valid section header so the pcapng reader rejects it
        assert!(matches!(
            FrameReader::new(&capture, PcapNgLinkType::default()),
            Err(FormatError::PcapNg(_))
        ));
        Ok(())
    }

    #[test]
    fn unknown_magic_is_a_pcap_error() {
        let mut capture = [0u8; 24];
        capture[0..4].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(matches!(
            FrameReader::new(&capture, PcapNgLinkType::default()),
            Err(FormatError::Pcap(PcapParseError::InvalidMagicNumber(_)))
        ));
    }

    #[test]
    fn reads_both_formats_in_order() -> anyhow::Result<()> {
        let mut frames = Vec::new();
        for i in 0..5u64 {
            let data = ethernet_ipv4([10, 0, 0, 1], [10, 0, 0, 2], 60 + i as usize)?;
            frames.push((Duration::from_secs(100 + i), data));
        }
        for capture in [pcap_capture(&frames)?, pcapng_capture(LinkType::Ethernet, &frames)?] {
            let read = FrameReader::new(&capture, PcapNgLinkType::default())?
                .collect::<Result<Vec<_>, _>>()?;
            assert_eq!(read.len(), frames.len());
            for (frame, (timestamp, data)) in read.iter().zip(&frames) {
                assert_eq!(frame.timestamp, *timestamp);
                assert_eq!(frame.data, data.as_slice());
            }
        }
        Ok(())
    }

    #[test]
    fn header_only_capture_is_empty() -> anyhow::Result<()> {
        let capture = pcap_capture(&[])?;
        assert_eq!(capture.len(), PcapFileHeader::SIZE);
        let mut reader = FrameReader::new(&capture, PcapNgLinkType::default())?;
        assert_eq!(reader.format(), CaptureFormat::Pcap);
        assert!(reader.next().is_none());
        Ok(())
    }

    #[test]
    fn pcapng_link_type_policy() -> anyhow::Result<()> {
        let capture = pcapng_capture(LinkType::Raw, &[(Duration::from_secs(1), vec![0x45; 20])])?;

        let mut assume = FrameReader::new(&capture, PcapNgLinkType::AssumeEthernet)?;
        let frame = assume.next().ok_or_else(|| anyhow::anyhow!("missing frame"))??;
        assert_eq!(frame.link_type, LinkType::Ethernet);

        let mut from_interface = FrameReader::new(&capture, PcapNgLinkType::FromInterface)?;
        let frame = from_interface
            .next()
            .ok_or_else(|| anyhow::anyhow!("missing frame"))??;
        assert_eq!(frame.link_type, LinkType::Raw);
        Ok(())
    }

    #[test]
    fn fused_after_error() -> anyhow::Result<()> {
        let frames = vec![(Duration::from_secs(1), vec![0; 60]); 3];
        let mut capture = pcap_capture(&frames)?;
        // Cut into the last record's data
        capture.truncate(capture.len() - 20);

        let mut reader = FrameReader::new(&capture, PcapNgLinkType::default())?;
        assert!(matches!(reader.next(), Some(Ok(_))));
        assert!(matches!(reader.next(), Some(Ok(_))));
        assert!(matches!(
            reader.next(),
            Some(Err(FormatError::Pcap(PcapParseError::Truncated(Truncated { .. }))))
        ));
        assert!(reader.next().is_none());
        assert!(reader.next().is_none());
        Ok(())
    }
}
