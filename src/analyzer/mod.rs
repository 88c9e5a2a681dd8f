//! Concurrent classification of the frames of a capture
//!
//! The first frame is read on the calling thread to fix the epoch. The rest
//! are pulled from one shared [FrameReader] by a pool of scoped worker
//! threads, each folding into its own [TrafficStats]. The partial results are
//! merged once every worker has finished.
mod classify;
mod stats;
use std::{
    net::IpAddr,
    num::NonZeroUsize,
    panic,
    str::FromStr,
    sync::{Mutex, PoisonError},
    thread,
};

pub use classify::{Classifier, Direction};
pub use stats::TrafficStats;
use thiserror::Error;
use tracing::{debug, trace};

use crate::capture::{FormatError, FrameReader, PcapNgLinkType};

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Invalid target address: {0:?}")]
    InvalidAddress(String),
    #[error(transparent)]
    Format(#[from] FormatError),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnalyzerOptions {
    pub pcapng_link_type: PcapNgLinkType,
}

/// Parses a target address. Surrounding whitespace is not accepted.
pub fn parse_target(target: &str) -> Result<IpAddr, AnalyzeError> {
    IpAddr::from_str(target).map_err(|_| AnalyzeError::InvalidAddress(target.to_owned()))
}

#[derive(Debug, Clone)]
pub struct Analyzer {
    options: AnalyzerOptions,
    workers: NonZeroUsize,
}
impl Default for Analyzer {
    fn default() -> Self {
        Self::new(AnalyzerOptions::default())
    }
}
impl Analyzer {
    /// The worker pool is sized to the available parallelism of the host
    pub fn new(options: AnalyzerOptions) -> Self {
        let workers = thread::available_parallelism().unwrap_or(NonZeroUsize::MIN);
        Self { options, workers }
    }
    #[cfg(test)]
    pub(crate) fn with_workers(mut self, workers: NonZeroUsize) -> Self {
        self.workers = workers;
        self
    }
    pub fn workers(&self) -> NonZeroUsize {
        self.workers
    }
    /// Counts the traffic sent and received by `target` in `capture`
    ///
    /// The target is validated before the capture is touched. A capture
    /// without frames produces empty statistics.
    pub fn analyze(&self, capture: &[u8], target: &str) -> Result<TrafficStats, AnalyzeError> {
        let target = parse_target(target)?;
        let mut frames = FrameReader::new(capture, self.options.pcapng_link_type)?;
        let Some(first) = frames.next_frame()? else {
            debug!(format = %frames.format(), "Capture contains no frames");
            return Ok(TrafficStats::default());
        };
        let classifier = Classifier::new(target, first.timestamp);
        let mut main = TrafficStats::default();
        if let Some(direction) = classifier.classify(&first) {
            main.record(direction);
        }
        debug!(
            format = %frames.format(),
            %target,
            epoch = ?first.timestamp,
            workers = self.workers.get(),
            "Analyzing capture"
        );

        let source = Mutex::new(frames);
        let partials = thread::scope(|scope| {
            let handles: Vec<_> = (0..self.workers.get())
                .map(|worker| {
                    let source = &source;
                    let classifier = &classifier;
                    scope.spawn(move || run_worker(worker, source, classifier))
                })
                .collect();
            handles
                .into_iter()
                .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
                .collect::<Result<Vec<_>, _>>()
        })?;

        let stats = TrafficStats::merge_all(std::iter::once(main).chain(partials));
        debug!(
            sent = stats.total_sent(),
            received = stats.total_received(),
            sent_bytes = stats.total_sent_bytes(),
            "Analysis complete"
        );
        Ok(stats)
    }
}

/// Pulls frames until the shared reader is exhausted or fails
///
/// The lock is only held while reading, never while decoding.
fn run_worker(
    worker: usize,
    source: &Mutex<FrameReader<'_>>,
    classifier: &Classifier,
) -> Result<TrafficStats, FormatError> {
    let mut stats = TrafficStats::default();
    let mut frames = 0usize;
    loop {
        let next = source.lock().unwrap_or_else(PoisonError::into_inner).next();
        let Some(frame) = next else {
            break;
        };
        let frame = frame?;
        frames += 1;
        if let Some(direction) = classifier.classify(&frame) {
            stats.record(direction);
        }
    }
    trace!(worker, frames, "Worker finished");
    Ok(stats)
}

/// Runs [Analyzer::analyze] with default options
pub fn analyze(capture: &[u8], target: &str) -> Result<TrafficStats, AnalyzeError> {
    Analyzer::default().analyze(capture, target)
}
