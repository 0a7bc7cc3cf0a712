//! Reader task
//!
//! Opens the trajectory files in order, numbers every frame read with a
//! global absolute index, applies the time override and the filter, stamps
//! metadata on accepted frames and pushes them into the primary channel.
//! Exactly one stop is posted when reading ends, whatever the reason.

use std::path::PathBuf;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use contracts::{
    ContractError, FrameContainer, PipelineConfig, ReadContent, SourceOpener, TimeOverride,
};
use tracing::{debug, error, info, instrument, warn};

use crate::channel::FrameSender;
use crate::error::Result;
use crate::filter::{FrameFilter, MetadataTracker};
use crate::metrics::ReaderMetrics;

/// Name of the reader thread
pub const READER_THREAD_NAME: &str = "trajectory-reader";

/// Why the reader stopped
#[derive(Debug, Clone, PartialEq)]
pub enum StopReason {
    /// Every trajectory file was read to the end
    EndOfData,

    /// A frame past the last frame/time was read; remaining files are not opened
    EndOfInterval {
        /// Absolute index of the frame that ended the interval
        frame: u64,
    },

    /// Every receiver of the primary channel is gone
    DownstreamClosed,

    /// A source could not be opened or read
    Failed(String),
}

/// Result of a reader run
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderOutcome {
    /// Frames read from sources
    pub frames_read: u64,

    /// Frames accepted by the filter and delivered to the channel
    pub frames_accepted: u64,

    /// Trajectory files opened
    pub files_opened: u64,

    /// Why reading ended
    pub stop_reason: StopReason,
}

impl ReaderOutcome {
    /// Whether the reader ended on an I/O failure
    pub fn is_failure(&self) -> bool {
        matches!(self.stop_reason, StopReason::Failed(_))
    }
}

/// Reads trajectory files into the primary channel
pub struct ReaderTask {
    files: Vec<PathBuf>,
    filter: FrameFilter,
    tracker: MetadataTracker,
    time_override: Option<TimeOverride>,
    log_interval: Option<u64>,
    opener: Arc<dyn SourceOpener>,
    tx: FrameSender,
    metrics: Arc<ReaderMetrics>,
}

impl ReaderTask {
    /// Create a reader for `config`
    pub fn new(config: &PipelineConfig, opener: Arc<dyn SourceOpener>, tx: FrameSender) -> Self {
        Self {
            files: config.trajectory_files.clone(),
            filter: FrameFilter::new(config.bounds),
            tracker: MetadataTracker::new(config.window),
            time_override: config.time_override,
            log_interval: config.log_interval.filter(|n| *n > 0),
            opener,
            tx,
            metrics: Arc::new(ReaderMetrics::new()),
        }
    }

    /// Shared counters, readable while the reader runs
    pub fn metrics(&self) -> Arc<ReaderMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run on a dedicated thread
    ///
    /// If the thread cannot be started the task is dropped, which closes
    /// the channel.
    pub fn spawn(self) -> Result<JoinHandle<ReaderOutcome>> {
        let handle = thread::Builder::new()
            .name(READER_THREAD_NAME.to_string())
            .spawn(move || self.run())?;
        Ok(handle)
    }

    /// Read everything, then post the stop
    #[instrument(name = "reader_run", skip(self), fields(files = self.files.len()))]
    pub fn run(mut self) -> ReaderOutcome {
        let stop_reason = match self.read_all() {
            Ok(reason) => reason,
            Err(e) => {
                error!(error = %e, "reading trajectory failed");
                StopReason::Failed(e.to_string())
            }
        };

        self.tx.send_stop();

        let snapshot = self.metrics.snapshot();
        info!(
            frames_read = snapshot.frames_read,
            frames_accepted = snapshot.frames_accepted,
            files_opened = snapshot.files_opened,
            stop_reason = ?stop_reason,
            "reader finished"
        );

        ReaderOutcome {
            frames_read: snapshot.frames_read,
            frames_accepted: snapshot.frames_accepted,
            files_opened: snapshot.files_opened,
            stop_reason,
        }
    }

    fn read_all(&mut self) -> std::result::Result<StopReason, ContractError> {
        let mut absolute_frame: u64 = 0;
        let files = std::mem::take(&mut self.files);

        for path in &files {
            let mut source = self.opener.open(path)?;
            self.metrics.record_file_opened();
            debug!(path = %path.display(), "trajectory file opened");

            while let Some(mut frame) = source.read(ReadContent::trajectory())? {
                let fr = absolute_frame;
                absolute_frame += 1;
                self.metrics.record_read();

                if let Some(time_override) = self.time_override {
                    frame.time = time_override.time_at(fr);
                }
                let t = frame.time;

                if self.log_interval.is_some_and(|n| fr % n == 0) {
                    info!(frame = fr, time = t, "loaded frame");
                }

                if self.filter.is_end_of_interval(fr, t) {
                    debug!(frame = fr, time = t, "end of interval");
                    return Ok(StopReason::EndOfInterval { frame: fr });
                }

                if !self.filter.is_frame_valid(fr, t) {
                    self.metrics.record_rejected();
                    continue;
                }

                let meta = self.tracker.accept(fr, t);
                if let Err(e) = self.tx.send(FrameContainer::shared(frame, meta)) {
                    warn!(error = %e, frame = fr, "downstream closed, stopping reader");
                    return Ok(StopReason::DownstreamClosed);
                }
                self.metrics.record_accepted(fr);
                observability::record_channel_depth(self.tx.name(), self.tx.len());
            }
        }

        Ok(StopReason::EndOfData)
    }
}
