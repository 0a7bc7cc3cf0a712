//! Reader counters

use std::sync::atomic::{AtomicU64, Ordering};

/// Reader counters
///
/// Shared with the orchestrator through an `Arc` so progress can be
/// observed while the reader thread runs.
#[derive(Debug, Default)]
pub struct ReaderMetrics {
    /// Frames read from sources, accepted or not
    pub frames_read: AtomicU64,

    /// Frames that passed the filter and were delivered to the channel
    pub frames_accepted: AtomicU64,

    /// Frames rejected by the filter
    pub frames_rejected: AtomicU64,

    /// Trajectory files opened
    pub files_opened: AtomicU64,
}

impl ReaderMetrics {
    /// Create new metrics instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a frame read
    pub fn record_read(&self) {
        self.frames_read.fetch_add(1, Ordering::Relaxed);
        observability::record_frame_read();
    }

    /// Record an accepted frame once it is in the channel
    pub fn record_accepted(&self, absolute_frame: u64) {
        self.frames_accepted.fetch_add(1, Ordering::Relaxed);
        observability::record_frame_accepted(absolute_frame);
    }

    /// Record a rejected frame
    pub fn record_rejected(&self) {
        self.frames_rejected.fetch_add(1, Ordering::Relaxed);
        observability::record_frame_rejected();
    }

    /// Record a file opened
    pub fn record_file_opened(&self) {
        self.files_opened.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot
    pub fn snapshot(&self) -> ReaderSnapshot {
        ReaderSnapshot {
            frames_read: self.frames_read.load(Ordering::Relaxed),
            frames_accepted: self.frames_accepted.load(Ordering::Relaxed),
            frames_rejected: self.frames_rejected.load(Ordering::Relaxed),
            files_opened: self.files_opened.load(Ordering::Relaxed),
        }
    }
}

/// Metrics snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReaderSnapshot {
    pub frames_read: u64,
    pub frames_accepted: u64,
    pub frames_rejected: u64,
    pub files_opened: u64,
}
