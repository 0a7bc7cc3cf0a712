//! Frame validity and windowing
//!
//! Pure functions of `(absolute_frame, absolute_time)` against the resolved
//! bounds, plus the per-run metadata counter.

use contracts::{FrameBounds, FrameMetadata, WindowSize};

/// Acceptance and interval-end rules
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameFilter {
    bounds: FrameBounds,
}

impl FrameFilter {
    /// Create a filter over the given bounds
    pub fn new(bounds: FrameBounds) -> Self {
        Self { bounds }
    }

    /// Bounds this filter applies
    pub fn bounds(&self) -> &FrameBounds {
        &self.bounds
    }

    /// Whether a frame is accepted
    ///
    /// Stride is checked against the absolute index, not the valid count.
    pub fn is_frame_valid(&self, frame: u64, time: f64) -> bool {
        let b = &self.bounds;
        b.first_frame.is_none_or(|first| frame >= first)
            && b.first_time.is_none_or(|first| time >= first)
            && b.skip.is_none_or(|skip| frame % skip == 0)
    }

    /// Whether the stream has moved past the configured interval
    pub fn is_end_of_interval(&self, frame: u64, time: f64) -> bool {
        let b = &self.bounds;
        b.last_frame.is_some_and(|last| frame > last) || b.last_time.is_some_and(|last| time > last)
    }
}

/// Assigns metadata to accepted frames
///
/// `valid_frame` starts at 0 with the first accepted frame; the first
/// frame/time are captured once and never change.
#[derive(Debug, Clone, Default)]
pub struct MetadataTracker {
    accepted: u64,
    first: Option<(u64, f64)>,
    window: WindowSize,
}

impl MetadataTracker {
    /// Create a tracker carrying the configured window sizes
    pub fn new(window: WindowSize) -> Self {
        Self {
            accepted: 0,
            first: None,
            window,
        }
    }

    /// Number of frames accepted so far
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Record an accepted frame and build its metadata
    pub fn accept(&mut self, absolute_frame: u64, absolute_time: f64) -> FrameMetadata {
        let (first_frame, first_time) = *self.first.get_or_insert((absolute_frame, absolute_time));
        let valid_frame = self.accepted;
        self.accepted += 1;

        FrameMetadata {
            absolute_frame,
            absolute_time,
            valid_frame,
            first_frame,
            first_time,
            last_frame: absolute_frame,
            last_time: absolute_time,
            window_size_frames: self.window.frames,
            window_size_time: self.window.time,
        }
    }
}
