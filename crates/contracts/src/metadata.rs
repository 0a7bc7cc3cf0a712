//! FrameContainer - unit of transfer through the pipeline

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::RawFrame;

/// Per-frame metadata
///
/// Computed by the reader once a frame passes the filter; immutable afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameMetadata {
    /// Index over every frame read from disk, rejected ones included
    pub absolute_frame: u64,

    /// Frame time (source timestamp or custom override), ps
    pub absolute_time: f64,

    /// Index over accepted frames only
    pub valid_frame: u64,

    /// Absolute index of the first accepted frame
    pub first_frame: u64,

    /// Time of the first accepted frame
    pub first_time: f64,

    /// Absolute index of the most recently accepted frame
    pub last_frame: u64,

    /// Time of the most recently accepted frame
    pub last_time: f64,

    /// Configured window size in frames (pass-through)
    pub window_size_frames: Option<u64>,

    /// Configured window size in time (pass-through)
    pub window_size_time: Option<f64>,
}

impl FrameMetadata {
    /// Simulated time elapsed between the first and the last accepted frame
    pub fn elapsed_time(&self) -> f64 {
        self.last_time - self.first_time
    }

    /// Number of accepted frames up to and including this one
    pub fn frames_accepted(&self) -> u64 {
        self.valid_frame + 1
    }
}

/// Frame plus metadata
///
/// Created by the reader and shared read-only once enqueued. Fan-out clones
/// the `Arc`, never the payload.
#[derive(Debug)]
pub struct FrameContainer {
    frame: RawFrame,
    meta: FrameMetadata,
}

/// Reference-counted handle passed through channels
pub type SharedFrame = Arc<FrameContainer>;

impl FrameContainer {
    /// Wrap a frame and its metadata
    pub fn new(frame: RawFrame, meta: FrameMetadata) -> Self {
        Self { frame, meta }
    }

    /// Wrap and share in one step
    pub fn shared(frame: RawFrame, meta: FrameMetadata) -> SharedFrame {
        Arc::new(Self::new(frame, meta))
    }

    /// Frame payload
    pub fn frame(&self) -> &RawFrame {
        &self.frame
    }

    /// Frame metadata
    pub fn meta(&self) -> &FrameMetadata {
        &self.meta
    }
}
