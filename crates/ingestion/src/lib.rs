//! # Ingestion
//!
//! Trajectory reading module.
//!
//! Responsibilities:
//! - Open trajectory files in order through a `SourceOpener`
//! - Select frames by range, time window and stride
//! - Stamp `FrameMetadata` on accepted frames
//! - Push shared frames into a bounded channel with a stop sentinel
//!
//! ## Usage Example
//!
//! ```ignore
//! use ingestion::{channel, FormatOpener, ReaderTask};
//! use std::sync::Arc;
//!
//! let (tx, rx) = channel("primary", config.buffer_size);
//! let reader = ReaderTask::new(&config, Arc::new(FormatOpener::new()), tx).spawn()?;
//!
//! for frame in rx {
//!     println!("frame {}", frame.meta().absolute_frame);
//! }
//! let outcome = reader.join();
//! ```

mod channel;
mod error;
mod filter;
mod metrics;
mod mock;
mod reader;
mod sources;

// Re-exports
pub use channel::{channel, ChannelReceiver, ChannelSender, FrameReceiver, FrameSender};
pub use error::{IngestionError, Result};
pub use filter::{FrameFilter, MetadataTracker};
pub use metrics::{ReaderMetrics, ReaderSnapshot};
pub use mock::{MockOpener, MockSource, MockTrajectory};
pub use reader::{ReaderOutcome, ReaderTask, StopReason, READER_THREAD_NAME};
pub use sources::{FormatOpener, XyzSource};
