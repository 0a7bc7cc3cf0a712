//! # Contracts
//!
//! Frozen interface contracts, defining inter-module data structures and traits.
//! All business crates can only depend on this crate, reverse dependencies are prohibited.
//!
//! ## Time Model
//! - Uses the trajectory timestamp (picoseconds, f64) as primary clock
//! - `absolute_frame` counts every frame read from disk, `valid_frame` only accepted ones

mod config;
mod consumer;
mod error;
mod frame;
mod metadata;
mod options;
mod source;

pub use config::*;
pub use consumer::{Consumer, ConsumerId};
pub use error::*;
pub use frame::{PeriodicBox, RawFrame};
pub use metadata::{FrameContainer, FrameMetadata, SharedFrame};
pub use options::*;
pub use source::{FrameSource, ReadContent, SourceOpener};
