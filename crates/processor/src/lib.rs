//! # Processor
//!
//! Pipeline orchestration module.
//!
//! Responsibilities:
//! - Register consumers and assign their ids
//! - Start the reader thread and, for several consumers, one thread each
//! - Join every thread and collect a `RunReport`
//!
//! ## Usage Example
//!
//! ```ignore
//! use processor::TrajectoryProcessor;
//! use ingestion::FormatOpener;
//! use std::sync::Arc;
//!
//! let config = config_loader::ConfigLoader::load_config(path)?;
//! let mut processor = TrajectoryProcessor::new(config, Arc::new(FormatOpener::new()));
//! processor.add_consumer(consumer);
//! let report = processor.run()?;
//! report.print_summary();
//! ```

mod error;
mod orchestrator;
mod report;

pub use error::{ProcessorError, Result};
pub use orchestrator::TrajectoryProcessor;
pub use report::RunReport;
