//! # Dispatcher
//!
//! Frame distribution module.
//!
//! Responsibilities:
//! - Drive each consumer through `Setup -> Running -> Teardown -> Done`
//! - Fan out shared frames to one channel per consumer
//! - Isolate consumer hook errors from the rest of the run

pub mod consumers;
pub mod dispatcher;
pub mod driver;
pub mod error;
pub mod handle;
pub mod metrics;

pub use consumers::{create_consumer, LogConsumer, SummaryConsumer, SummaryConsumerConfig};
pub use contracts::{Consumer, ConsumerId, SharedFrame};
pub use dispatcher::{DispatchSummary, Dispatcher};
pub use driver::{ConsumerDriver, ConsumerReport, LifecycleState};
pub use error::DispatcherError;
pub use handle::ConsumerHandle;
pub use metrics::{ConsumerMetrics, MetricsSnapshot};
