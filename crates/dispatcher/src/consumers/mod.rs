//! Consumer implementations
//!
//! Contains LogConsumer and SummaryConsumer, plus the config factory.

mod log;
mod summary;

pub use self::log::LogConsumer;
pub use self::summary::{SummaryConsumer, SummaryConsumerConfig};

use contracts::{Consumer, ConsumerConfig, ConsumerKind};
use tracing::instrument;

use crate::error::DispatcherError;

/// Create a consumer from configuration
#[instrument(
    name = "dispatcher_create_consumer",
    skip(config),
    fields(consumer = %config.name, kind = ?config.kind)
)]
pub fn create_consumer(config: &ConsumerConfig) -> Result<Box<dyn Consumer>, DispatcherError> {
    match config.kind {
        ConsumerKind::Log => {
            let consumer = LogConsumer::from_params(&config.name, &config.params)
                .map_err(|e| DispatcherError::consumer_creation(&config.name, e.to_string()))?;
            Ok(Box::new(consumer))
        }
        ConsumerKind::Summary => Ok(Box::new(SummaryConsumer::from_params(
            &config.name,
            &config.params,
        ))),
    }
}
