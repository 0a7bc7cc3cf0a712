//! ConsumerHandle - a consumer driver running on its own thread

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use contracts::ConsumerId;
use ingestion::FrameReceiver;
use tracing::debug;

use crate::driver::{ConsumerDriver, ConsumerReport};
use crate::error::DispatcherError;
use crate::metrics::ConsumerMetrics;

/// Handle to a running consumer thread
pub struct ConsumerHandle {
    id: ConsumerId,
    name: String,
    metrics: Arc<ConsumerMetrics>,
    worker: JoinHandle<ConsumerReport>,
}

impl ConsumerHandle {
    /// Spawn a thread running `driver` against `rx`
    ///
    /// If the thread cannot be started the receiver is dropped with the
    /// closure.
    pub fn spawn(driver: ConsumerDriver, rx: FrameReceiver) -> Result<Self, DispatcherError> {
        let id = driver.id();
        let name = driver.name().to_string();
        let metrics = driver.metrics();

        let worker = thread::Builder::new()
            .name(format!("consumer-{id}"))
            .spawn(move || driver.run(rx))
            .map_err(|source| DispatcherError::Spawn {
                consumer: name.clone(),
                source,
            })?;

        debug!(consumer = %name, id, "consumer thread started");
        Ok(Self {
            id,
            name,
            metrics,
            worker,
        })
    }

    pub fn id(&self) -> ConsumerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get current metrics
    pub fn metrics(&self) -> &Arc<ConsumerMetrics> {
        &self.metrics
    }

    /// Wait for the consumer to finish
    ///
    /// A panic inside a hook comes back as the `Err` payload.
    pub fn join(self) -> thread::Result<ConsumerReport> {
        self.worker.join()
    }
}
