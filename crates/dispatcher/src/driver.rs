//! Consumer lifecycle driver
//!
//! Runs `Setup -> Running -> Teardown -> Done` for one consumer against one
//! channel. The sequence is linear: each hook runs at most once and no
//! state is re-entered.

use std::sync::Arc;
use std::time::Instant;

use contracts::{Consumer, ConsumerId, FrameMetadata};
use ingestion::FrameReceiver;
use observability::{RunningStats, StatsSummary};
use tracing::{debug, error, info, instrument, warn};

use crate::metrics::ConsumerMetrics;

/// Lifecycle state of a consumer
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LifecycleState {
    Setup,
    Running,
    Teardown,
    Done,
}

/// What happened to one consumer during a run
#[derive(Debug, Clone, PartialEq)]
pub struct ConsumerReport {
    /// Registration ordinal
    pub id: ConsumerId,

    /// Consumer name
    pub name: String,

    /// Frames for which `process` returned `Ok`
    pub frames_processed: u64,

    /// Frames for which `process` returned an error
    pub process_failures: u64,

    /// Setup error; `Running` and `Teardown` were skipped
    pub setup_error: Option<String>,

    /// Teardown error
    pub teardown_error: Option<String>,

    /// Metadata of the last frame received
    pub last_meta: Option<FrameMetadata>,

    /// Time spent in `process`, ms
    pub latency_ms: StatsSummary,

    /// State reached
    pub final_state: LifecycleState,
}

impl ConsumerReport {
    /// Whether every hook succeeded
    pub fn is_ok(&self) -> bool {
        self.setup_error.is_none() && self.teardown_error.is_none() && self.process_failures == 0
    }

    /// Frames delivered to the consumer, failed or not
    pub fn frames_received(&self) -> u64 {
        self.frames_processed + self.process_failures
    }
}

/// Drives one consumer through its lifecycle
pub struct ConsumerDriver {
    id: ConsumerId,
    name: String,
    consumer: Box<dyn Consumer>,
    state: LifecycleState,
    metrics: Arc<ConsumerMetrics>,
}

impl ConsumerDriver {
    /// Create a driver in the `Setup` state
    pub fn new(id: ConsumerId, consumer: Box<dyn Consumer>) -> Self {
        Self {
            id,
            name: consumer.name().to_string(),
            consumer,
            state: LifecycleState::Setup,
            metrics: Arc::new(ConsumerMetrics::new()),
        }
    }

    pub fn id(&self) -> ConsumerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Shared counters, readable while the driver runs
    pub fn metrics(&self) -> Arc<ConsumerMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Run the whole lifecycle, returning when the channel is stopped and drained
    ///
    /// On setup failure the receiver is dropped right away so upstream
    /// senders see a closed channel instead of filling it.
    #[instrument(
        name = "consumer_driver_run",
        skip(self, rx),
        fields(consumer = %self.name, id = self.id)
    )]
    pub fn run(mut self, rx: FrameReceiver) -> ConsumerReport {
        let mut report = ConsumerReport {
            id: self.id,
            name: self.name.clone(),
            frames_processed: 0,
            process_failures: 0,
            setup_error: None,
            teardown_error: None,
            last_meta: None,
            latency_ms: StatsSummary::default(),
            final_state: LifecycleState::Setup,
        };

        if let Err(e) = self.consumer.setup(self.id) {
            error!(consumer = %self.name, error = %e, "setup failed, consumer skipped");
            drop(rx);
            report.setup_error = Some(e.to_string());
            self.transition(LifecycleState::Done);
            report.final_state = self.state;
            return report;
        }

        self.transition(LifecycleState::Running);
        let mut latency = RunningStats::default();

        while let Some(shared) = rx.receive() {
            self.metrics.set_queue_len(rx.len());
            let meta = shared.meta();

            let started = Instant::now();
            let result = self.consumer.process(shared.frame(), meta);
            let elapsed_ms = started.elapsed().as_secs_f64() * 1000.0;
            latency.push(elapsed_ms);
            observability::record_process_latency_ms(&self.name, elapsed_ms);

            match &result {
                Ok(()) => {
                    report.frames_processed += 1;
                    self.metrics.inc_processed_count();
                }
                Err(e) => {
                    report.process_failures += 1;
                    self.metrics.inc_failure_count();
                    warn!(
                        consumer = %self.name,
                        frame = meta.absolute_frame,
                        error = %e,
                        "process failed"
                    );
                }
            }
            observability::record_frame_processed(&self.name, result.is_ok());
            report.last_meta = Some(*meta);
        }

        self.transition(LifecycleState::Teardown);
        if let Err(e) = self.consumer.teardown(report.last_meta.as_ref()) {
            error!(consumer = %self.name, error = %e, "teardown failed");
            report.teardown_error = Some(e.to_string());
        }

        self.transition(LifecycleState::Done);
        report.latency_ms = latency.summary();
        report.final_state = self.state;

        info!(
            consumer = %self.name,
            processed = report.frames_processed,
            failures = report.process_failures,
            latency_ms = %report.latency_ms,
            "consumer finished"
        );
        report
    }

    fn transition(&mut self, next: LifecycleState) {
        debug_assert!(next > self.state, "lifecycle cannot go back");
        debug!(consumer = %self.name, from = ?self.state, to = ?next, "lifecycle");
        self.state = next;
    }
}
