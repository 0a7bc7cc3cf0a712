//! Trajectory processor - wires reader, dispatcher and consumers together
//!
//! With one consumer the driver runs on the calling thread straight off the
//! primary channel. With more, every consumer gets its own thread and
//! channel and the dispatcher runs on the calling thread.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use config_loader::ConfigLoader;
use contracts::{Consumer, ConsumerId, PipelineConfig, SourceOpener};
use dispatcher::{ConsumerDriver, ConsumerHandle, ConsumerReport, Dispatcher};
use ingestion::{channel, ReaderMetrics, ReaderOutcome, ReaderTask, StopReason};
use tracing::{error, info, instrument, warn};

use crate::error::{ProcessorError, Result};
use crate::report::RunReport;

type PanicPayload = Box<dyn Any + Send + 'static>;

/// Streams a trajectory into registered consumers
///
/// # Example
///
/// ```ignore
/// let mut processor = TrajectoryProcessor::new(config, Arc::new(FormatOpener::new()));
/// processor.add_consumer(Box::new(LogConsumer::new("progress", 100)));
/// let report = processor.run()?;
/// ```
pub struct TrajectoryProcessor {
    config: PipelineConfig,
    opener: Arc<dyn SourceOpener>,
    consumers: Vec<Box<dyn Consumer>>,
}

impl TrajectoryProcessor {
    /// Create a processor for a resolved configuration
    pub fn new(config: PipelineConfig, opener: Arc<dyn SourceOpener>) -> Self {
        Self {
            config,
            opener,
            consumers: Vec::new(),
        }
    }

    /// Register a consumer; ids are assigned in registration order from 0
    pub fn add_consumer(&mut self, consumer: Box<dyn Consumer>) -> ConsumerId {
        let id = self.consumers.len();
        info!(consumer = consumer.name(), id, "consumer registered");
        self.consumers.push(consumer);
        id
    }

    /// Number of registered consumers
    pub fn consumer_count(&self) -> usize {
        self.consumers.len()
    }

    /// Configuration this processor runs with
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the pipeline to completion
    ///
    /// Every thread started here is joined before returning. I/O failures
    /// end up in the report; a panic in a consumer hook is resumed on this
    /// thread once everything is joined.
    ///
    /// # Errors
    /// - No consumer registered
    /// - Invalid configuration
    /// - Input dump failure
    /// - A thread could not be started
    #[instrument(
        name = "processor_run",
        skip(self),
        fields(consumers = self.consumers.len(), files = self.config.trajectory_files.len())
    )]
    pub fn run(self) -> Result<RunReport> {
        self.config.validate()?;
        if self.consumers.is_empty() {
            return Err(ProcessorError::NoConsumers);
        }

        if let Some(ref path) = self.config.dump_input {
            ConfigLoader::dump_config(&self.config, path).map_err(|source| {
                ProcessorError::DumpInput {
                    path: path.clone(),
                    source,
                }
            })?;
            info!(path = %path.display(), "configuration dumped");
        }

        let started = Instant::now();
        let (mut report, panicked) = if self.consumers.len() == 1 {
            self.run_inline()?
        } else {
            self.run_fan_out()?
        };
        report.duration = started.elapsed();

        if let Some(payload) = panicked {
            error!("consumer panicked, resuming unwind after join");
            panic::resume_unwind(payload);
        }

        info!(
            frames = report.frames_dispatched,
            duration_secs = report.duration.as_secs_f64(),
            stop_reason = ?report.reader.stop_reason,
            "run complete"
        );
        Ok(report)
    }

    fn run_inline(mut self) -> Result<(RunReport, Option<PanicPayload>)> {
        let consumer = self.consumers.remove(0);
        let (tx, rx) = channel("primary", self.config.buffer_size);

        let reader = ReaderTask::new(&self.config, Arc::clone(&self.opener), tx);
        let reader_metrics = reader.metrics();
        let reader = reader
            .spawn()
            .map_err(|e| ProcessorError::Spawn(e.to_string()))?;

        let driver = ConsumerDriver::new(0, consumer);
        let result = panic::catch_unwind(AssertUnwindSafe(move || driver.run(rx)));
        let reader = join_reader(reader, &reader_metrics);

        let (consumers, frames_dispatched, panicked) = match result {
            Ok(report) => {
                let frames = report.frames_received();
                (vec![report], frames, None)
            }
            Err(payload) => (Vec::new(), 0, Some(payload)),
        };

        Ok((
            RunReport {
                reader,
                consumers,
                frames_dispatched,
                duration: Default::default(),
            },
            panicked,
        ))
    }

    fn run_fan_out(self) -> Result<(RunReport, Option<PanicPayload>)> {
        let count = self.consumers.len();
        let capacity = self.config.buffer_size;
        let (tx, rx) = channel("primary", capacity);
        let (dispatcher, receivers) = Dispatcher::fan_out(rx, count, capacity);

        let mut handles = Vec::with_capacity(count);
        for (id, (consumer, rx)) in self.consumers.into_iter().zip(receivers).enumerate() {
            match ConsumerHandle::spawn(ConsumerDriver::new(id, consumer), rx) {
                Ok(handle) => handles.push(handle),
                Err(e) => {
                    // Dropping the dispatcher closes every output
                    drop(dispatcher);
                    join_consumers(handles);
                    return Err(ProcessorError::Spawn(e.to_string()));
                }
            }
        }

        let reader = ReaderTask::new(&self.config, Arc::clone(&self.opener), tx);
        let reader_metrics = reader.metrics();
        let reader = match reader.spawn() {
            Ok(handle) => handle,
            Err(e) => {
                drop(dispatcher);
                join_consumers(handles);
                return Err(ProcessorError::Spawn(e.to_string()));
            }
        };

        let summary = dispatcher.run();
        let reader = join_reader(reader, &reader_metrics);
        let (consumers, panicked) = join_consumers(handles);

        Ok((
            RunReport {
                reader,
                consumers,
                frames_dispatched: summary.frames,
                duration: Default::default(),
            },
            panicked,
        ))
    }
}

/// Join the reader; a panic becomes a failed outcome
fn join_reader(handle: JoinHandle<ReaderOutcome>, metrics: &ReaderMetrics) -> ReaderOutcome {
    handle.join().unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        error!(error = %message, "reader thread panicked");
        let snapshot = metrics.snapshot();
        ReaderOutcome {
            frames_read: snapshot.frames_read,
            frames_accepted: snapshot.frames_accepted,
            files_opened: snapshot.files_opened,
            stop_reason: StopReason::Failed(format!("reader panicked: {message}")),
        }
    })
}

/// Join every consumer, keeping the first panic payload
fn join_consumers(handles: Vec<ConsumerHandle>) -> (Vec<ConsumerReport>, Option<PanicPayload>) {
    let mut reports = Vec::with_capacity(handles.len());
    let mut first_panic = None;

    for handle in handles {
        let name = handle.name().to_string();
        match handle.join() {
            Ok(report) => reports.push(report),
            Err(payload) => {
                warn!(consumer = %name, error = %panic_message(payload.as_ref()), "consumer panicked");
                first_panic.get_or_insert(payload);
            }
        }
    }

    (reports, first_panic)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
