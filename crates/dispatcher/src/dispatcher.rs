//! Dispatcher - fan-out of shared frames to per-consumer channels

use std::sync::Arc;

use contracts::SharedFrame;
use ingestion::{channel, FrameReceiver, FrameSender};
use tracing::{debug, info, instrument, warn};

/// One secondary channel
struct Output {
    tx: FrameSender,
    open: bool,
}

/// What the dispatcher forwarded
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Frames taken from the primary channel
    pub frames: u64,

    /// Successful sends summed over all outputs
    pub deliveries: u64,

    /// Outputs whose consumer went away before the end
    pub closed_outputs: usize,
}

/// Rebroadcasts every frame of the primary channel to each output
///
/// All outputs receive the same `Arc` in the same order. Sending blocks
/// while an output is full, so the slowest consumer paces the stream.
pub struct Dispatcher {
    input: FrameReceiver,
    outputs: Vec<Output>,
}

impl Dispatcher {
    /// Create a dispatcher over existing output senders
    pub fn with_outputs(input: FrameReceiver, outputs: Vec<FrameSender>) -> Self {
        Self {
            input,
            outputs: outputs
                .into_iter()
                .map(|tx| Output { tx, open: true })
                .collect(),
        }
    }

    /// Create `count` secondary channels of `capacity` and a dispatcher feeding them
    ///
    /// Receivers are returned in output order.
    pub fn fan_out(
        input: FrameReceiver,
        count: usize,
        capacity: usize,
    ) -> (Self, Vec<FrameReceiver>) {
        let (senders, receivers): (Vec<_>, Vec<_>) = (0..count)
            .map(|i| channel(format!("consumer-{i}"), capacity))
            .unzip();
        (Self::with_outputs(input, senders), receivers)
    }

    /// Number of outputs
    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Forward until the primary channel is stopped and drained, then stop every output
    ///
    /// Returns early, dropping the primary receiver, once every output is
    /// closed.
    #[instrument(name = "dispatcher_run", skip(self), fields(outputs = self.outputs.len()))]
    pub fn run(mut self) -> DispatchSummary {
        info!(outputs = self.outputs.len(), "Dispatcher started");
        let mut summary = DispatchSummary::default();

        while let Some(frame) = self.input.receive() {
            summary.frames += 1;
            summary.deliveries += self.dispatch_frame(&frame);

            if !self.outputs.iter().any(|o| o.open) {
                warn!(frames = summary.frames, "every consumer is gone, dispatcher stopping");
                break;
            }

            if summary.frames.is_multiple_of(100) {
                debug!(frames = summary.frames, "Dispatcher progress");
            }
        }

        for output in &self.outputs {
            output.tx.send_stop();
        }
        summary.closed_outputs = self.outputs.iter().filter(|o| !o.open).count();

        info!(
            frames = summary.frames,
            deliveries = summary.deliveries,
            closed_outputs = summary.closed_outputs,
            "Dispatcher finished"
        );
        summary
    }

    fn dispatch_frame(&mut self, frame: &SharedFrame) -> u64 {
        let mut delivered = 0;
        for output in self.outputs.iter_mut().filter(|o| o.open) {
            match output.tx.send(Arc::clone(frame)) {
                Ok(()) => {
                    delivered += 1;
                    observability::record_channel_depth(output.tx.name(), output.tx.len());
                }
                Err(e) => {
                    warn!(
                        channel = output.tx.name(),
                        frame = frame.meta().absolute_frame,
                        error = %e,
                        "output closed, skipping from now on"
                    );
                    output.open = false;
                }
            }
        }
        delivered
    }
}
