//! LogConsumer - logs progress and a run summary via tracing

use std::collections::HashMap;

use contracts::{Consumer, ConsumerId, ContractError, FrameMetadata, RawFrame};
use tracing::{info, instrument};

/// Default progress interval in accepted frames
const DEFAULT_EVERY: u64 = 100;

/// Consumer that logs progress for monitoring
pub struct LogConsumer {
    name: String,
    every: u64,
    id: Option<ConsumerId>,
    frames: u64,
}

impl LogConsumer {
    /// Create a new LogConsumer logging every `every` accepted frames
    pub fn new(name: impl Into<String>, every: u64) -> Self {
        Self {
            name: name.into(),
            every: every.max(1),
            id: None,
            frames: 0,
        }
    }

    /// Create from params map (for factory)
    ///
    /// Recognised key: `every` (default 100).
    pub fn from_params(
        name: impl Into<String>,
        params: &HashMap<String, String>,
    ) -> Result<Self, ContractError> {
        let name = name.into();
        let every = match params.get("every") {
            Some(v) => v.parse::<u64>().map_err(|_| {
                ContractError::config_validation("consumers.params.every", format!("invalid value '{v}'"))
            })?,
            None => DEFAULT_EVERY,
        };
        Ok(Self::new(name, every))
    }

    /// Frames seen so far
    pub fn frames(&self) -> u64 {
        self.frames
    }
}

impl Consumer for LogConsumer {
    fn name(&self) -> &str {
        &self.name
    }

    fn setup(&mut self, id: ConsumerId) -> Result<(), ContractError> {
        self.id = Some(id);
        info!(consumer = %self.name, id, every = self.every, "LogConsumer ready");
        Ok(())
    }

    fn process(&mut self, frame: &RawFrame, meta: &FrameMetadata) -> Result<(), ContractError> {
        self.frames += 1;
        if meta.valid_frame.is_multiple_of(self.every) {
            info!(
                consumer = %self.name,
                frame = meta.absolute_frame,
                valid = meta.valid_frame,
                time = meta.absolute_time,
                atoms = frame.num_atoms(),
                "Frame received"
            );
        }
        Ok(())
    }

    #[instrument(name = "log_consumer_teardown", skip(self, last), fields(consumer = %self.name))]
    fn teardown(&mut self, last: Option<&FrameMetadata>) -> Result<(), ContractError> {
        match last {
            Some(meta) => info!(
                consumer = %self.name,
                frames = self.frames,
                first_frame = meta.first_frame,
                last_frame = meta.last_frame,
                elapsed_time = meta.elapsed_time(),
                "LogConsumer finished"
            ),
            None => info!(consumer = %self.name, "LogConsumer finished without frames"),
        }
        Ok(())
    }
}
