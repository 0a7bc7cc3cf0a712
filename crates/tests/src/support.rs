//! Shared consumers and builders

use std::sync::{Arc, Mutex};
use std::time::Duration;

use contracts::{Consumer, ConsumerId, ContractError, FrameMetadata, PipelineConfig, RawFrame};
use ingestion::{MockOpener, MockTrajectory};

/// What a `Recorder` saw
#[derive(Debug, Default)]
pub struct Recording {
    pub setup_id: Option<ConsumerId>,
    pub metas: Vec<FrameMetadata>,
    /// Address of each delivered frame payload
    pub payloads: Vec<usize>,
    pub teardown: Option<Option<FrameMetadata>>,
}

impl Recording {
    pub fn absolute_frames(&self) -> Vec<u64> {
        self.metas.iter().map(|m| m.absolute_frame).collect()
    }

    pub fn valid_frames(&self) -> Vec<u64> {
        self.metas.iter().map(|m| m.valid_frame).collect()
    }
}

/// Consumer that records every hook call
pub struct Recorder {
    name: String,
    recording: Arc<Mutex<Recording>>,
    delay: Option<Duration>,
    panic_at: Option<u64>,
}

impl Recorder {
    pub fn new(name: &str) -> (Self, Arc<Mutex<Recording>>) {
        let recording = Arc::new(Mutex::new(Recording::default()));
        let recorder = Self {
            name: name.to_string(),
            recording: Arc::clone(&recording),
            delay: None,
            panic_at: None,
        };
        (recorder, recording)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Panic when the frame with this valid index arrives
    pub fn panicking_at(mut self, valid_frame: u64) -> Self {
        self.panic_at = Some(valid_frame);
        self
    }
}

impl Consumer for Recorder {
    fn name(&self) -> &str {
        &self.name
    }

    fn setup(&mut self, id: ConsumerId) -> Result<(), ContractError> {
        self.recording.lock().unwrap().setup_id = Some(id);
        Ok(())
    }

    fn process(&mut self, frame: &RawFrame, meta: &FrameMetadata) -> Result<(), ContractError> {
        if self.panic_at == Some(meta.valid_frame) {
            panic!("{} gave up at frame {}", self.name, meta.absolute_frame);
        }
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }
        let mut rec = self.recording.lock().unwrap();
        rec.metas.push(*meta);
        rec.payloads.push(frame as *const RawFrame as usize);
        Ok(())
    }

    fn teardown(&mut self, last: Option<&FrameMetadata>) -> Result<(), ContractError> {
        self.recording.lock().unwrap().teardown = Some(last.copied());
        Ok(())
    }
}

/// Opener serving `a.xyz` with `frames` frames one ps apart
pub fn single_file(frames: usize) -> MockOpener {
    MockOpener::new().with("a.xyz", MockTrajectory::uniform(frames, 0.0, 1.0))
}

/// Configuration reading `a.xyz` only
pub fn single_file_config() -> PipelineConfig {
    PipelineConfig::new(vec!["a.xyz".into()])
}
