//! SummaryConsumer - writes one JSON line per frame to a file

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use contracts::{Consumer, ConsumerId, ContractError, FrameMetadata, RawFrame};
use serde::Serialize;
use tracing::{debug, instrument};

/// Configuration for SummaryConsumer
#[derive(Debug, Clone)]
pub struct SummaryConsumerConfig {
    /// Output file (JSON lines)
    pub path: PathBuf,
}

impl SummaryConsumerConfig {
    /// Create config from params map
    pub fn from_params(params: &HashMap<String, String>) -> Self {
        let path = params
            .get("path")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./frames.jsonl"));

        Self { path }
    }
}

/// One output line
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum Record<'a> {
    Frame {
        #[serde(flatten)]
        meta: &'a FrameMetadata,
        atoms: usize,
        center: Option<[f32; 3]>,
        box_volume: f32,
    },
    Summary {
        consumer: ConsumerId,
        frames: u64,
        first_frame: Option<u64>,
        last_frame: Option<u64>,
        elapsed_time: f64,
    },
}

/// Consumer that records per-frame metadata and geometric center
///
/// The file is created in `setup`, so an unwritable path fails setup.
pub struct SummaryConsumer {
    name: String,
    config: SummaryConsumerConfig,
    id: ConsumerId,
    frames: u64,
    writer: Option<BufWriter<File>>,
}

impl SummaryConsumer {
    /// Create a new SummaryConsumer
    pub fn new(name: impl Into<String>, config: SummaryConsumerConfig) -> Self {
        Self {
            name: name.into(),
            config,
            id: 0,
            frames: 0,
            writer: None,
        }
    }

    /// Create from params map (for factory)
    pub fn from_params(name: impl Into<String>, params: &HashMap<String, String>) -> Self {
        Self::new(name, SummaryConsumerConfig::from_params(params))
    }

    fn write_record(&mut self, record: &Record<'_>) -> Result<(), ContractError> {
        let writer = self
            .writer
            .as_mut()
            .ok_or_else(|| ContractError::Other(format!("consumer '{}' is not set up", self.name)))?;
        serde_json::to_writer(&mut *writer, record)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        writer.write_all(b"\n")?;
        Ok(())
    }
}

impl Consumer for SummaryConsumer {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(name = "summary_consumer_setup", skip(self), fields(consumer = %self.name))]
    fn setup(&mut self, id: ConsumerId) -> Result<(), ContractError> {
        let path = &self.config.path;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .map_err(|e| ContractError::consumer_setup(&self.name, e.to_string()))?;
        }
        let file = File::create(path).map_err(|e| {
            ContractError::consumer_setup(&self.name, format!("{}: {e}", path.display()))
        })?;

        self.id = id;
        self.writer = Some(BufWriter::new(file));
        debug!(consumer = %self.name, path = %path.display(), "summary file created");
        Ok(())
    }

    fn process(&mut self, frame: &RawFrame, meta: &FrameMetadata) -> Result<(), ContractError> {
        let record = Record::Frame {
            meta,
            atoms: frame.num_atoms(),
            center: frame.center().map(|c| [c.x, c.y, c.z]),
            box_volume: frame.pbox.volume(),
        };
        self.write_record(&record).map_err(|e| {
            ContractError::consumer_process(&self.name, meta.absolute_frame, e.to_string())
        })?;
        self.frames += 1;
        Ok(())
    }

    #[instrument(name = "summary_consumer_teardown", skip(self, last), fields(consumer = %self.name))]
    fn teardown(&mut self, last: Option<&FrameMetadata>) -> Result<(), ContractError> {
        let record = Record::Summary {
            consumer: self.id,
            frames: self.frames,
            first_frame: last.map(|m| m.first_frame),
            last_frame: last.map(|m| m.last_frame),
            elapsed_time: last.map(FrameMetadata::elapsed_time).unwrap_or(0.0),
        };
        self.write_record(&record)
            .and_then(|()| match self.writer.take() {
                Some(mut writer) => writer.flush().map_err(ContractError::from),
                None => Ok(()),
            })
            .map_err(|e| ContractError::consumer_teardown(&self.name, e.to_string()))
    }
}
