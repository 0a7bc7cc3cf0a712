//! PipelineConfig - resolved configuration
//!
//! Constructed once before the pipeline starts and passed by reference to
//! the reader and the dispatcher. Nothing queries global options mid-run.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::{ContractError, DEFAULT_BUFFER_SIZE};

/// Frame selection: sub-range and stride
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameBounds {
    /// First absolute frame to accept
    pub first_frame: Option<u64>,

    /// Last absolute frame to read
    pub last_frame: Option<u64>,

    /// First time to accept, ps
    pub first_time: Option<f64>,

    /// Last time to read, ps
    pub last_time: Option<f64>,

    /// Stride over absolute frame indices
    pub skip: Option<u64>,
}

/// Replaces source timestamps with `start + dt * absolute_frame`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeOverride {
    /// Time of absolute frame 0, ps
    pub start: f64,

    /// Time step per absolute frame, ps
    pub dt: f64,
}

impl TimeOverride {
    /// Time assigned to an absolute frame index
    pub fn time_at(&self, absolute_frame: u64) -> f64 {
        self.start + self.dt * absolute_frame as f64
    }
}

/// Window sizes attached to metadata for block averaging
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window in frames
    pub frames: Option<u64>,

    /// Window in time, ps
    pub time: Option<f64>,
}

/// Resolved pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Trajectory files, read in this order
    pub trajectory_files: Vec<PathBuf>,

    /// Structure file (at most one)
    pub structure_file: Option<PathBuf>,

    /// Topology file (at most one)
    pub topology_file: Option<PathBuf>,

    /// Frame selection
    pub bounds: FrameBounds,

    /// Custom time stamping
    pub time_override: Option<TimeOverride>,

    /// Pass-through window sizes
    pub window: WindowSize,

    /// Capacity of every frame channel
    pub buffer_size: usize,

    /// Log every N-th frame read
    pub log_interval: Option<u64>,

    /// Dump this configuration as JSON before running
    pub dump_input: Option<PathBuf>,
}

impl PipelineConfig {
    /// Configuration reading `files` with everything else at defaults
    pub fn new(files: Vec<PathBuf>) -> Self {
        Self {
            trajectory_files: files,
            structure_file: None,
            topology_file: None,
            bounds: FrameBounds::default(),
            time_override: None,
            window: WindowSize::default(),
            buffer_size: DEFAULT_BUFFER_SIZE,
            log_interval: None,
            dump_input: None,
        }
    }

    /// Set frame selection
    pub fn with_bounds(mut self, bounds: FrameBounds) -> Self {
        self.bounds = bounds;
        self
    }

    /// Set channel capacity
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size;
        self
    }

    /// Set custom time stamping
    pub fn with_time_override(mut self, time_override: TimeOverride) -> Self {
        self.time_override = Some(time_override);
        self
    }

    /// Check the invariants every resolved configuration must hold
    ///
    /// # Errors
    /// - No trajectory file
    /// - Zero channel capacity
    /// - Last frame/time smaller than first frame/time
    /// - Zero stride or zero log interval (use `None` instead)
    pub fn validate(&self) -> Result<(), ContractError> {
        if self.trajectory_files.is_empty() {
            return Err(ContractError::config_validation(
                "trajectory.files",
                "at least one trajectory file is required",
            ));
        }

        if self.buffer_size == 0 {
            return Err(ContractError::config_validation(
                "buffer_size",
                "buffer_size must be >= 1",
            ));
        }

        let b = &self.bounds;
        if let (Some(first), Some(last)) = (b.first_frame, b.last_frame) {
            if last < first {
                return Err(ContractError::config_validation(
                    "trajectory.last_frame",
                    format!("last frame {last} is smaller than first frame {first}"),
                ));
            }
        }
        if let (Some(first), Some(last)) = (b.first_time, b.last_time) {
            if last < first {
                return Err(ContractError::config_validation(
                    "trajectory.last_time",
                    format!("last time {last} is smaller than first time {first}"),
                ));
            }
        }
        if b.skip == Some(0) {
            return Err(ContractError::config_validation(
                "trajectory.skip",
                "stride must be positive",
            ));
        }
        if self.log_interval == Some(0) {
            return Err(ContractError::config_validation(
                "log_interval",
                "log interval must be positive",
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_default() {
        let config = PipelineConfig::new(vec!["a.xyz".into()]);
        assert!(config.validate().is_ok());
        assert_eq!(config.buffer_size, DEFAULT_BUFFER_SIZE);
    }

    #[test]
    fn test_no_files() {
        let err = PipelineConfig::new(vec![]).validate().unwrap_err();
        assert!(err.to_string().contains("at least one trajectory file"));
    }

    #[test]
    fn test_inverted_frame_range() {
        let config = PipelineConfig::new(vec!["a.xyz".into()]).with_bounds(FrameBounds {
            first_frame: Some(20),
            last_frame: Some(10),
            ..Default::default()
        });
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("smaller than first frame"), "got: {err}");
    }

    #[test]
    fn test_inverted_time_range() {
        let config = PipelineConfig::new(vec!["a.xyz".into()]).with_bounds(FrameBounds {
            first_time: Some(5.0),
            last_time: Some(1.0),
            ..Default::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_one_sided_bounds_are_fine() {
        let config = PipelineConfig::new(vec!["a.xyz".into()]).with_bounds(FrameBounds {
            first_frame: Some(20),
            last_time: Some(1.0),
            ..Default::default()
        });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_buffer() {
        let config = PipelineConfig::new(vec!["a.xyz".into()]).with_buffer_size(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_time_override() {
        let ov = TimeOverride {
            start: 100.0,
            dt: 2.0,
        };
        assert_eq!(ov.time_at(0), 100.0);
        assert_eq!(ov.time_at(5), 110.0);
    }
}
