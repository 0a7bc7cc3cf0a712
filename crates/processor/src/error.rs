//! Processor error types

use std::path::PathBuf;

use contracts::ContractError;
use thiserror::Error;

/// Errors returned by `TrajectoryProcessor::run` before any frame flows
#[derive(Debug, Error)]
pub enum ProcessorError {
    /// `run` was called without a registered consumer
    #[error("no consumers registered, nothing to run")]
    NoConsumers,

    /// Resolved configuration violates an invariant
    #[error("invalid configuration: {0}")]
    Config(#[from] ContractError),

    /// The input dump could not be written
    #[error("failed to dump configuration to '{}': {source}", path.display())]
    DumpInput {
        path: PathBuf,
        #[source]
        source: ContractError,
    },

    /// A pipeline thread could not be started
    #[error("failed to start pipeline thread: {0}")]
    Spawn(String),
}

impl ProcessorError {
    /// Whether the error comes from configuration
    pub fn is_config_error(&self) -> bool {
        matches!(self, Self::NoConsumers | Self::Config(_))
    }
}

/// Processor Result type alias
pub type Result<T> = std::result::Result<T, ProcessorError>;
