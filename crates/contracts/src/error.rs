//! Layered error definitions
//!
//! Categorized by source: config / source / consumer

use std::path::Path;

use thiserror::Error;

/// Unified error type
#[derive(Debug, Error)]
pub enum ContractError {
    // ===== Configuration Errors =====
    /// Configuration parse error
    #[error("config parse error: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration validation error
    #[error("config validation error at '{field}': {message}")]
    ConfigValidation { field: String, message: String },

    // ===== Frame Source Errors =====
    /// File could not be opened as a trajectory
    #[error("cannot open '{path}': {message}")]
    SourceOpen { path: String, message: String },

    /// Reading a frame failed mid-file
    #[error("read error in '{path}' at frame {frame}: {message}")]
    SourceRead {
        path: String,
        frame: u64,
        message: String,
    },

    /// No reader is available for this file kind
    #[error("unsupported trajectory format: '{0}'")]
    UnsupportedFormat(String),

    // ===== Consumer Errors =====
    /// Consumer pre-processing hook failed
    #[error("consumer '{consumer}' setup failed: {message}")]
    ConsumerSetup { consumer: String, message: String },

    /// Consumer per-frame hook failed
    #[error("consumer '{consumer}' failed on frame {frame}: {message}")]
    ConsumerProcess {
        consumer: String,
        frame: u64,
        message: String,
    },

    /// Consumer post-processing hook failed
    #[error("consumer '{consumer}' teardown failed: {message}")]
    ConsumerTeardown { consumer: String, message: String },

    // ===== General Errors =====
    /// IO error
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl ContractError {
    /// Create configuration parse error
    pub fn config_parse(message: impl Into<String>) -> Self {
        Self::ConfigParse {
            message: message.into(),
            source: None,
        }
    }

    /// Create configuration validation error
    pub fn config_validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConfigValidation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create source open error
    pub fn source_open(path: &Path, message: impl Into<String>) -> Self {
        Self::SourceOpen {
            path: path.display().to_string(),
            message: message.into(),
        }
    }

    /// Create source read error
    pub fn source_read(path: &Path, frame: u64, message: impl Into<String>) -> Self {
        Self::SourceRead {
            path: path.display().to_string(),
            frame,
            message: message.into(),
        }
    }

    /// Create consumer setup error
    pub fn consumer_setup(consumer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConsumerSetup {
            consumer: consumer.into(),
            message: message.into(),
        }
    }

    /// Create consumer per-frame error
    pub fn consumer_process(
        consumer: impl Into<String>,
        frame: u64,
        message: impl Into<String>,
    ) -> Self {
        Self::ConsumerProcess {
            consumer: consumer.into(),
            frame,
            message: message.into(),
        }
    }

    /// Create consumer teardown error
    pub fn consumer_teardown(consumer: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConsumerTeardown {
            consumer: consumer.into(),
            message: message.into(),
        }
    }

    /// True for errors raised while validating or parsing configuration
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigParse { .. } | Self::ConfigValidation { .. }
        )
    }
}
