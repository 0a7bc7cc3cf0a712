//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// Consumer creation error
    #[error("failed to create consumer '{name}': {message}")]
    ConsumerCreation { name: String, message: String },

    /// Consumer thread could not be started
    #[error("failed to spawn thread for consumer '{consumer}': {source}")]
    Spawn {
        consumer: String,
        #[source]
        source: std::io::Error,
    },

    /// Consumer hook error (from contract)
    #[error("consumer error: {0}")]
    Contract(#[from] contracts::ContractError),
}

impl DispatcherError {
    /// Create a consumer creation error
    pub fn consumer_creation(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ConsumerCreation {
            name: name.into(),
            message: message.into(),
        }
    }
}
