//! Error types for coderev

use thiserror::Error;

use crate::gateway::ProviderError;

/// Result type alias for coderev operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for coderev operations
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The model provider call failed
    #[error("Model provider error: {0}")]
    Provider(#[from] ProviderError),

    /// A prompt template needed a review state field that was never set
    #[error("Review state field `{0}` is not set")]
    MissingField(&'static str),

    /// The workflow executed more nodes than allowed without reaching the end
    #[error("Workflow did not finish within {limit} steps")]
    StepLimitExceeded { limit: u32 },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
