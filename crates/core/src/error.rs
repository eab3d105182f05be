//! Workspace-wide error type

use thiserror::Error;

/// Result alias used across the workspace
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Chat model error: {0}")]
    ChatModel(String),

    #[error("Payment error: {0}")]
    Payment(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Session error: {0}")]
    Session(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Shorthand for an invalid-input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Error::InvalidInput(msg.into())
    }
}
