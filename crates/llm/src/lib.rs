//! Chat model integration
//!
//! Implements the `ChatModel` capability against the Gemini
//! `generateContent` API, covering both free-text completion and
//! image analysis.

pub mod gemini;

pub use gemini::{GeminiBackend, GeminiConfig};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for clean_hurghada_core::Error {
    fn from(err: LlmError) -> Self {
        clean_hurghada_core::Error::ChatModel(err.to_string())
    }
}
