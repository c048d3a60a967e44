//! Error types for model setup and inference

use thiserror::Error;

/// A model could not be brought up. Fatal at startup.
#[derive(Debug, Error)]
pub enum ModelInitError {
    #[error("model id is empty")]
    EmptyModelId,

    #[error("failed to build inference client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("model {model} is unavailable: {reason}")]
    Unavailable { model: String, reason: String },
}

/// A single inference call failed. Recovered per call with a fallback value.
#[derive(Debug, Error)]
pub enum InferenceError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("backend returned {status}: {message}")]
    Backend { status: u16, message: String },

    #[error("invalid model output: {0}")]
    InvalidOutput(String),

    #[error("model unavailable: {0}")]
    Unavailable(String),
}

impl InferenceError {
    pub fn invalid_output(detail: impl Into<String>) -> Self {
        InferenceError::InvalidOutput(detail.into())
    }
}
