//! Error types for ttsc

use crate::api::types::SynthesisAttempt;
use std::io;
use thiserror::Error;

/// Main error type for ttsc
#[derive(Error, Debug)]
pub enum TtscError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API error: {0}")]
    Api(String),

    #[error("{0}")]
    Validation(String),

    #[error("Authentication required: {0}")]
    Auth(String),

    /// Server-reported synthesis failure, with one record per voice the
    /// server tried before giving up
    #[error("Speech generation failed: {message}")]
    Synthesis {
        message: String,
        attempts: Vec<SynthesisAttempt>,
    },

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for ttsc operations
pub type Result<T> = std::result::Result<T, TtscError>;

impl From<String> for TtscError {
    fn from(s: String) -> Self {
        TtscError::Other(s)
    }
}

impl From<&str> for TtscError {
    fn from(s: &str) -> Self {
        TtscError::Other(s.to_string())
    }
}
