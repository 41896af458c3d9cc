//! Error types for koe

use std::io;
use thiserror::Error;

/// Main error type for koe
#[derive(Error, Debug)]
pub enum KoeError {
    #[error("API credential missing: {0}")]
    MissingCredential(String),

    #[error("Synthesis error: {0}")]
    Synthesis(String),

    #[error("Playback error: {0}")]
    Playback(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Interrupted")]
    Interrupted,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for koe operations
pub type Result<T> = std::result::Result<T, KoeError>;

impl From<String> for KoeError {
    fn from(s: String) -> Self {
        KoeError::Other(s)
    }
}

impl From<&str> for KoeError {
    fn from(s: &str) -> Self {
        KoeError::Other(s.to_string())
    }
}

impl From<reqwest::Error> for KoeError {
    fn from(e: reqwest::Error) -> Self {
        KoeError::Synthesis(format!("request failed: {}", e))
    }
}
