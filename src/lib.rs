//! koe - queued command-line text-to-speech
//!
//! Sends user-entered text to a cloud speech-synthesis API, streams the
//! returned audio to local files, and plays the files back in order
//! through a single background worker.

pub mod config;
pub mod error;
pub mod input;
pub mod playback;
pub mod speech;

pub use error::{KoeError, Result};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "koe";
