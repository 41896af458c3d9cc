//! Playback queue and audio output

pub mod manager;
pub mod output;

pub use manager::{PlaybackJob, PlaybackManager};
pub use output::{AudioOutput, OutputFactory, RodioOutput};
