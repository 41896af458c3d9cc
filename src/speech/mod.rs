//! Speech synthesis system

pub mod synth;
pub mod voice;

pub use synth::{Synthesizer, CREDENTIAL_VAR, DEFAULT_MODEL};
pub use voice::{VoiceConfig, DEFAULT_INSTRUCTIONS, DEFAULT_VOICE, KNOWN_VOICES};
