//! Voice selection and delivery style

/// Voice identifiers the speech endpoint currently accepts
///
/// The API adds voices over time, so this list is advisory: an unknown
/// name is still sent as-is and the server decides.
pub const KNOWN_VOICES: &[&str] = &[
    "alloy", "ash", "ballad", "coral", "echo", "fable", "onyx", "nova", "sage", "shimmer", "verse",
];

/// Voice used when the config does not override it
pub const DEFAULT_VOICE: &str = "onyx";

/// Delivery instruction used when the config does not override it
pub const DEFAULT_INSTRUCTIONS: &str =
    "Speak in a deep, composed voice, giving weight and gravity to every word.";

/// Voice and delivery settings for a synthesis call
///
/// Held by the interactive driver and passed into each call; the only
/// mutation is user-driven edits between batches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceConfig {
    /// Voice identifier sent to the API
    pub voice: String,
    /// Natural-language delivery instructions
    pub instructions: String,
}

impl VoiceConfig {
    pub fn new(voice: impl Into<String>, instructions: impl Into<String>) -> Self {
        Self {
            voice: voice.into(),
            instructions: instructions.into(),
        }
    }

    /// Replace the voice, unless the new value is blank
    pub fn update_voice(&mut self, voice: &str) {
        let voice = voice.trim();
        if !voice.is_empty() {
            self.voice = voice.to_string();
        }
    }

    /// Replace the delivery instructions, unless the new value is blank
    pub fn update_instructions(&mut self, instructions: &str) {
        let instructions = instructions.trim();
        if !instructions.is_empty() {
            self.instructions = instructions.to_string();
        }
    }

    /// Is this one of the voices the endpoint documents?
    pub fn is_known_voice(voice: &str) -> bool {
        KNOWN_VOICES.contains(&voice.to_lowercase().as_str())
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self::new(DEFAULT_VOICE, DEFAULT_INSTRUCTIONS)
    }
}
