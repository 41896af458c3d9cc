//! Cloud speech synthesis
//!
//! Sends text to the remote speech endpoint and streams the returned
//! MP3 bytes to a local file. Each call produces one file, named with a
//! per-process counter so names never collide within a run.

use crate::{KoeError, Result};
use log::{debug, info};
use serde::Serialize;
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

/// Endpoint for speech synthesis requests
const SPEECH_ENDPOINT: &str = "https://api.openai.com/v1/audio/speech";

/// Environment variable holding the API credential
pub const CREDENTIAL_VAR: &str = "OPENAI_API_KEY";

/// Model used when the config does not override it
pub const DEFAULT_MODEL: &str = "gpt-4o-mini-tts";

/// Request body for the speech endpoint
#[derive(Serialize)]
struct SpeechRequest<'a> {
    model: &'a str,
    input: &'a str,
    voice: &'a str,
    instructions: &'a str,
}

/// Client for the remote synthesis service
///
/// Holds the credential, the blocking HTTP client and the output file
/// counter. Constructed once at startup; `synthesize` is then called
/// per line of input.
pub struct Synthesizer {
    client: reqwest::blocking::Client,
    api_key: String,
    model: String,
    output_dir: PathBuf,
    counter: AtomicU64,
}

impl Synthesizer {
    /// Create a synthesizer with an explicit credential
    pub fn new(
        api_key: impl Into<String>,
        model: impl Into<String>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            client: reqwest::blocking::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            output_dir: output_dir.into(),
            counter: AtomicU64::new(0),
        }
    }

    /// Create a synthesizer with the credential from the environment
    ///
    /// Fails with `MissingCredential` when the variable is unset or
    /// blank. Nothing else is validated here; a bad key surfaces as an
    /// API error on the first call.
    pub fn from_env(model: impl Into<String>, output_dir: impl Into<PathBuf>) -> Result<Self> {
        match std::env::var(CREDENTIAL_VAR) {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key, model, output_dir)),
            _ => Err(KoeError::MissingCredential(format!(
                "{} is not set",
                CREDENTIAL_VAR
            ))),
        }
    }

    /// Directory synthesized files are written to
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Next output file path, unique within this process
    fn next_output_path(&self) -> PathBuf {
        let n = self.counter.fetch_add(1, Ordering::SeqCst) + 1;
        self.output_dir.join(format!("speech_{}.mp3", n))
    }

    /// Synthesize `text` and stream the audio to a new local file
    ///
    /// Returns the path of the written file. On failure the file may
    /// exist partially written; callers only queue it for playback on
    /// success, and nothing is ever deleted.
    pub fn synthesize(&self, text: &str, voice: &str, instructions: &str) -> Result<PathBuf> {
        if text.trim().is_empty() {
            return Err(KoeError::Synthesis("empty input text".to_string()));
        }

        let path = self.next_output_path();
        debug!(
            "Requesting synthesis of {} chars with voice '{}' to {:?}",
            text.chars().count(),
            voice,
            path
        );

        let body = SpeechRequest {
            model: &self.model,
            input: text,
            voice,
            instructions,
        };

        let mut response = self
            .client
            .post(SPEECH_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().unwrap_or_default();
            return Err(KoeError::Synthesis(format!(
                "API error {}: {}",
                status, detail
            )));
        }

        // Stream the body to disk as it arrives
        let mut file = File::create(&path)?;
        let bytes = io::copy(&mut response, &mut file)?;
        info!("Wrote {} bytes to {:?}", bytes, path);

        Ok(path)
    }
}
