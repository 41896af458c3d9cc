//! Local audio output
//!
//! The playback worker drives devices through the `AudioOutput` trait;
//! the production implementation decodes files with rodio and plays
//! them on the default output device, and tests substitute a scripted
//! fake.

use crate::{KoeError, Result};
use log::debug;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// A playback device the worker can drive
///
/// `load` prepares a file without starting it, `play` starts playback,
/// and `is_busy` reports whether audio is still sounding.
pub trait AudioOutput {
    fn load(&mut self, path: &Path) -> Result<()>;
    fn play(&mut self) -> Result<()>;
    fn is_busy(&self) -> bool;
}

/// Factory creating a device on the worker thread
///
/// rodio output streams are not `Send`, so the device must be built on
/// the thread that uses it.
pub type OutputFactory = Box<dyn Fn() -> Result<Box<dyn AudioOutput>> + Send + Sync>;

/// Default audio output backed by rodio
pub struct RodioOutput {
    /// Keeps the OS stream alive for the lifetime of the device
    _stream: OutputStream,
    handle: OutputStreamHandle,
    sink: Option<Sink>,
}

impl RodioOutput {
    /// Open the default output device
    pub fn new() -> Result<Self> {
        let (stream, handle) = OutputStream::try_default()
            .map_err(|e| KoeError::Playback(format!("no audio output device: {}", e)))?;
        Ok(Self {
            _stream: stream,
            handle,
            sink: None,
        })
    }

    /// Factory handed to `PlaybackManager::new`
    pub fn factory() -> OutputFactory {
        Box::new(|| Ok(Box::new(RodioOutput::new()?) as Box<dyn AudioOutput>))
    }
}

impl AudioOutput for RodioOutput {
    fn load(&mut self, path: &Path) -> Result<()> {
        debug!("Loading {:?}", path);
        let file = File::open(path)?;
        let source = Decoder::new(BufReader::new(file)).map_err(|e| {
            KoeError::Playback(format!("failed to decode {}: {}", path.display(), e))
        })?;

        let sink = Sink::try_new(&self.handle)
            .map_err(|e| KoeError::Playback(format!("failed to open sink: {}", e)))?;
        sink.pause();
        sink.append(source);
        self.sink = Some(sink);
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        match &self.sink {
            Some(sink) => {
                sink.play();
                Ok(())
            }
            None => Err(KoeError::Playback("no audio loaded".to_string())),
        }
    }

    fn is_busy(&self) -> bool {
        self.sink.as_ref().map(|s| !s.empty()).unwrap_or(false)
    }
}
