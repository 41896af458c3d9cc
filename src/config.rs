//! Configuration management

use crate::speech::{DEFAULT_INSTRUCTIONS, DEFAULT_MODEL, DEFAULT_VOICE};
use crate::{KoeError, Result};
use ini::Ini;
use log::{debug, info};
use std::path::PathBuf;

/// Application configuration
///
/// Seeds the session's voice and style, and points synthesis at a
/// model and output directory. Written with defaults on first run.
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path (~/.koe.cfg)
    path: PathBuf,
}

impl Config {
    /// Load configuration from disk or create default
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(&path)
                .map_err(|e| KoeError::Config(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(&path)
                .map_err(|e| KoeError::Config(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self { ini, path })
    }

    /// Get config file path (~/.koe.cfg)
    fn config_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".koe.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("speech"))
            .set("voice", DEFAULT_VOICE)
            .set("instructions", DEFAULT_INSTRUCTIONS);

        ini.with_section(Some("synthesis"))
            .set("model", DEFAULT_MODEL)
            .set("output_dir", ".");

        ini
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    // Tool-specific configuration getters

    /// Voice used until the user changes it in the session
    pub fn voice(&self) -> String {
        self.get_string("speech", "voice", DEFAULT_VOICE)
    }

    /// Delivery instructions used until the user changes them
    pub fn instructions(&self) -> String {
        self.get_string("speech", "instructions", DEFAULT_INSTRUCTIONS)
    }

    /// Model identifier sent with each synthesis request
    pub fn model(&self) -> String {
        self.get_string("synthesis", "model", DEFAULT_MODEL)
    }

    /// Directory synthesized audio files are written to
    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(self.get_string("synthesis", "output_dir", "."))
    }
}
