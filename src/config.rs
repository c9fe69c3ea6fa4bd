//! Speech session configuration
//!
//! A config file is a partial overlay on top of defaults: all fields are
//! optional and anything absent keeps its default.

use std::path::Path;

use serde::Deserialize;

use crate::{Error, Result};

/// Resolved speech session configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SpeechConfig {
    /// Synthesis speed multiplier
    pub rate: f32,
    /// Synthesis pitch multiplier
    pub pitch: f32,
    /// Synthesis volume, 0.0 to 1.0
    pub volume: f32,
    /// Fixed source locale for recognition capture
    pub source_locale: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            rate: 1.0,
            pitch: 1.0,
            volume: 1.0,
            source_locale: "en-US".to_string(),
        }
    }
}

/// TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct SpeechConfigFile {
    pub rate: Option<f32>,
    pub pitch: Option<f32>,
    pub volume: Option<f32>,
    pub source_locale: Option<String>,
}

impl SpeechConfig {
    /// Load configuration from a TOML file, overlaying defaults
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or parsed, or if a value
    /// is out of range
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let file: SpeechConfigFile = toml::from_str(&raw)?;

        let mut config = Self::default();
        config.apply(file);
        config.validate()?;

        tracing::debug!(?config, "speech config loaded");
        Ok(config)
    }

    /// Overlay values from a parsed config file
    pub fn apply(&mut self, file: SpeechConfigFile) {
        if let Some(rate) = file.rate {
            self.rate = rate;
        }
        if let Some(pitch) = file.pitch {
            self.pitch = pitch;
        }
        if let Some(volume) = file.volume {
            self.volume = volume;
        }
        if let Some(source_locale) = file.source_locale {
            self.source_locale = source_locale;
        }
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns error if a multiplier is non-positive or volume is out of range
    pub fn validate(&self) -> Result<()> {
        if !(self.rate.is_finite() && self.rate > 0.0) {
            return Err(Error::Config(format!("invalid rate: {}", self.rate)));
        }
        if !(self.pitch.is_finite() && self.pitch > 0.0) {
            return Err(Error::Config(format!("invalid pitch: {}", self.pitch)));
        }
        if !(self.volume.is_finite() && (0.0..=1.0).contains(&self.volume)) {
            return Err(Error::Config(format!("invalid volume: {}", self.volume)));
        }
        if self.source_locale.is_empty() {
            return Err(Error::Config("source locale must not be empty".to_string()));
        }
        Ok(())
    }
}
