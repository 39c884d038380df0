//! Startup configuration
//!
//! Read once at launch from an optional JSON file in the working directory.
//! The game never writes it back.

use std::fs;
use std::path::Path;

use serde::Deserialize;

/// Errors reading the settings file
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings file I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("settings file is malformed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Startup preferences
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Initial state of the menu's music/sound toggle
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0) used while sound is on
    pub volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            sound_enabled: true,
            volume: 1.0,
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const FILE_NAME: &'static str = "pixel_peak_settings.json";

    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = fs::read_to_string(path)?;
        let mut settings: Settings = serde_json::from_str(&json)?;
        settings.volume = settings.volume.clamp(0.0, 1.0);
        Ok(settings)
    }

    /// Load from the default file, falling back to defaults on any error
    pub fn load() -> Self {
        match Self::load_from(Self::FILE_NAME) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", Self::FILE_NAME);
                settings
            }
            Err(SettingsError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring {}: {}", Self::FILE_NAME, e);
                Self::default()
            }
        }
    }
}
