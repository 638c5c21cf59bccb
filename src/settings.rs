//! Game settings and preferences
//!
//! Read once at startup from the `ULTRA_BROS_SETTINGS` environment variable
//! (a JSON object). Missing fields take their defaults.

use serde::{Deserialize, Serialize};

use crate::consts::STARTING_LIVES;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Mute all audio
    pub muted: bool,
    /// Play the background melody
    pub music_enabled: bool,

    // === Run ===
    /// Seed mixed into procedural level generation
    pub seed: u64,
    /// Lives at the start of a run (and after a game over)
    pub starting_lives: i32,

    // === Presentation ===
    /// Integer scale from the logical frame buffer to the window
    pub scale: u32,
    /// Pace the headless runner with real sleeps
    pub realtime: bool,
    /// Frames the headless binary runs before quitting
    pub demo_frames: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,
            music_enabled: true,

            seed: 0x5EED_2A03,
            starting_lives: STARTING_LIVES,

            scale: 3,
            realtime: false,
            demo_frames: 60 * 60,
        }
    }
}

impl Settings {
    /// Environment variable holding the settings JSON
    pub const ENV_KEY: &'static str = "ULTRA_BROS_SETTINGS";
    /// Largest integer presentation scale
    pub const MAX_SCALE: u32 = 8;

    /// Parse settings from JSON, clamping out-of-range values
    pub fn from_json(json: &str) -> crate::Result<Self> {
        let settings: Settings = serde_json::from_str(json)?;
        Ok(settings.sanitized())
    }

    /// Load settings from the environment, falling back to defaults
    pub fn load() -> Self {
        match std::env::var(Self::ENV_KEY) {
            Ok(json) => match Self::from_json(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", Self::ENV_KEY);
                    settings
                }
                Err(e) => {
                    log::warn!("{e}; using default settings");
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Effective sound effect gain
    pub fn sfx_gain(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Effective music gain
    pub fn music_gain(&self) -> f32 {
        if self.muted || !self.music_enabled {
            0.0
        } else {
            self.master_volume * self.music_volume
        }
    }

    fn sanitized(mut self) -> Self {
        self.master_volume = self.master_volume.clamp(0.0, 1.0);
        self.sfx_volume = self.sfx_volume.clamp(0.0, 1.0);
        self.music_volume = self.music_volume.clamp(0.0, 1.0);
        self.scale = self.scale.clamp(1, Self::MAX_SCALE);
        self.starting_lives = self.starting_lives.max(0);
        self
    }
}
