//! Error types
//!
//! The simulation itself never fails; errors only come from the outer
//! surfaces (settings parsing, the audio device).

use thiserror::Error;

/// Errors raised outside the simulation
#[derive(Error, Debug)]
pub enum Error {
    /// Settings JSON could not be parsed
    #[error("Invalid settings: {0}")]
    Settings(#[from] serde_json::Error),

    /// The audio device could not be opened
    #[error("Failed to open audio device: {0}")]
    AudioDevice(String),

    /// A sound buffer could not be submitted for playback
    #[error("Playback error: {0}")]
    AudioPlayback(String),
}

pub type Result<T> = std::result::Result<T, Error>;
