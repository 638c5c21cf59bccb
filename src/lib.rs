//! Ultra Bros - a tile-based side-scrolling platformer
//!
//! Core modules:
//! - `sim`: Deterministic simulation (tiles, entities, player, level, game state)
//! - `audio`: Procedural waveform synthesis, music sequencer, playback outputs
//! - `renderer`: Software rendering into the fixed low-resolution frame buffer
//! - `app`: Fixed-timestep runner driving a platform frontend
//! - `settings`: Player preferences and run configuration

pub mod app;
pub mod audio;
pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{Error, Result};
pub use settings::Settings;

/// Display, timing and audio constants
pub mod consts {
    /// Logical render target width (pixels)
    pub const VIEW_W: i32 = 256;
    /// Logical render target height (pixels)
    pub const VIEW_H: i32 = 240;
    /// Tile edge length (pixels)
    pub const TILE: i32 = 16;

    /// Simulation rate (ticks per second)
    pub const FPS: u32 = 60;
    /// Redraw rate while paused
    pub const PAUSED_FPS: u32 = 15;
    /// Wait after a stage clear or death before the next stage starts (ms)
    pub const TRANSITION_MS: u64 = 2000;

    /// Audio sample rate (Hz)
    pub const SAMPLE_RATE: u32 = 44_100;
    /// Audio channel count (stereo)
    pub const CHANNELS: u16 = 2;

    /// Level size in tiles
    pub const LEVEL_COLS: usize = 240;
    pub const LEVEL_ROWS: usize = 15;

    /// Stages per world before the world number advances
    pub const STAGES_PER_WORLD: u32 = 4;
    /// Worlds in the campaign; clearing the last stage wraps back to 1-1
    pub const WORLD_COUNT: u32 = 8;
    /// Lives at the start of a run
    pub const STARTING_LIVES: i32 = 3;
}

/// Physics tuning (per-tick units, 60 Hz, sub-pixel floats)
pub mod phys {
    /// Acceleration while walking
    pub const WALK_ACCEL: f32 = 0.098;
    /// Acceleration while running
    pub const RUN_ACCEL: f32 = 0.144;
    /// Ground friction (velocity multiplier with no input)
    pub const FRICTION: f32 = 0.88;
    /// Air friction (velocity multiplier with no input)
    pub const AIR_FRICTION: f32 = 0.95;
    /// Speeds below this snap to zero while coasting
    pub const STOP_THRESHOLD: f32 = 0.1;
    /// Deceleration when input opposes current velocity
    pub const SKID_DECEL: f32 = 0.15;
    pub const WALK_MAX: f32 = 1.6;
    pub const RUN_MAX: f32 = 2.9;

    /// Base gravity
    pub const GRAVITY: f32 = 0.25;
    /// Gravity while jump is held and still rising (variable jump height)
    pub const GRAVITY_HOLDING: f32 = 0.11;
    /// Terminal velocity
    pub const MAX_FALL: f32 = 4.5;
    /// Initial jump impulse
    pub const JUMP_FORCE: f32 = -5.6;
    /// Upward impulse after stomping an enemy
    pub const BOUNCE_FORCE: f32 = -3.0;

    pub const GOOMBA_SPEED: f32 = 0.6;
    pub const KOOPA_SPEED: f32 = 0.6;
    pub const SHELL_SPEED: f32 = 3.5;
    pub const MUSHROOM_SPEED: f32 = 1.0;

    /// Hammer Bro patrol speed and half-range around its spawn point
    pub const HAMMER_BRO_SPEED: f32 = 0.5;
    pub const HAMMER_BRO_RANGE: f32 = 32.0;
    /// Hammer Bro hop impulse and period (ticks)
    pub const HAMMER_BRO_HOP: f32 = -6.0;
    pub const HAMMER_BRO_HOP_PERIOD: u32 = 160;
    /// Hammer throw period and phase (ticks)
    pub const HAMMER_THROW_PERIOD: u32 = 100;
    pub const HAMMER_THROW_PHASE: u32 = 50;

    /// Thrown hammer launch velocity and gravity
    pub const HAMMER_VX: f32 = 2.0;
    pub const HAMMER_VY: f32 = -4.0;
    pub const HAMMER_GRAVITY: f32 = 0.15;

    /// Invulnerability after being demoted from big to small (ticks)
    pub const IFRAME_TICKS: u32 = 120;
    /// Ticks a freshly kicked shell ignores the player who kicked it
    pub const KICK_GRACE_TICKS: u32 = 10;
    /// Tile bump animation height (pixels, decays 1 per tick)
    pub const BUMP_HEIGHT: u8 = 4;
}
