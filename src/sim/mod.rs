//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (entities keep insertion order)
//! - No rendering, audio or platform dependencies: audible moments are
//!   reported as [`GameEvent`]s for the runner to forward

pub mod collision;
pub mod entity;
pub mod generate;
pub mod level;
pub mod player;
pub mod state;
pub mod tick;
pub mod tile;

pub use collision::{Body, Contact, Rect, TileHit, resolve_horizontal, resolve_vertical};
pub use entity::{Entity, EntityKind, ShellState};
pub use generate::{LevelLayout, Spawn, SpawnKind, generate_level, stage_seed};
pub use level::{ACTIVE_MARGIN, Level};
pub use player::{Player, PlayerInput};
pub use state::{GameEvent, GamePhase, GameState, PLAYER_START};
pub use tick::{TickInput, autopilot, tick};
pub use tile::{Tile, TileContents, TileGrid, TileKind};
