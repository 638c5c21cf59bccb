//! Software rendering module
//!
//! The scene is drawn into a fixed 256x240 [`FrameBuffer`]; the frontend scales
//! and presents it. Text is left to the frontend, which receives a [`Hud`].

pub mod framebuffer;
pub mod palette;
pub mod shapes;

pub use framebuffer::FrameBuffer;

use crate::consts::{TILE, VIEW_H, VIEW_W};
use crate::sim::{GamePhase, GameState};

/// Height of the pause banner bar
const BANNER_H: i32 = 24;

/// Heads-up display values for the frontend to print
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub world: u32,
    pub stage: u32,
    pub lives: i32,
    pub score: u64,
    pub coins: u32,
    pub paused: bool,
}

impl Hud {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            world: state.world,
            stage: state.stage,
            lives: state.lives,
            score: state.score,
            coins: state.coins,
            paused: state.phase == GamePhase::Paused,
        }
    }

    /// Status line, e.g. `WORLD 1-1  LIVES 3  SCORE 000100  COINS 02`
    pub fn status_line(&self) -> String {
        format!(
            "WORLD {}-{}  LIVES {}  SCORE {:06}  COINS {:02}",
            self.world,
            self.stage,
            self.lives.max(0),
            self.score,
            self.coins
        )
    }

    /// Centered banner text, if any
    pub fn banner(&self) -> Option<&'static str> {
        self.paused.then_some("PAUSED")
    }
}

/// Draw the level, entities and player at the current camera
pub fn render_scene(state: &GameState, fb: &mut FrameBuffer) {
    fb.clear(palette::SKY);

    let level = &state.level;
    let camera = level.camera.floor() as i32;

    let first = camera.div_euclid(TILE) - 1;
    let last = (camera + VIEW_W).div_euclid(TILE) + 1;
    for tile in level.grid.tiles_in_columns(first, last) {
        shapes::tile(fb, tile, camera);
    }

    for entity in &level.entities {
        let sx = entity.body.pos.x - level.camera;
        if entity.alive && sx > -(TILE as f32) && sx < VIEW_W as f32 {
            shapes::entity(fb, entity, camera);
        }
    }

    shapes::player(fb, &state.player, camera);
}

/// Dim the frame and lay a dark bar across the middle for the pause banner
pub fn render_pause_overlay(fb: &mut FrameBuffer) {
    fb.dim(0.5);
    fb.fill_rect(0, (VIEW_H - BANNER_H) / 2, VIEW_W, BANNER_H, palette::BLACK);
}

/// Full frame for the current phase
pub fn render(state: &GameState, fb: &mut FrameBuffer) {
    render_scene(state, fb);
    if state.phase == GamePhase::Paused {
        render_pause_overlay(fb);
    }
}
