//! Simulation tick
//!
//! Advances the game state by one fixed timestep. Pause is a phase, so a paused
//! state is left untouched apart from the toggle itself.

use super::collision::Rect;
use super::player::PlayerInput;
use super::state::{GameEvent, GamePhase, GameState};
use super::tile::{TileGrid, cell_of};

/// Autopilot looks this far past the player's leading edge
const LOOKAHEAD: f32 = 6.0;
/// Autopilot jumps at enemies within this horizontal distance
const ENEMY_RANGE: f32 = 40.0;

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Run modifier
    pub run: bool,
    pub jump: bool,
    /// Pause toggle (edge-triggered by the frontend)
    pub pause: bool,
    /// Demo mode - a scripted driver plays the stage
    pub autopilot: bool,
}

impl TickInput {
    fn player_input(&self) -> PlayerInput {
        PlayerInput {
            left: self.left,
            right: self.right,
            run: self.run,
            jump: self.jump,
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if input.pause {
        match state.phase {
            GamePhase::Playing => {
                log::info!("Paused at tick {}", state.time_ticks);
                state.phase = GamePhase::Paused;
                state.events.push(GameEvent::Paused);
                return;
            }
            GamePhase::Paused => {
                log::info!("Resumed");
                state.phase = GamePhase::Playing;
                state.events.push(GameEvent::Resumed);
                return;
            }
            GamePhase::StageClear | GamePhase::Dead => {}
        }
    }

    if state.phase != GamePhase::Playing {
        return;
    }
    state.time_ticks += 1;

    let player_input = if input.autopilot {
        autopilot(state)
    } else {
        input.player_input()
    };

    let mut events = Vec::new();
    state.player.update(&player_input, &mut state.level, &mut events);
    state.level.update(&mut state.player, &mut events);
    state.tally(&events);
    state.events.extend(events);

    // Reaching the goal wins even if something hit the player on the same tick
    if state.player.win {
        log::info!(
            "Stage {}-{} clear at tick {}, score {}",
            state.world,
            state.stage,
            state.time_ticks,
            state.score
        );
        state.phase = GamePhase::StageClear;
        state.events.push(GameEvent::StageClear);
    } else if state.player.dead {
        log::info!("Player died at {}-{} (x={:.0})", state.world, state.stage, state.player.body.pos.x);
        state.phase = GamePhase::Dead;
    }
}

/// Scripted demo driver: run right, jump at walls, pits and nearby enemies
pub fn autopilot(state: &GameState) -> PlayerInput {
    let player = &state.player;
    let rect = player.rect();

    let jump = if player.body.on_ground {
        wall_ahead(&state.level.grid, &rect)
            || pit_ahead(&state.level.grid, &rect)
            || state.level.entities.iter().any(|e| {
                let dx = e.body.pos.x - rect.right();
                e.is_enemy()
                    && (0.0..ENEMY_RANGE).contains(&dx)
                    && (e.body.pos.y - rect.y).abs() < 32.0
            })
    } else {
        // Hold for full height while rising
        player.body.vel.y < 0.0
    };

    PlayerInput {
        left: false,
        right: true,
        run: true,
        jump,
    }
}

fn wall_ahead(grid: &TileGrid, rect: &Rect) -> bool {
    let (col, top) = cell_of(rect.right() + LOOKAHEAD, rect.top());
    let (_, bottom) = cell_of(rect.right() + LOOKAHEAD, rect.bottom() - 1.0);
    (top..=bottom).any(|row| grid.kind(col, row).is_solid())
}

fn pit_ahead(grid: &TileGrid, rect: &Rect) -> bool {
    let (col, below) = cell_of(rect.right() + LOOKAHEAD, rect.bottom() + 1.0);
    (below..grid.rows()).all(|row| !grid.kind(col, row).is_solid())
}
