//! Game state and campaign progression
//!
//! Everything one run needs lives here: the current stage, lives, score and
//! the level/player pair being simulated.

use serde::{Deserialize, Serialize};

use super::level::Level;
use super::player::Player;
use crate::consts::{STAGES_PER_WORLD, WORLD_COUNT};

/// Player spawn point (world pixels)
pub const PLAYER_START: (f32, f32) = (40.0, 190.0);

/// Score awards
pub const SCORE_STOMP: u64 = 100;
pub const SCORE_SHELL_HIT: u64 = 200;
pub const SCORE_COIN: u64 = 200;
pub const SCORE_POWER_UP: u64 = 1000;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Simulation and audio suspended
    Paused,
    /// Player reached the goal; waiting to advance
    StageClear,
    /// Player died; waiting to restart
    Dead,
}

/// Something audible happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Jump { big: bool },
    Stomp,
    /// Stationary shell kicked
    Kick,
    /// Moving shell knocked out an enemy
    ShellHit,
    Coin,
    Bump,
    PowerUp,
    /// Big player demoted to small
    Shrink,
    Die,
    Paused,
    Resumed,
    StageClear,
}

/// Complete run state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Run seed mixed into procedural stages
    pub seed: u64,
    pub world: u32,
    pub stage: u32,
    /// Spare lives; the run resets when this drops below zero
    pub lives: i32,
    pub starting_lives: i32,
    pub score: u64,
    pub coins: u32,
    /// Simulation tick counter (playing ticks only)
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub level: Level,
    pub player: Player,
    /// Events produced since the runner last drained them
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// New run at world 1-1
    pub fn new(seed: u64, starting_lives: i32) -> Self {
        Self {
            seed,
            world: 1,
            stage: 1,
            lives: starting_lives,
            starting_lives,
            score: 0,
            coins: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            level: Level::new(1, 1, seed),
            player: Player::new(PLAYER_START.0, PLAYER_START.1),
            events: Vec::new(),
        }
    }

    /// Fresh level and player for the current `(world, stage)`
    pub fn start_stage(&mut self) {
        self.level = Level::new(self.world, self.stage, self.seed);
        self.player = Player::new(PLAYER_START.0, PLAYER_START.1);
        self.phase = GamePhase::Playing;
    }

    /// Move to the next stage, wrapping the world after the last stage
    pub fn advance_stage(&mut self) {
        self.stage += 1;
        if self.stage > STAGES_PER_WORLD {
            self.stage = 1;
            self.world += 1;
            if self.world > WORLD_COUNT {
                log::info!("Campaign complete, wrapping to 1-1");
                self.world = 1;
            }
        }
        log::info!("Advancing to {}-{}", self.world, self.stage);
        self.start_stage();
    }

    /// Spend a life and restart the stage, or reset the run when none remain
    pub fn lose_life(&mut self) {
        self.lives -= 1;
        if self.lives < 0 {
            log::info!("Game over at {}-{} with score {}", self.world, self.stage, self.score);
            self.world = 1;
            self.stage = 1;
            self.lives = self.starting_lives;
            self.score = 0;
            self.coins = 0;
        } else {
            log::info!("Life lost, {} remaining", self.lives);
        }
        self.start_stage();
    }

    /// Stage finished (cleared or died), waiting on the runner
    pub fn in_transition(&self) -> bool {
        matches!(self.phase, GamePhase::StageClear | GamePhase::Dead)
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Add the score and coin awards for `events`
    pub fn tally(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::Stomp => self.score += SCORE_STOMP,
                GameEvent::ShellHit => self.score += SCORE_SHELL_HIT,
                GameEvent::Coin => {
                    self.score += SCORE_COIN;
                    self.coins += 1;
                }
                GameEvent::PowerUp => self.score += SCORE_POWER_UP,
                _ => {}
            }
        }
    }
}
