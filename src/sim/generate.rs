//! Level generation
//!
//! World 1-1 is hand-authored; every other stage is carved from a seeded
//! [`Pcg32`] keyed by `(world, stage, seed)`, so a given key always yields the
//! same layout.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::tile::{TileContents, TileGrid, TileKind};
use crate::consts::{LEVEL_COLS, LEVEL_ROWS};

/// Top ground row; the ground is two rows deep
pub const GROUND_ROW: i32 = 13;
/// Row enemies stand on top of the ground
pub const SPAWN_ROW: i32 = GROUND_ROW - 1;
/// Procedural features start this many columns in and stop this many before the end
const MARGIN_COLS: i32 = 20;
/// Column stride of the procedural feature walk
const FEATURE_STRIDE: usize = 8;
/// The goal block sits this many columns from the right edge
const GOAL_OFFSET: i32 = 10;
/// Flagpole height above the goal block (tiles)
const POLE_HEIGHT: i32 = 9;

/// Enemy placed at level construction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpawnKind {
    Goomba,
    Koopa { red: bool },
    HammerBro,
}

/// Enemy spawn point; the enemy stands on the bottom of the cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Spawn {
    pub col: i32,
    pub row: i32,
    pub kind: SpawnKind,
}

/// Generated tiles plus the enemies that populate them
#[derive(Debug, Clone)]
pub struct LevelLayout {
    pub grid: TileGrid,
    pub spawns: Vec<Spawn>,
}

impl LevelLayout {
    fn new() -> Self {
        let mut grid = TileGrid::new(LEVEL_COLS, LEVEL_ROWS);
        for col in 0..grid.cols() {
            grid.set(col, GROUND_ROW, TileKind::Ground);
            grid.set(col, GROUND_ROW + 1, TileKind::Ground);
        }
        Self { grid, spawns: Vec::new() }
    }

    fn block(&mut self, col: i32, row: i32, kind: TileKind) {
        self.grid.set(col, row, kind);
    }

    /// Two-wide pipe rising `height` tiles from the ground
    fn pipe(&mut self, col: i32, height: i32) {
        for i in 0..height {
            self.block(col, SPAWN_ROW - i, TileKind::Pipe);
            self.block(col + 1, SPAWN_ROW - i, TileKind::Pipe);
        }
    }

    fn pit(&mut self, col: i32) {
        self.block(col, GROUND_ROW, TileKind::Empty);
        self.block(col, GROUND_ROW + 1, TileKind::Empty);
    }

    fn spawn(&mut self, col: i32, kind: SpawnKind) {
        self.spawns.push(Spawn { col, row: SPAWN_ROW, kind });
    }

    fn goal(&mut self) {
        let col = self.grid.cols() - GOAL_OFFSET;
        self.block(col, SPAWN_ROW, TileKind::Hard);
        for i in 1..=POLE_HEIGHT {
            self.block(col, SPAWN_ROW - i, TileKind::Flagpole);
        }
    }
}

/// Per-stage RNG seed: a multiplicative hash of `(world, stage)` plus the run seed
pub fn stage_seed(world: u32, stage: u32, seed: u64) -> u64 {
    let key = (u64::from(world) << 8) | u64::from(stage);
    key.wrapping_mul(2654435761).wrapping_add(seed)
}

/// Build the layout for `(world, stage)`
pub fn generate_level(world: u32, stage: u32, seed: u64) -> LevelLayout {
    let mut layout = LevelLayout::new();

    if (world, stage) == (1, 1) {
        world_one_one(&mut layout);
    } else {
        let mut rng = Pcg32::seed_from_u64(stage_seed(world, stage, seed));
        procedural(&mut layout, world, &mut rng);
    }

    layout.goal();
    layout
}

fn world_one_one(layout: &mut LevelLayout) {
    layout.block(16, 9, TileKind::Question);
    for i in 0..5 {
        let kind = if i % 2 == 0 { TileKind::Brick } else { TileKind::Question };
        layout.block(20 + i, 9, kind);
    }
    layout.grid.set_contents(21, 9, TileContents::Mushroom);

    layout.pipe(28, 2);
    layout.pipe(38, 3);
    layout.pipe(46, 4);
    layout.spawn(22, SpawnKind::Goomba);
    layout.spawn(40, SpawnKind::Goomba);

    layout.pit(69);
    layout.pit(70);

    // Staircase up to the flag
    for i in 0..8 {
        for j in 0..i {
            layout.block(134 + i, SPAWN_ROW - j, TileKind::Hard);
        }
    }
}

fn procedural<R: Rng + ?Sized>(layout: &mut LevelLayout, world: u32, rng: &mut R) {
    let end = layout.grid.cols() - MARGIN_COLS;

    for col in (MARGIN_COLS..end).step_by(FEATURE_STRIDE) {
        if rng.random::<f64>() < 0.1 {
            layout.pit(col);
        } else if rng.random::<f64>() < 0.15 {
            let height = rng.random_range(2..=4);
            layout.pipe(col, height);
        } else if rng.random::<f64>() < 0.2 {
            let row = if rng.random::<f64>() < 0.5 { 9 } else { 5 };
            if rng.random::<f64>() < 0.3 {
                layout.block(col, row, TileKind::Question);
                if rng.random::<f64>() < 0.2 {
                    layout.grid.set_contents(col, row, TileContents::Mushroom);
                }
            } else {
                layout.block(col, row, TileKind::Brick);
            }

            if rng.random::<f64>() < 0.4 {
                layout.spawn(col, SpawnKind::Goomba);
            } else if rng.random::<f64>() < 0.1 {
                layout.spawn(col, SpawnKind::Koopa { red: world % 2 == 0 });
            } else if world >= 3 && rng.random::<f64>() < 0.15 {
                layout.spawn(col, SpawnKind::HammerBro);
            }
        } else if rng.random::<f64>() < 0.1 {
            for i in 0..3 {
                layout.block(col + i, 9, TileKind::Coin);
            }
        }
    }
}
