//! Level orchestration
//!
//! Owns the tile grid and the live entity set. Each tick scrolls the camera,
//! decays tile bumps, advances entities inside the activation band, resolves
//! entity-vs-player and shell-vs-enemy contacts, then drops dead entities.

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::entity::{Entity, EntityKind, ShellState};
use super::generate::{LevelLayout, generate_level};
use super::player::Player;
use super::state::GameEvent;
use super::tile::{TileContents, TileGrid, TileKind};
use crate::consts::VIEW_W;
use crate::phys::BOUNCE_FORCE;

/// Entities farther than this outside the viewport are frozen
pub const ACTIVE_MARGIN: f32 = 64.0;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Level {
    pub world: u32,
    pub stage: u32,
    pub grid: TileGrid,
    pub entities: Vec<Entity>,
    /// Horizontal scroll offset in world pixels; never decreases
    pub camera: f32,
}

impl Level {
    /// Generate the level for `(world, stage)`
    pub fn new(world: u32, stage: u32, seed: u64) -> Self {
        let layout = generate_level(world, stage, seed);
        log::info!(
            "Level {}-{} (seed {:#x}): {} tiles, {} enemies",
            world,
            stage,
            seed,
            layout.grid.occupied(),
            layout.spawns.len()
        );
        Self::from_layout(world, stage, layout)
    }

    pub fn from_layout(world: u32, stage: u32, layout: LevelLayout) -> Self {
        let entities = layout.spawns.iter().map(Entity::from_spawn).collect();
        Self {
            world,
            stage,
            grid: layout.grid,
            entities,
            camera: 0.0,
        }
    }

    /// Level width in world pixels
    pub fn pixel_width(&self) -> f32 {
        self.grid.pixel_width()
    }

    /// Rightmost camera position
    pub fn max_camera(&self) -> f32 {
        (self.pixel_width() - VIEW_W as f32).max(0.0)
    }

    /// Track the player rightward only, within level bounds
    pub fn update_camera(&mut self, player_x: f32) {
        let target = player_x - (VIEW_W / 2) as f32;
        self.camera = self.camera.max(target).min(self.max_camera()).max(0.0);
    }

    /// Whether an entity at world `x` is updated (and drawn) this tick
    pub fn in_active_band(&self, x: f32) -> bool {
        let dx = x - self.camera;
        dx > -ACTIVE_MARGIN && dx < VIEW_W as f32 + ACTIVE_MARGIN
    }

    pub fn update(&mut self, player: &mut Player, events: &mut Vec<GameEvent>) {
        self.update_camera(player.body.pos.x);
        self.grid.decay_bumps();

        let mut spawned = Vec::new();
        for i in 0..self.entities.len() {
            if !self.in_active_band(self.entities[i].body.pos.x) {
                continue;
            }
            let entity = &mut self.entities[i];
            if !entity.alive {
                continue;
            }
            if let Some(projectile) = entity.update(&self.grid, player) {
                spawned.push(projectile);
            }
            if entity.alive && !player.dead && player.rect().overlaps(&entity.body.rect()) {
                interact(entity, player, events);
            }
        }

        self.shell_hits(events);
        self.entities.extend(spawned);

        let camera = self.camera;
        self.entities.retain(|e| e.alive && e.body.pos.x - camera > -ACTIVE_MARGIN);
    }

    /// Moving shells knock out every other stompable enemy they overlap
    fn shell_hits(&mut self, events: &mut Vec<GameEvent>) {
        for i in 0..self.entities.len() {
            let shell = &self.entities[i];
            if !shell.alive || !shell.is_moving_shell() || !self.in_active_band(shell.body.pos.x) {
                continue;
            }
            let shell_rect = shell.body.rect();

            for j in 0..self.entities.len() {
                let other = &self.entities[j];
                if i == j || !other.alive || !other.is_stompable() {
                    continue;
                }
                if !shell_rect.overlaps(&other.body.rect()) {
                    continue;
                }
                // Two sliding shells take each other out
                if other.is_moving_shell() {
                    self.entities[i].alive = false;
                }
                self.entities[j].alive = false;
                events.push(GameEvent::ShellHit);
                if !self.entities[i].alive {
                    break;
                }
            }
        }
    }

    /// React to the player's head hitting `(col, row)`
    pub fn hit_tile_from_below(&mut self, col: i32, row: i32, events: &mut Vec<GameEvent>) {
        let Some(tile) = self.grid.get_mut(col, row) else {
            return;
        };
        match tile.kind {
            TileKind::Question if !tile.used => {
                tile.used = true;
                tile.start_bump();
                match tile.contents {
                    TileContents::Coin => events.push(GameEvent::Coin),
                    TileContents::Mushroom => {
                        self.entities.push(Entity::mushroom(col, row));
                        events.push(GameEvent::Bump);
                    }
                }
            }
            TileKind::Question => events.push(GameEvent::Bump),
            TileKind::Brick => {
                tile.start_bump();
                events.push(GameEvent::Bump);
            }
            _ => {}
        }
    }

    /// Collect every uncollected coin tile overlapping `rect`
    pub fn collect_coins(&mut self, rect: &Rect, events: &mut Vec<GameEvent>) {
        let hits: Vec<(i32, i32)> = self
            .grid
            .tiles_near(rect.x, rect.y)
            .filter(|t| t.kind == TileKind::Coin && !t.used && rect.overlaps(&t.rect()))
            .map(|t| (t.col, t.row))
            .collect();

        for (col, row) in hits {
            if let Some(tile) = self.grid.get_mut(col, row) {
                tile.used = true;
                events.push(GameEvent::Coin);
            }
        }
    }
}

/// Resolve an overlap between the player and a live entity
fn interact(entity: &mut Entity, player: &mut Player, events: &mut Vec<GameEvent>) {
    match entity.kind {
        EntityKind::Mushroom => {
            entity.alive = false;
            player.grow();
            events.push(GameEvent::PowerUp);
            return;
        }
        EntityKind::Hammer => {
            player.hurt(events);
            return;
        }
        _ => {}
    }

    let stomp = player.body.vel.y > 0.0 && player.body.pos.y < entity.body.pos.y;

    match entity.shell_state() {
        Some(ShellState::Walking) if stomp => {
            entity.enter_shell();
            bounce(player, events);
        }
        Some(ShellState::Shell) => {
            // Kick away from the player's side
            let direction = if player.rect().center_x() < entity.body.rect().center_x() {
                1.0
            } else {
                -1.0
            };
            entity.kick(direction);
            events.push(GameEvent::Kick);
            if stomp {
                player.body.vel.y = BOUNCE_FORCE;
            }
        }
        Some(ShellState::Moving) if stomp => {
            entity.stop_shell();
            bounce(player, events);
        }
        Some(ShellState::Moving) => {
            if !entity.in_kick_grace() {
                player.hurt(events);
            }
        }
        Some(ShellState::Walking) | None => {
            if stomp {
                entity.alive = false;
                bounce(player, events);
            } else {
                player.hurt(events);
            }
        }
    }
}

fn bounce(player: &mut Player, events: &mut Vec<GameEvent>) {
    player.body.vel.y = BOUNCE_FORCE;
    events.push(GameEvent::Stomp);
}
