//! Enemies, projectiles and power-ups
//!
//! Every variant shares one physics step (gravity, integrate, axis-separated
//! tile resolution, death zone); variants only decide velocity before it runs.
//! The Hammer is the exception: it flies ballistically through tiles.

use serde::{Deserialize, Serialize};

use super::collision::{Body, resolve_horizontal, resolve_vertical};
use super::generate::{Spawn, SpawnKind};
use super::player::Player;
use super::tile::TileGrid;
use crate::consts::{TILE, VIEW_H};
use crate::phys::*;

/// Entities below this Y are dead
const DEATH_Y: f32 = (VIEW_H + 32) as f32;
/// Hammers below this Y are dead
const HAMMER_DEATH_Y: f32 = (VIEW_H + 16) as f32;

/// Koopa shell state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShellState {
    /// Walking upright
    Walking,
    /// Stationary shell, kicked on contact
    Shell,
    /// Sliding shell that knocks out other enemies
    Moving,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityKind {
    Goomba,
    Koopa {
        red: bool,
        shell: ShellState,
        /// Ticks a freshly kicked shell ignores the player
        kick_grace: u32,
    },
    HammerBro {
        timer: u32,
        home_x: f32,
    },
    Hammer,
    Mushroom,
}

/// A dynamic actor other than the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub body: Body,
    pub kind: EntityKind,
    pub alive: bool,
    /// Ticks since spawn (animation)
    pub frame: u32,
}

impl Entity {
    fn new(body: Body, kind: EntityKind) -> Self {
        Self {
            body,
            kind,
            alive: true,
            frame: 0,
        }
    }

    pub fn goomba(x: f32, y: f32) -> Self {
        let mut body = Body::new(x, y, 16.0, 16.0);
        body.vel.x = -GOOMBA_SPEED;
        Self::new(body, EntityKind::Goomba)
    }

    pub fn koopa(x: f32, y: f32, red: bool) -> Self {
        let mut body = Body::new(x, y, 16.0, 24.0);
        body.vel.x = -KOOPA_SPEED;
        Self::new(
            body,
            EntityKind::Koopa {
                red,
                shell: ShellState::Walking,
                kick_grace: 0,
            },
        )
    }

    pub fn hammer_bro(x: f32, y: f32) -> Self {
        let mut body = Body::new(x, y, 16.0, 24.0);
        body.vel.x = HAMMER_BRO_SPEED;
        Self::new(body, EntityKind::HammerBro { timer: 0, home_x: x })
    }

    /// Hammer thrown toward `direction` (+1 right, -1 left)
    pub fn hammer(x: f32, y: f32, direction: f32) -> Self {
        let mut body = Body::new(x, y, 8.0, 8.0);
        body.vel.x = HAMMER_VX * direction;
        body.vel.y = HAMMER_VY;
        body.facing = direction;
        Self::new(body, EntityKind::Hammer)
    }

    /// Mushroom emerging from the block at `(col, row)`
    pub fn mushroom(col: i32, row: i32) -> Self {
        let mut body = Body::new((col * TILE) as f32, ((row - 1) * TILE) as f32, 16.0, 16.0);
        body.vel.x = MUSHROOM_SPEED;
        body.facing = 1.0;
        Self::new(body, EntityKind::Mushroom)
    }

    /// Enemy for a level spawn point, feet on the bottom of its cell
    pub fn from_spawn(spawn: &Spawn) -> Self {
        let x = (spawn.col * TILE) as f32;
        let floor = ((spawn.row + 1) * TILE) as f32;
        match spawn.kind {
            SpawnKind::Goomba => Self::goomba(x, floor - 16.0),
            SpawnKind::Koopa { red } => Self::koopa(x, floor - 24.0, red),
            SpawnKind::HammerBro => Self::hammer_bro(x, floor - 24.0),
        }
    }

    /// Hostile to the player (everything but power-ups)
    pub fn is_enemy(&self) -> bool {
        !matches!(self.kind, EntityKind::Mushroom)
    }

    /// Can be defeated by landing on it
    pub fn is_stompable(&self) -> bool {
        self.is_enemy() && !matches!(self.kind, EntityKind::Hammer)
    }

    pub fn shell_state(&self) -> Option<ShellState> {
        match self.kind {
            EntityKind::Koopa { shell, .. } => Some(shell),
            _ => None,
        }
    }

    pub fn is_moving_shell(&self) -> bool {
        self.shell_state() == Some(ShellState::Moving)
    }

    /// Kicked shell still ignoring the player
    pub fn in_kick_grace(&self) -> bool {
        matches!(self.kind, EntityKind::Koopa { kick_grace, .. } if kick_grace > 0)
    }

    /// Walking Koopa retreats into a stationary shell (shorter, feet fixed)
    pub fn enter_shell(&mut self) {
        if let EntityKind::Koopa { shell, .. } = &mut self.kind {
            if *shell == ShellState::Walking {
                *shell = ShellState::Shell;
                self.body.pos.y += self.body.h - 16.0;
                self.body.h = 16.0;
                self.body.vel.x = 0.0;
            }
        }
    }

    /// Send a shell sliding toward `direction`
    pub fn kick(&mut self, direction: f32) {
        if let EntityKind::Koopa { shell, kick_grace, .. } = &mut self.kind {
            *shell = ShellState::Moving;
            *kick_grace = KICK_GRACE_TICKS;
            self.body.facing = direction;
            self.body.vel.x = SHELL_SPEED * direction;
        }
    }

    /// Stop a sliding shell
    pub fn stop_shell(&mut self) {
        if let EntityKind::Koopa { shell, .. } = &mut self.kind {
            if *shell == ShellState::Moving {
                *shell = ShellState::Shell;
                self.body.vel.x = 0.0;
            }
        }
    }

    /// Advance one tick; returns a newly thrown projectile, if any
    pub fn update(&mut self, grid: &TileGrid, player: &Player) -> Option<Entity> {
        match &mut self.kind {
            EntityKind::Hammer => {
                self.frame += 1;
                self.body.vel.y += HAMMER_GRAVITY;
                self.body.pos += self.body.vel;
                if self.body.pos.y > HAMMER_DEATH_Y {
                    self.alive = false;
                }
                return None;
            }
            EntityKind::Koopa { shell, kick_grace, .. } => {
                *kick_grace = kick_grace.saturating_sub(1);
                match shell {
                    ShellState::Moving => self.body.vel.x = SHELL_SPEED * self.body.facing,
                    ShellState::Shell => self.body.vel.x = 0.0,
                    ShellState::Walking => {}
                }
            }
            EntityKind::HammerBro { timer, .. } => *timer += 1,
            EntityKind::Goomba | EntityKind::Mushroom => {}
        }

        self.physics_step(grid);

        if let EntityKind::HammerBro { timer, home_x } = self.kind {
            return self.hammer_bro_policy(timer, home_x, player);
        }
        None
    }

    /// Gravity, integration, tile resolution (walls turn the entity around), death zone
    fn physics_step(&mut self, grid: &TileGrid) {
        self.frame += 1;
        let body = &mut self.body;
        body.apply_gravity(GRAVITY, MAX_FALL);
        body.on_ground = false;

        body.pos.x += body.vel.x;
        if resolve_horizontal(body, grid).is_some() {
            body.vel.x = -body.vel.x;
            body.facing = -body.facing;
        }

        body.pos.y += body.vel.y;
        resolve_vertical(body, grid);

        if body.pos.y > DEATH_Y {
            self.alive = false;
        }
    }

    fn hammer_bro_policy(&mut self, timer: u32, home_x: f32, player: &Player) -> Option<Entity> {
        let body = &mut self.body;
        if body.pos.x > home_x + HAMMER_BRO_RANGE {
            body.vel.x = -HAMMER_BRO_SPEED;
        }
        if body.pos.x < home_x - HAMMER_BRO_RANGE {
            body.vel.x = HAMMER_BRO_SPEED;
        }
        body.facing = if player.body.pos.x > body.pos.x { 1.0 } else { -1.0 };

        if timer % HAMMER_BRO_HOP_PERIOD == 0 && body.on_ground {
            body.vel.y = HAMMER_BRO_HOP;
            body.on_ground = false;
        }

        (timer % HAMMER_THROW_PERIOD == HAMMER_THROW_PHASE)
            .then(|| Entity::hammer(body.pos.x, body.pos.y, body.facing))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tile::TileKind;
    use proptest::prelude::*;

    /// 20-column floor with walls at both ends
    fn walled_grid() -> TileGrid {
        let mut grid = TileGrid::new(20, 15);
        for col in 0..20 {
            grid.set(col, 13, TileKind::Ground);
            grid.set(col, 14, TileKind::Ground);
        }
        for row in 0..13 {
            grid.set(0, row, TileKind::Hard);
            grid.set(19, row, TileKind::Hard);
        }
        grid
    }

    fn player_at(x: f32) -> Player {
        let mut player = Player::new(x, 192.0);
        player.body.on_ground = true;
        player
    }

    #[test]
    fn test_spawned_enemy_rests_on_ground() {
        let grid = walled_grid();
        let spawn = Spawn { col: 5, row: 12, kind: SpawnKind::Koopa { red: false } };
        let mut koopa = Entity::from_spawn(&spawn);
        assert_eq!(koopa.body.rect().bottom(), 208.0);

        koopa.update(&grid, &player_at(40.0));
        assert!(koopa.body.on_ground);
        assert_eq!(koopa.body.rect().bottom(), 208.0);
        assert!((koopa.body.pos.x - (80.0 - KOOPA_SPEED)).abs() < 1e-4);
    }

    #[test]
    fn test_goomba_turns_at_wall() {
        let grid = walled_grid();
        let mut goomba = Entity::goomba(16.5, 192.0);
        let player = player_at(200.0);
        goomba.update(&grid, &player);
        // Hit the left wall: snapped flush and reversed
        assert_eq!(goomba.body.pos.x, 16.0);
        assert_eq!(goomba.body.vel.x, GOOMBA_SPEED);
        assert_eq!(goomba.body.facing, 1.0);

        goomba.update(&grid, &player);
        assert_eq!(goomba.body.vel.x, GOOMBA_SPEED);
        assert!(goomba.body.pos.x > 16.0);
    }

    #[test]
    fn test_falls_out_of_the_world() {
        let grid = TileGrid::new(20, 15);
        let mut goomba = Entity::goomba(50.0, (VIEW_H + 30) as f32);
        goomba.body.vel.y = 4.0;
        goomba.update(&grid, &player_at(0.0));
        assert!(!goomba.alive);
    }

    #[test]
    fn test_koopa_shell_cycle() {
        let grid = walled_grid();
        let mut koopa = Entity::koopa(80.0, 184.0, true);

        koopa.enter_shell();
        assert_eq!(koopa.shell_state(), Some(ShellState::Shell));
        assert_eq!(koopa.body.h, 16.0);
        assert_eq!(koopa.body.pos.y, 192.0);
        koopa.update(&grid, &player_at(0.0));
        assert_eq!(koopa.body.vel.x, 0.0);

        koopa.kick(1.0);
        assert!(koopa.is_moving_shell());
        assert!(koopa.in_kick_grace());
        for _ in 0..KICK_GRACE_TICKS {
            koopa.update(&grid, &player_at(0.0));
        }
        assert!(!koopa.in_kick_grace());
        assert!(koopa.body.vel.x.abs() == SHELL_SPEED);

        koopa.stop_shell();
        assert_eq!(koopa.shell_state(), Some(ShellState::Shell));
        // A shell never walks again
        koopa.enter_shell();
        assert_eq!(koopa.shell_state(), Some(ShellState::Shell));
    }

    #[test]
    fn test_moving_shell_bounces_off_walls() {
        let grid = walled_grid();
        let mut koopa = Entity::koopa(280.0, 184.0, false);
        koopa.enter_shell();
        koopa.kick(1.0);
        let player = player_at(0.0);
        for _ in 0..3 {
            koopa.update(&grid, &player);
        }
        assert_eq!(koopa.body.facing, -1.0);
        assert_eq!(koopa.body.vel.x, -SHELL_SPEED);
    }

    #[test]
    fn test_hammer_bro_throws_on_schedule() {
        let grid = walled_grid();
        let mut bro = Entity::hammer_bro(160.0, 184.0);
        let player = player_at(40.0);

        let mut thrown = Vec::new();
        for t in 1..=250u32 {
            if let Some(hammer) = bro.update(&grid, &player) {
                thrown.push((t, hammer));
            }
        }
        let ticks: Vec<u32> = thrown.iter().map(|(t, _)| *t).collect();
        assert_eq!(ticks, vec![50, 150, 250]);

        // Aimed at the player on the left
        let (_, hammer) = &thrown[0];
        assert_eq!(hammer.kind, EntityKind::Hammer);
        assert_eq!(hammer.body.vel.x, -HAMMER_VX);
        assert_eq!(hammer.body.vel.y, HAMMER_VY);
    }

    #[test]
    fn test_hammer_bro_hops_and_patrols() {
        let grid = walled_grid();
        let mut bro = Entity::hammer_bro(160.0, 184.0);
        let player = player_at(300.0);
        for _ in 0..HAMMER_BRO_HOP_PERIOD {
            bro.update(&grid, &player);
        }
        assert_eq!(bro.body.vel.y, HAMMER_BRO_HOP);
        assert!(!bro.body.on_ground);
        assert_eq!(bro.body.facing, 1.0);

        for _ in 0..2000 {
            bro.update(&grid, &player);
            assert!((bro.body.pos.x - 160.0).abs() <= HAMMER_BRO_RANGE + HAMMER_BRO_SPEED + 1e-3);
        }
    }

    #[test]
    fn test_hammer_ignores_tiles_and_expires() {
        let grid = walled_grid();
        let player = player_at(0.0);
        let mut hammer = Entity::hammer(100.0, 200.0, 1.0);
        hammer.body.vel.y = 2.0;
        hammer.update(&grid, &player);
        // Passed into the ground without being stopped
        assert!((hammer.body.pos.y - 202.15).abs() < 1e-4);
        assert!((hammer.body.pos.x - 102.0).abs() < 1e-4);

        let mut hammer = Entity::hammer(100.0, (VIEW_H + 16) as f32, 1.0);
        hammer.body.vel.y = 1.0;
        hammer.update(&grid, &player);
        assert!(!hammer.alive);
        assert!(!hammer.is_stompable());
        assert!(hammer.is_enemy());
    }

    #[test]
    fn test_mushroom_emerges_above_block() {
        let mushroom = Entity::mushroom(10, 9);
        assert_eq!(mushroom.body.pos.x, 160.0);
        assert_eq!(mushroom.body.pos.y, 128.0);
        assert!(!mushroom.is_enemy());
        assert_eq!(mushroom.body.vel.x, MUSHROOM_SPEED);
    }

    proptest! {
        #[test]
        fn prop_fall_speed_is_clamped(vy in -10.0f32..20.0, y in -100.0f32..150.0) {
            let grid = TileGrid::new(20, 15);
            let mut goomba = Entity::goomba(100.0, y);
            goomba.body.vel.y = vy;
            goomba.update(&grid, &player_at(0.0));
            prop_assert!(goomba.body.vel.y <= MAX_FALL);
        }

        #[test]
        fn prop_single_flip_per_wall_contact(
            x in 24.0f32..280.0,
            speed in 0.1f32..3.5,
            left in any::<bool>(),
        ) {
            let grid = walled_grid();
            let mut goomba = Entity::goomba(x, 192.0);
            goomba.body.vel.x = if left { -speed } else { speed };
            let player = player_at(0.0);
            let mut previous = goomba.body.vel.x.signum();
            let mut flipped_last_tick = false;
            for _ in 0..600 {
                goomba.update(&grid, &player);
                let sign = goomba.body.vel.x.signum();
                let flipped = sign != previous;
                prop_assert!(!(flipped && flipped_last_tick), "double flip");
                flipped_last_tick = flipped;
                previous = sign;
            }
        }
    }
}
