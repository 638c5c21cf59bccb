//! Player physics and power state machine
//!
//! Small and big are the two live states; `iframe` counts down the
//! invulnerability window after a big player is hit. `dead` and `win` are
//! terminal flags consumed by the game loop.

use serde::{Deserialize, Serialize};

use super::collision::{Body, Contact, Rect, resolve_horizontal, resolve_vertical};
use super::level::Level;
use super::state::GameEvent;
use crate::consts::VIEW_H;
use crate::phys::*;

/// Falling below this Y is a pit death
const PIT_Y: f32 = (VIEW_H + 16) as f32;
/// Reaching this close to the right edge clears the stage
const WIN_MARGIN: f32 = 20.0;

const SMALL_H: f32 = 16.0;
const BIG_H: f32 = 32.0;

/// Logical actions held this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    /// Run modifier
    pub run: bool,
    pub jump: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// 12px-wide footprint inset 2px into the 16px sprite
    pub body: Body,
    pub big: bool,
    pub dead: bool,
    pub win: bool,
    /// Invulnerability ticks remaining
    pub iframe: u32,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        let mut body = Body::new(x, y, 12.0, SMALL_H);
        body.inset = 2.0;
        body.facing = 1.0;
        Self {
            body,
            big: false,
            dead: false,
            win: false,
            iframe: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Advance one tick against `level`
    pub fn update(&mut self, input: &PlayerInput, level: &mut Level, events: &mut Vec<GameEvent>) {
        if self.dead {
            return;
        }

        self.walk(input);
        self.body.pos.x += self.body.vel.x;
        if resolve_horizontal(&mut self.body, &level.grid).is_some() {
            self.body.vel.x = 0.0;
        }

        let gravity = if input.jump && self.body.vel.y < 0.0 {
            GRAVITY_HOLDING
        } else {
            GRAVITY
        };
        self.body.apply_gravity(gravity, MAX_FALL);
        self.body.pos.y += self.body.vel.y;

        self.body.on_ground = false;
        if let Some(hit) = resolve_vertical(&mut self.body, &level.grid) {
            if hit.contact == Contact::Ceiling {
                level.hit_tile_from_below(hit.col, hit.row, events);
            }
        }
        level.collect_coins(&self.rect(), events);

        if input.jump && self.body.on_ground {
            self.body.vel.y = JUMP_FORCE;
            self.body.on_ground = false;
            events.push(GameEvent::Jump { big: self.big });
        }

        if self.body.pos.y > PIT_Y {
            self.die(events);
        }
        if self.body.pos.x > level.pixel_width() - WIN_MARGIN {
            self.win = true;
        }

        self.iframe = self.iframe.saturating_sub(1);
    }

    /// Horizontal acceleration, skid and friction; left wins over right
    fn walk(&mut self, input: &PlayerInput) {
        let (accel, max_v) = if input.run {
            (RUN_ACCEL, RUN_MAX)
        } else {
            (WALK_ACCEL, WALK_MAX)
        };
        let vx = &mut self.body.vel.x;

        if input.left {
            *vx -= if *vx > 0.0 { SKID_DECEL } else { accel };
            self.body.facing = -1.0;
        } else if input.right {
            *vx += if *vx < 0.0 { SKID_DECEL } else { accel };
            self.body.facing = 1.0;
        } else {
            *vx *= if self.body.on_ground { FRICTION } else { AIR_FRICTION };
            if vx.abs() < STOP_THRESHOLD {
                *vx = 0.0;
            }
        }

        *vx = vx.clamp(-max_v, max_v);
    }

    /// Take a hit: ignored while invulnerable, big demotes to small, small dies
    pub fn hurt(&mut self, events: &mut Vec<GameEvent>) {
        if self.iframe > 0 || self.dead {
            return;
        }
        if self.big {
            self.big = false;
            self.body.pos.y += BIG_H - SMALL_H;
            self.body.h = SMALL_H;
            self.iframe = IFRAME_TICKS;
            events.push(GameEvent::Shrink);
        } else {
            self.die(events);
        }
    }

    pub fn die(&mut self, events: &mut Vec<GameEvent>) {
        if !self.dead {
            self.dead = true;
            events.push(GameEvent::Die);
        }
    }

    /// Power up to big, growing upward from the feet
    pub fn grow(&mut self) {
        if !self.big {
            self.big = true;
            self.body.pos.y -= BIG_H - SMALL_H;
            self.body.h = BIG_H;
        }
    }

    /// Flicker phase while invulnerable
    pub fn visible(&self) -> bool {
        self.iframe % 8 < 4
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::generate::LevelLayout;
    use crate::sim::tile::{TileContents, TileGrid, TileKind};

    const IDLE: PlayerInput = PlayerInput {
        left: false,
        right: false,
        run: false,
        jump: false,
    };

    fn flat_level() -> Level {
        let mut grid = TileGrid::new(40, 15);
        for col in 0..40 {
            grid.set(col, 13, TileKind::Ground);
            grid.set(col, 14, TileKind::Ground);
        }
        Level::from_layout(1, 1, LevelLayout { grid, spawns: Vec::new() })
    }

    fn grounded_player(x: f32) -> Player {
        let mut player = Player::new(x, 192.0);
        player.body.on_ground = true;
        player
    }

    /// Place a small player directly under cell `(col, row)` moving up into it
    fn under_tile(col: i32, row: i32) -> Player {
        let mut player = Player::new((col * 16 - 2) as f32, ((row + 1) * 16 + 1) as f32);
        player.body.vel.y = -3.0;
        player
    }

    #[test]
    fn test_friction_reaches_exact_zero() {
        let mut level = flat_level();
        let mut events = Vec::new();
        let mut player = grounded_player(40.0);
        player.body.vel.x = 0.11;

        player.update(&IDLE, &mut level, &mut events);
        // 0.11 * 0.88 = 0.0968 < 0.1
        assert_eq!(player.body.vel.x, 0.0);

        player.body.vel.x = 1.0;
        let mut last = player.body.vel.x;
        for _ in 0..40 {
            player.update(&IDLE, &mut level, &mut events);
            assert!(player.body.vel.x <= last);
            last = player.body.vel.x;
        }
        assert_eq!(player.body.vel.x, 0.0);
        assert!(player.body.on_ground);
    }

    #[test]
    fn test_acceleration_caps() {
        let mut level = flat_level();
        let mut events = Vec::new();
        let mut player = grounded_player(40.0);
        let walk = PlayerInput { right: true, ..IDLE };
        for _ in 0..60 {
            player.update(&walk, &mut level, &mut events);
        }
        assert!((player.body.vel.x - WALK_MAX).abs() < 1e-5);

        let run = PlayerInput { run: true, ..walk };
        for _ in 0..60 {
            player.update(&run, &mut level, &mut events);
        }
        assert!((player.body.vel.x - RUN_MAX).abs() < 1e-5);
    }

    #[test]
    fn test_skid_and_left_precedence() {
        let mut level = flat_level();
        let mut events = Vec::new();
        let mut player = grounded_player(200.0);
        player.body.vel.x = 1.0;
        let both = PlayerInput { left: true, right: true, ..IDLE };
        player.update(&both, &mut level, &mut events);
        assert!((player.body.vel.x - (1.0 - SKID_DECEL)).abs() < 1e-6);
        assert_eq!(player.body.facing, -1.0);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let mut level = flat_level();
        let mut events = Vec::new();
        let mut player = grounded_player(40.0);
        let jump = PlayerInput { jump: true, ..IDLE };

        player.update(&jump, &mut level, &mut events);
        assert_eq!(player.body.vel.y, JUMP_FORCE);
        assert!(!player.body.on_ground);
        assert_eq!(events, vec![GameEvent::Jump { big: false }]);

        // Holding jump in the air does not re-trigger
        events.clear();
        player.update(&jump, &mut level, &mut events);
        assert!(events.is_empty());
        assert!((player.body.vel.y - (JUMP_FORCE + GRAVITY_HOLDING)).abs() < 1e-6);
    }

    #[test]
    fn test_variable_jump_height() {
        let apex = |hold_ticks: usize| {
            let mut level = flat_level();
            let mut events = Vec::new();
            let mut player = grounded_player(40.0);
            let mut best = player.body.pos.y;
            for t in 0..120 {
                let input = PlayerInput { jump: t < hold_ticks, ..IDLE };
                player.update(&input, &mut level, &mut events);
                best = best.min(player.body.pos.y);
            }
            best
        };
        // Lower y is higher on screen
        assert!(apex(40) < apex(1) - 20.0);
    }

    #[test]
    fn test_big_player_hurt_shrinks_with_iframes() {
        let mut events = Vec::new();
        let mut player = grounded_player(40.0);
        player.grow();
        assert_eq!(player.body.h, 32.0);
        assert_eq!(player.body.pos.y, 176.0);

        player.hurt(&mut events);
        assert!(!player.big);
        assert!(!player.dead);
        assert_eq!(player.iframe, IFRAME_TICKS);
        assert_eq!(player.body.h, 16.0);
        assert_eq!(player.body.rect().bottom(), 208.0);
        assert_eq!(events, vec![GameEvent::Shrink]);
    }

    #[test]
    fn test_small_player_hurt_dies() {
        let mut events = Vec::new();
        let mut player = grounded_player(40.0);
        player.hurt(&mut events);
        assert!(player.dead);
        assert_eq!(events, vec![GameEvent::Die]);

        // Dying twice emits one event
        player.die(&mut events);
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_hurt_during_iframes_is_ignored() {
        let mut events = Vec::new();
        let mut player = grounded_player(40.0);
        player.iframe = 5;
        player.hurt(&mut events);
        assert!(!player.dead);

        player.grow();
        player.hurt(&mut events);
        assert!(player.big);
        assert!(events.is_empty());
    }

    #[test]
    fn test_iframes_count_down() {
        let mut level = flat_level();
        let mut events = Vec::new();
        let mut player = grounded_player(40.0);
        player.iframe = 3;
        for expected in [2, 1, 0, 0] {
            player.update(&IDLE, &mut level, &mut events);
            assert_eq!(player.iframe, expected);
        }
    }

    #[test]
    fn test_question_block_used_once() {
        let mut level = flat_level();
        level.grid.set(5, 9, TileKind::Question);
        let mut events = Vec::new();

        let mut player = under_tile(5, 9);
        player.update(&IDLE, &mut level, &mut events);
        let tile = level.grid.get(5, 9).unwrap();
        assert!(tile.used);
        assert_eq!(tile.bump, BUMP_HEIGHT);
        assert_eq!(player.body.pos.y, 160.0);
        assert_eq!(player.body.vel.y, 0.0);
        assert_eq!(events, vec![GameEvent::Coin]);

        level.grid.get_mut(5, 9).unwrap().bump = 0;
        events.clear();
        let mut player = under_tile(5, 9);
        player.update(&IDLE, &mut level, &mut events);
        let tile = level.grid.get(5, 9).unwrap();
        assert!(tile.used);
        assert_eq!(tile.bump, 0);
        assert_eq!(events, vec![GameEvent::Bump]);
    }

    #[test]
    fn test_head_bump_between_blocks_hits_one() {
        let mut level = flat_level();
        level.grid.set(5, 9, TileKind::Question);
        level.grid.set(6, 9, TileKind::Question);
        let mut events = Vec::new();

        // Footprint 92..104: straddles both, centred nearer column 6
        let mut player = under_tile(6, 9);
        player.body.pos.x -= 4.0;
        player.update(&IDLE, &mut level, &mut events);

        assert!(level.grid.get(6, 9).unwrap().used);
        let neighbour = level.grid.get(5, 9).unwrap();
        assert!(!neighbour.used);
        assert_eq!(neighbour.bump, 0);
        assert_eq!(events, vec![GameEvent::Coin]);
    }

    #[test]
    fn test_brick_bumps_every_hit() {
        let mut level = flat_level();
        level.grid.set(7, 9, TileKind::Brick);
        let mut events = Vec::new();
        for _ in 0..3 {
            level.grid.get_mut(7, 9).unwrap().bump = 0;
            let mut player = under_tile(7, 9);
            player.update(&IDLE, &mut level, &mut events);
            let tile = level.grid.get(7, 9).unwrap();
            assert_eq!(tile.bump, BUMP_HEIGHT);
            assert!(!tile.used);
        }
        assert_eq!(events, vec![GameEvent::Bump; 3]);
        assert_eq!(level.grid.kind(7, 9), TileKind::Brick);
    }

    #[test]
    fn test_mushroom_block_releases_power_up() {
        let mut level = flat_level();
        level.grid.set(6, 9, TileKind::Question);
        level.grid.set_contents(6, 9, TileContents::Mushroom);
        let mut events = Vec::new();
        let mut player = under_tile(6, 9);
        player.update(&IDLE, &mut level, &mut events);
        assert_eq!(level.entities.len(), 1);
        assert!(!level.entities[0].is_enemy());
        assert_eq!(level.entities[0].body.pos.y, 128.0);
    }

    #[test]
    fn test_coin_tile_collected_by_overlap() {
        let mut level = flat_level();
        level.grid.set(3, 12, TileKind::Coin);
        let mut events = Vec::new();
        let mut player = grounded_player(40.0);
        player.update(&IDLE, &mut level, &mut events);
        assert!(level.grid.get(3, 12).unwrap().used);
        assert_eq!(events, vec![GameEvent::Coin]);

        events.clear();
        player.update(&IDLE, &mut level, &mut events);
        assert!(events.is_empty());
    }

    #[test]
    fn test_pit_death_ignores_iframes() {
        let mut level = flat_level();
        let mut events = Vec::new();
        let mut player = Player::new(40.0, PIT_Y);
        player.iframe = 60;
        player.update(&IDLE, &mut level, &mut events);
        assert!(player.dead);
    }

    #[test]
    fn test_reaching_right_edge_wins() {
        let mut level = flat_level();
        let mut events = Vec::new();
        let mut player = grounded_player(level.pixel_width() - 21.0);
        let run = PlayerInput { right: true, ..IDLE };
        player.update(&run, &mut level, &mut events);
        assert!(!player.win);
        for _ in 0..10 {
            player.update(&run, &mut level, &mut events);
        }
        assert!(player.win);
    }

    #[test]
    fn test_wall_stops_player() {
        let mut level = flat_level();
        level.grid.set(10, 12, TileKind::Pipe);
        let mut events = Vec::new();
        let mut player = grounded_player(160.0 - 14.0 - 0.5);
        player.body.vel.x = 1.0;
        let right = PlayerInput { right: true, ..IDLE };
        player.update(&right, &mut level, &mut events);
        assert_eq!(player.rect().right(), 160.0);
        assert_eq!(player.body.vel.x, 0.0);
    }
}
