//! Sprite drawing for tiles, entities and the player
//!
//! Every sprite is a handful of filled rectangles in world space, shifted left
//! by the camera.

use super::framebuffer::FrameBuffer;
use super::palette as pal;
use crate::consts::TILE;
use crate::sim::{Entity, EntityKind, Player, ShellState, Tile, TileKind};

#[inline]
fn px(v: f32) -> i32 {
    v.floor() as i32
}

/// Draw one tile; coins already collected are skipped
pub fn tile(fb: &mut FrameBuffer, tile: &Tile, camera: i32) {
    let x = tile.col * TILE - camera;
    let y = tile.row * TILE - i32::from(tile.bump);

    match tile.kind {
        TileKind::Empty => {}
        TileKind::Ground => {
            fb.fill_rect(x, y, 16, 16, pal::GROUND);
            fb.fill_rect(x + 4, y + 2, 8, 2, pal::GROUND_DARK);
        }
        TileKind::Brick => {
            fb.fill_rect(x, y, 16, 16, pal::BRICK);
            fb.rect_outline(x, y, 16, 16, pal::BRICK_DARK);
            fb.fill_rect(x + 1, y + 7, 14, 2, pal::BRICK_DARK);
        }
        TileKind::Question => {
            let color = if tile.used { pal::BRICK_DARK } else { pal::QUESTION };
            fb.fill_rect(x, y, 16, 16, color);
            if !tile.used {
                fb.fill_rect(x + 4, y + 4, 8, 2, pal::QUESTION_DARK);
                fb.fill_rect(x + 6, y + 10, 4, 2, pal::QUESTION_DARK);
            }
        }
        TileKind::Hard => {
            fb.fill_rect(x, y, 16, 16, pal::CASTLE_GRAY);
            fb.fill_rect(x + 12, y, 4, 16, pal::CASTLE_DARK);
        }
        TileKind::Pipe => {
            fb.fill_rect(x, y, 16, 16, pal::PIPE);
            fb.fill_rect(x + 2, y, 4, 16, pal::PIPE_LIGHT);
            fb.fill_rect(x + 13, y, 3, 16, pal::PIPE_DARK);
        }
        TileKind::Coin => {
            if !tile.used {
                fb.fill_circle(x + 8, y + 8, 5, pal::COIN);
            }
        }
        TileKind::Flagpole => {
            fb.fill_rect(x + 7, y, 2, 16, pal::PIPE_LIGHT);
            if tile.row == 3 {
                fb.fill_rect(x - 6, y + 2, 13, 9, pal::WHITE);
            }
        }
    }
}

pub fn entity(fb: &mut FrameBuffer, entity: &Entity, camera: i32) {
    let x = px(entity.body.pos.x) - camera;
    let y = px(entity.body.pos.y);

    match &entity.kind {
        EntityKind::Goomba => goomba(fb, x, y, entity.frame),
        EntityKind::Koopa { red, shell, .. } => {
            let color = if *red { pal::KOOPA_RED } else { pal::KOOPA_GREEN };
            if *shell == ShellState::Walking {
                fb.fill_rect(x + 2, y + 8, 12, 14, color);
                fb.fill_rect(x + 4, y, 8, 8, pal::MARIO_TAN);
            } else {
                fb.fill_rect(x + 2, y + 2, 12, 14, color);
                fb.fill_rect(x + 2, y + 12, 12, 2, pal::WHITE);
            }
        }
        EntityKind::HammerBro { timer, .. } => {
            fb.fill_rect(x + 4, y, 8, 4, pal::HAMMER_BRO);
            fb.fill_rect(x + 4, y + 4, 8, 8, pal::MARIO_TAN);
            fb.fill_rect(x + 2, y + 12, 12, 10, pal::HAMMER_BRO);
            if timer % 20 < 10 {
                fb.fill_rect(x + 10, y + 6, 6, 6, pal::BLACK);
            }
        }
        EntityKind::Hammer => {
            // Alternate handle orientation to suggest spin
            if (entity.frame / 4) % 2 == 0 {
                fb.fill_rect(x, y, 8, 4, pal::BLACK);
                fb.fill_rect(x + 3, y + 4, 2, 4, pal::MARIO_BROWN);
            } else {
                fb.fill_rect(x, y, 4, 8, pal::BLACK);
                fb.fill_rect(x + 4, y + 3, 4, 2, pal::MARIO_BROWN);
            }
        }
        EntityKind::Mushroom => {
            fb.fill_rect(x + 1, y, 14, 9, pal::MARIO_RED);
            fb.fill_rect(x + 4, y + 2, 3, 3, pal::WHITE);
            fb.fill_rect(x + 10, y + 2, 3, 3, pal::WHITE);
            fb.fill_rect(x + 4, y + 9, 8, 7, pal::MARIO_TAN);
        }
    }
}

fn goomba(fb: &mut FrameBuffer, x: i32, y: i32, frame: u32) {
    fb.fill_rect(x, y, 16, 12, pal::GOOMBA);
    fb.fill_rect(x + 3, y + 4, 4, 5, pal::WHITE);
    fb.fill_rect(x + 9, y + 4, 4, 5, pal::WHITE);
    fb.fill_rect(x + 5, y + 5, 2, 3, pal::BLACK);
    fb.fill_rect(x + 9, y + 5, 2, 3, pal::BLACK);

    if (frame / 10) % 2 == 0 {
        fb.fill_rect(x, y + 12, 6, 4, pal::BLACK);
        fb.fill_rect(x + 10, y + 12, 6, 4, pal::BLACK);
    } else {
        fb.fill_rect(x + 2, y + 12, 5, 4, pal::BLACK);
        fb.fill_rect(x + 9, y + 12, 5, 4, pal::BLACK);
    }
}

/// Draw the player; skipped on alternate flicker phases while invulnerable
pub fn player(fb: &mut FrameBuffer, player: &Player, camera: i32) {
    if !player.visible() {
        return;
    }
    let x = px(player.body.pos.x) - camera;
    let y = px(player.body.pos.y);
    let facing_right = player.body.facing > 0.0;

    // Mirror horizontally inside the 12px-wide sprite when facing left
    let mut part = |bx: i32, by: i32, bw: i32, bh: i32, color: u32| {
        let rx = if facing_right { x + bx } else { x + (12 - bx - bw) };
        fb.fill_rect(rx, y + by, bw, bh, color);
    };

    let grow = if player.big { 16 } else { 0 };

    part(2, 0, 10, 4, pal::MARIO_RED);
    part(6, 4, 8, 4, pal::MARIO_TAN);
    part(10, 6, 2, 2, pal::BLACK);
    part(3, 8, 8, 8 + grow, pal::MARIO_TAN);

    match (x + camera).div_euclid(10).rem_euclid(3) {
        0 => part(1, 8 + grow, 3, 6, pal::MARIO_TAN),
        1 => part(9, 8 + grow, 3, 6, pal::MARIO_TAN),
        _ => {}
    }

    part(1, 14 + grow, 4, 2, pal::MARIO_BROWN);
    part(8, 14 + grow, 4, 2, pal::MARIO_BROWN);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::TileGrid;

    #[test]
    fn test_tile_draws_at_camera_offset() {
        let mut grid = TileGrid::new(30, 15);
        grid.set(20, 13, TileKind::Ground);
        let mut fb = FrameBuffer::default();
        tile(&mut fb, grid.get(20, 13).unwrap(), 300);
        // 20 * 16 - 300 = 20
        assert_eq!(fb.pixel(20, 208), Some(pal::GROUND));
        assert_eq!(fb.pixel(19, 208), Some(0));
    }

    #[test]
    fn test_bumped_tile_draws_raised() {
        let mut grid = TileGrid::new(4, 15);
        grid.set(1, 9, TileKind::Brick);
        grid.get_mut(1, 9).unwrap().start_bump();
        let mut fb = FrameBuffer::default();
        tile(&mut fb, grid.get(1, 9).unwrap(), 0);
        // Column 1 spans x 16..32; raised 4px from y 144
        assert_eq!(fb.pixel(24, 141), Some(pal::BRICK));
        assert_eq!(fb.pixel(24, 157), Some(0));
    }

    #[test]
    fn test_collected_coin_is_hidden() {
        let mut grid = TileGrid::new(4, 4);
        grid.set(1, 1, TileKind::Coin);
        grid.get_mut(1, 1).unwrap().used = true;
        let mut fb = FrameBuffer::default();
        tile(&mut fb, grid.get(1, 1).unwrap(), 0);
        assert!(fb.pixels().iter().all(|&p| p == 0));
    }

    #[test]
    fn test_player_flickers_while_invulnerable() {
        let mut p = Player::new(40.0, 192.0);
        let mut fb = FrameBuffer::default();
        player(&mut fb, &p, 0);
        assert!(fb.pixels().iter().any(|&px| px == pal::MARIO_RED));

        p.iframe = 5; // 5 % 8 >= 4: hidden phase
        let mut fb = FrameBuffer::default();
        player(&mut fb, &p, 0);
        assert!(fb.pixels().iter().all(|&px| px == 0));
    }

    #[test]
    fn test_koopa_color() {
        let mut fb = FrameBuffer::default();
        entity(&mut fb, &Entity::koopa(16.0, 100.0, true), 0);
        assert_eq!(fb.pixel(20, 115), Some(pal::KOOPA_RED));
    }
}
