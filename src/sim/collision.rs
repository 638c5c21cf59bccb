//! Rectangle collision against the tile grid
//!
//! Resolution is axis-separated: the caller moves a body along one axis, then
//! asks this module to push it back out of any solid tile it entered. Only
//! tiles that lie ahead of the body's pre-move edge are considered, so a body
//! that is already embedded (e.g. just grew under a ceiling) is never
//! teleported through the tile it overlaps.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::tile::TileGrid;

/// Slack when comparing a tile edge against the body's pre-move edge
const EDGE_EPSILON: f32 = 0.01;

/// Axis-aligned rectangle in world pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    /// Strict overlap: rectangles that only share an edge do not collide
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// Kinematic state shared by the player and every entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left of the sprite (sub-pixel)
    pub pos: Vec2,
    pub vel: Vec2,
    /// Collision footprint size
    pub w: f32,
    pub h: f32,
    /// Horizontal offset of the footprint from `pos.x`
    pub inset: f32,
    /// +1 facing right, -1 facing left
    pub facing: f32,
    pub on_ground: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            w,
            h,
            inset: 0.0,
            facing: -1.0,
            on_ground: false,
        }
    }

    /// Collision footprint
    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::new(self.pos.x + self.inset, self.pos.y, self.w, self.h)
    }

    /// Add `gravity`, bounding downward speed at `max_fall`
    #[inline]
    pub fn apply_gravity(&mut self, gravity: f32, max_fall: f32) {
        self.vel.y = (self.vel.y + gravity).min(max_fall);
    }
}

/// Which side of the body touched a tile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// Body moved right into a tile's left face
    Right,
    /// Body moved left into a tile's right face
    Left,
    /// Body landed on a tile's top face
    Floor,
    /// Body hit a tile's bottom face with its head
    Ceiling,
}

/// A resolved tile contact
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileHit {
    pub contact: Contact,
    pub col: i32,
    pub row: i32,
}

/// Push `body` out of solid tiles it entered moving horizontally
///
/// Snaps the footprint flush against the nearest tile face and returns that
/// tile. Velocity is left to the caller: the player stops, enemies turn.
pub fn resolve_horizontal(body: &mut Body, grid: &TileGrid) -> Option<TileHit> {
    let vx = body.vel.x;
    if vx == 0.0 {
        return None;
    }

    let rect = body.rect();
    let mut best: Option<(f32, i32, i32)> = None;

    for tile in grid.tiles_near(body.pos.x, body.pos.y) {
        if !tile.is_solid() {
            continue;
        }
        let t = tile.rect();
        if !rect.overlaps(&t) {
            continue;
        }
        if vx > 0.0 {
            // Only faces at or ahead of where the right edge started
            if t.left() < rect.right() - vx - EDGE_EPSILON {
                continue;
            }
            if best.is_none_or(|(edge, _, _)| t.left() < edge) {
                best = Some((t.left(), tile.col, tile.row));
            }
        } else {
            if t.right() > rect.left() - vx + EDGE_EPSILON {
                continue;
            }
            if best.is_none_or(|(edge, _, _)| t.right() > edge) {
                best = Some((t.right(), tile.col, tile.row));
            }
        }
    }

    let (edge, col, row) = best?;
    let contact = if vx > 0.0 {
        body.pos.x = edge - body.w - body.inset;
        Contact::Right
    } else {
        body.pos.x = edge - body.inset;
        Contact::Left
    };
    Some(TileHit { contact, col, row })
}

/// Push `body` out of solid tiles it entered moving vertically
///
/// Landing sets `on_ground`; both landing and head-bumps zero vertical
/// velocity. For a head-bump the returned tile is the one most centred over
/// the body, which is the tile that reacts to the hit.
pub fn resolve_vertical(body: &mut Body, grid: &TileGrid) -> Option<TileHit> {
    let vy = body.vel.y;
    if vy == 0.0 {
        return None;
    }

    let rect = body.rect();
    // (edge, distance from body centre, col, row)
    let mut best: Option<(f32, f32, i32, i32)> = None;

    for tile in grid.tiles_near(body.pos.x, body.pos.y) {
        if !tile.is_solid() {
            continue;
        }
        let t = tile.rect();
        if !rect.overlaps(&t) {
            continue;
        }
        let dist = (t.center_x() - rect.center_x()).abs();
        if vy > 0.0 {
            if t.top() < rect.bottom() - vy - EDGE_EPSILON {
                continue;
            }
            let better = best.is_none_or(|(edge, d, _, _)| {
                t.top() < edge || (t.top() == edge && dist < d)
            });
            if better {
                best = Some((t.top(), dist, tile.col, tile.row));
            }
        } else {
            if t.bottom() > rect.top() - vy + EDGE_EPSILON {
                continue;
            }
            let better = best.is_none_or(|(edge, d, _, _)| {
                t.bottom() > edge || (t.bottom() == edge && dist < d)
            });
            if better {
                best = Some((t.bottom(), dist, tile.col, tile.row));
            }
        }
    }

    let (edge, _, col, row) = best?;
    let contact = if vy > 0.0 {
        body.pos.y = edge - body.h;
        body.on_ground = true;
        Contact::Floor
    } else {
        body.pos.y = edge;
        Contact::Ceiling
    };
    body.vel.y = 0.0;
    Some(TileHit { contact, col, row })
}
