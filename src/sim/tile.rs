//! Tile grid
//!
//! Tiles live in a dense row-major array; a cell lookup is a single index, so
//! the broad-phase neighbourhood query touches at most 25 cells.

use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::TILE;
use crate::phys::BUMP_HEIGHT;

/// Chebyshev radius (exclusive) of [`TileGrid::tiles_near`]
pub const NEAR_RADIUS: i32 = 3;

/// Tile type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileKind {
    #[default]
    Empty,
    Ground,
    Brick,
    Question,
    Hard,
    Pipe,
    /// Collectible, passed through
    Coin,
    /// Goal pole above the flag block, passed through
    Flagpole,
}

impl TileKind {
    pub fn is_solid(self) -> bool {
        !matches!(self, TileKind::Empty | TileKind::Coin | TileKind::Flagpole)
    }
}

/// What a question block releases when hit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TileContents {
    #[default]
    Coin,
    Mushroom,
}

/// One grid cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub col: i32,
    pub row: i32,
    pub kind: TileKind,
    /// Question block payload (ignored for other kinds)
    pub contents: TileContents,
    /// Question block already hit, or coin already collected
    pub used: bool,
    /// Visual bump offset in pixels, decays to 0
    pub bump: u8,
}

impl Tile {
    fn empty(col: i32, row: i32) -> Self {
        Self {
            col,
            row,
            kind: TileKind::Empty,
            contents: TileContents::Coin,
            used: false,
            bump: 0,
        }
    }

    #[inline]
    pub fn is_solid(&self) -> bool {
        self.kind.is_solid()
    }

    /// World-pixel footprint
    pub fn rect(&self) -> Rect {
        Rect::new(
            (self.col * TILE) as f32,
            (self.row * TILE) as f32,
            TILE as f32,
            TILE as f32,
        )
    }

    /// Start the bump animation
    pub fn start_bump(&mut self) {
        self.bump = BUMP_HEIGHT;
    }
}

/// Cell containing a world-pixel coordinate (floor division)
#[inline]
pub fn cell_of(x: f32, y: f32) -> (i32, i32) {
    (
        (x / TILE as f32).floor() as i32,
        (y / TILE as f32).floor() as i32,
    )
}

/// Fixed-size level grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileGrid {
    cols: i32,
    rows: i32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// All-empty grid
    pub fn new(cols: usize, rows: usize) -> Self {
        let (cols, rows) = (cols as i32, rows as i32);
        let tiles = (0..rows)
            .flat_map(|row| (0..cols).map(move |col| Tile::empty(col, row)))
            .collect();
        Self { cols, rows, tiles }
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Level width in world pixels
    pub fn pixel_width(&self) -> f32 {
        (self.cols * TILE) as f32
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.cols || row >= self.rows {
            return None;
        }
        Some((row * self.cols + col) as usize)
    }

    pub fn get(&self, col: i32, row: i32) -> Option<&Tile> {
        self.index(col, row).map(|i| &self.tiles[i])
    }

    pub fn get_mut(&mut self, col: i32, row: i32) -> Option<&mut Tile> {
        self.index(col, row).map(|i| &mut self.tiles[i])
    }

    /// Tile kind at a cell; out of bounds reads as empty
    pub fn kind(&self, col: i32, row: i32) -> TileKind {
        self.get(col, row).map_or(TileKind::Empty, |t| t.kind)
    }

    /// Overwrite a cell's kind, resetting its per-tile state. Out of bounds is ignored.
    pub fn set(&mut self, col: i32, row: i32, kind: TileKind) {
        if let Some(tile) = self.get_mut(col, row) {
            *tile = Tile { kind, ..Tile::empty(col, row) };
        }
    }

    /// Set a question block's payload
    pub fn set_contents(&mut self, col: i32, row: i32, contents: TileContents) {
        if let Some(tile) = self.get_mut(col, row) {
            tile.contents = contents;
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.iter()
    }

    /// Number of non-empty tiles
    pub fn occupied(&self) -> usize {
        self.tiles.iter().filter(|t| t.kind != TileKind::Empty).count()
    }

    /// Non-empty tiles within Chebyshev distance < 3 of the cell holding `(x, y)`
    ///
    /// Positions outside the grid simply yield fewer (or no) tiles.
    pub fn tiles_near(&self, x: f32, y: f32) -> impl Iterator<Item = &Tile> + '_ {
        let (cc, cr) = cell_of(x, y);
        let span = -(NEAR_RADIUS - 1)..NEAR_RADIUS;
        span.clone()
            .flat_map(move |dr| span.clone().map(move |dc| (cc + dc, cr + dr)))
            .filter_map(move |(col, row)| self.get(col, row))
            .filter(|t| t.kind != TileKind::Empty)
    }

    /// Non-empty tiles in a column range, row-major (for drawing)
    pub fn tiles_in_columns(&self, first: i32, last: i32) -> impl Iterator<Item = &Tile> + '_ {
        let first = first.max(0);
        let last = last.min(self.cols - 1);
        (0..self.rows)
            .flat_map(move |row| (first..=last).map(move |col| (col, row)))
            .filter_map(move |(col, row)| self.get(col, row))
            .filter(|t| t.kind != TileKind::Empty)
    }

    /// Advance every bump animation by one tick
    pub fn decay_bumps(&mut self) {
        for tile in self.tiles.iter_mut().filter(|t| t.bump > 0) {
            tile.bump -= 1;
        }
    }
}
