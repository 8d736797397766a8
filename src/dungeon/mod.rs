use serde::{Deserialize, Serialize};

pub mod bitmask;
pub mod cave;
pub mod decorate;
pub mod display;
pub mod doors;
pub mod generator;
pub mod grid;
pub mod persistence;
pub mod populate;
pub mod rectangular;
pub mod room;
pub mod tile;

pub use bitmask::*;
pub use cave::*;
pub use decorate::*;
pub use display::*;
pub use doors::*;
pub use generator::*;
pub use grid::*;
pub use persistence::*;
pub use populate::*;
pub use rectangular::*;
pub use room::*;
pub use tile::*;

/// A cell position on a level grid. `x` grows east, `y` grows south.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// The eight surrounding cells, clockwise from north-west.
    pub fn neighbors(&self) -> [Coord; 8] {
        [
            self.offset(-1, -1),
            self.offset(0, -1),
            self.offset(1, -1),
            self.offset(1, 0),
            self.offset(1, 1),
            self.offset(0, 1),
            self.offset(-1, 1),
            self.offset(-1, 0),
        ]
    }

    /// North, east, south, west.
    pub fn orthogonal(&self) -> [Coord; 4] {
        [
            self.offset(0, -1),
            self.offset(1, 0),
            self.offset(0, 1),
            self.offset(-1, 0),
        ]
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
