//! Neighbor-pattern masks.
//!
//! ```text
//! 3x3 ring             5x5 outer ring
//! +---+---+---+        +--------+-------+-------+-------+--------+
//! | 1 | 2 | 4 |        |  0x100 | 0x200 | 0x400 | 0x800 | 0x1000 |
//! +---+---+---+        +--------+-------+-------+-------+--------+
//! |128|   | 8 |        |0x800000|   1   |   2   |   4   | 0x2000 |
//! +---+---+---+        +--------+-------+-------+-------+--------+
//! | 64| 32| 16|        |0x400000|  128  |       |   8   | 0x4000 |
//! +---+---+---+        +--------+-------+-------+-------+--------+
//!                      |0x200000|  64   |  32   |  16   | 0x8000 |
//!                      +--------+-------+-------+-------+--------+
//!                      |0x100000|0x80000|0x40000|0x20000|0x10000 |
//!                      +--------+-------+-------+-------+--------+
//! ```

use super::{Coord, Grid, TileKind};

pub const NORTH_WEST: u8 = 0x01;
pub const NORTH: u8 = 0x02;
pub const NORTH_EAST: u8 = 0x04;
pub const EAST: u8 = 0x08;
pub const SOUTH_EAST: u8 = 0x10;
pub const SOUTH: u8 = 0x20;
pub const SOUTH_WEST: u8 = 0x40;
pub const WEST: u8 = 0x80;

pub const ORTHOGONAL: u8 = NORTH | EAST | SOUTH | WEST;
pub const ALL_EIGHT: u8 = 0xFF;

/// Offsets for the inner ring, in bit order.
const RING_3X3: [(i32, i32); 8] = [(-1, -1), (0, -1), (1, -1), (1, 0), (1, 1), (0, 1), (-1, 1), (-1, 0)];

/// Offsets for the outer ring, in bit order starting at 0x100.
const RING_5X5: [(i32, i32); 16] = [
    (-2, -2),
    (-1, -2),
    (0, -2),
    (1, -2),
    (2, -2),
    (2, -1),
    (2, 0),
    (2, 1),
    (2, 2),
    (1, 2),
    (0, 2),
    (-1, 2),
    (-2, 2),
    (-2, 1),
    (-2, 0),
    (-2, -1),
];

/// Full 5x5 window.
pub const SQUARE_5X5: u32 = 0xFF_FFFF;
/// Three wide, five tall.
pub const STRIP_3X5: u32 = 0x0E_0EFF;
/// Five wide, three tall.
pub const STRIP_5X3: u32 = 0xE0_E0FF;
/// Inner ring only.
pub const SQUARE_3X3: u32 = 0x00_00FF;

/// Bit `i` set when the i-th neighbor of `pos` is of `kind`. Off-grid cells never match.
pub fn bitmask8(grid: &Grid, pos: Coord, kind: TileKind) -> u8 {
    RING_3X3
        .iter()
        .enumerate()
        .filter(|(_, (dx, dy))| grid.is_kind(pos.offset(*dx, *dy), kind))
        .fold(0, |mask, (bit, _)| mask | (1 << bit))
}

/// 24-bit mask over the 5x5 window centered on `pos`; the low byte equals [`bitmask8`].
pub fn bitmask24(grid: &Grid, pos: Coord, kind: TileKind) -> u32 {
    let outer = RING_5X5
        .iter()
        .enumerate()
        .filter(|(_, (dx, dy))| grid.is_kind(pos.offset(*dx, *dy), kind))
        .fold(0u32, |mask, (bit, _)| mask | (0x100 << bit));

    outer | bitmask8(grid, pos, kind) as u32
}

/// True when every bit of `pattern` is present in `mask`.
pub fn covers(mask: u32, pattern: u32) -> bool {
    mask & pattern == pattern
}
