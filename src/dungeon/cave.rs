use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::{bitmask24, bitmask8, covers, Coord, Grid, Room, Tile, TileKind};
use super::{ALL_EIGHT, SQUARE_3X3, SQUARE_5X5, STRIP_3X5, STRIP_5X3};
use crate::config::CaveConfig;

/// Compass headings in rotation order; neighbors in this list are 45 degrees apart.
pub const HEADINGS: [(i32, i32); 8] = [(-1, 0), (-1, 1), (0, 1), (1, 1), (1, 0), (1, -1), (0, -1), (-1, -1)];

/// Rotates a heading 45 degrees left or right, never straight on or back.
pub fn random_turn(heading: (i32, i32), rng: &mut impl Rng) -> (i32, i32) {
    let index = HEADINGS.iter().position(|h| *h == heading).unwrap_or(0);
    let offset = if rng.gen_bool(0.5) { 1 } else { HEADINGS.len() - 1 };
    HEADINGS[(index + offset) % HEADINGS.len()]
}

/// Drunkard's walk carver.
pub struct CaveCarver<'a> {
    config: &'a CaveConfig,
}

impl<'a> CaveCarver<'a> {
    pub fn new(config: &'a CaveConfig) -> Self {
        Self { config }
    }

    /// Digs, prunes pillars and returns the rooms found in the open space.
    pub fn carve(&self, grid: &mut Grid, rng: &mut impl Rng) -> Vec<Room> {
        let dug = self.dig(grid, rng);
        let pruned = remove_single_walls(grid);
        let rooms = discover_rooms(grid);
        debug!(dug, pruned, rooms = rooms.len(), "cave carve finished");
        rooms
    }

    /// Carves open floor with random walks and returns the number of open cells
    /// afterwards. Walks start from cells already open, so digging again into
    /// the same grid widens the cave. The map center is always open.
    pub fn dig(&self, grid: &mut Grid, rng: &mut impl Rng) -> usize {
        let center = grid.center();
        let mut open = grid.positions_of(TileKind::Floor);
        if !grid.is_kind(center, TileKind::Floor) {
            grid.set(center, Tile::floor());
            open.insert(0, center);
        }

        let drunks = self.config.drunks.roll(rng);
        for _ in 0..drunks {
            let mut heading = *HEADINGS.choose(rng).unwrap_or(&HEADINGS[0]);
            let mut pos = *open.choose(rng).unwrap_or(&center);

            let turns = self.config.walks.roll(rng);
            for _ in 0..turns {
                let steps = self.config.steps.roll(rng);
                heading = random_turn(heading, rng);

                for _ in 0..steps {
                    let next = pos.offset(heading.0, heading.1);
                    if !is_carvable(grid, next) {
                        break;
                    }
                    if !grid.is_kind(next, TileKind::Floor) {
                        grid.set(next, Tile::floor());
                        open.push(next);
                    }
                    pos = next;
                }
            }
        }

        open.len()
    }
}

/// Inside the one-cell wall border.
fn is_carvable(grid: &Grid, pos: Coord) -> bool {
    pos.x >= 1 && pos.x <= grid.width - 2 && pos.y >= 1 && pos.y <= grid.height - 2
}

/// Opens every interior wall cell whose eight neighbors are all floor.
pub fn remove_single_walls(grid: &mut Grid) -> usize {
    let mut removed = 0;
    for x in 1..grid.width - 1 {
        for y in 1..grid.height - 1 {
            let pos = Coord::new(x, y);
            if grid.is_kind(pos, TileKind::Wall) && bitmask8(grid, pos, TileKind::Floor) == ALL_EIGHT {
                grid.set(pos, Tile::floor());
                removed += 1;
            }
        }
    }
    removed
}

/// Room rectangle for an open silhouette centered on `pos`. Bounds include a
/// virtual wall ring so the interior lines up with the open cells.
fn room_for_window(pos: Coord, mask: u32) -> Option<Room> {
    let (x, y) = (pos.x, pos.y);
    if mask == SQUARE_5X5 {
        Some(Room::new(x - 3, y - 3, 6, 6))
    } else if covers(mask, STRIP_3X5) {
        Some(Room::new(x - 2, y - 3, 4, 6))
    } else if covers(mask, STRIP_5X3) {
        Some(Room::new(x - 3, y - 2, 6, 4))
    } else if covers(mask, SQUARE_3X3) {
        Some(Room::new(x - 2, y - 2, 4, 4))
    } else {
        None
    }
}

/// Scans the interior for open 5x5, 3x5, 5x3 and 3x3 windows and keeps each one
/// that does not touch a room already found.
pub fn discover_rooms(grid: &Grid) -> Vec<Room> {
    let mut rooms: Vec<Room> = Vec::new();

    for x in 2..grid.width - 2 {
        for y in 2..grid.height - 2 {
            let pos = Coord::new(x, y);
            if !grid.is_kind(pos, TileKind::Floor) {
                continue;
            }

            let mask = bitmask24(grid, pos, TileKind::Floor);
            if let Some(room) = room_for_window(pos, mask) {
                if !rooms.iter().any(|other| room.intersects(other)) {
                    rooms.push(room);
                }
            }
        }
    }

    rooms
}
