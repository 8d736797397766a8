use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use super::{Coord, Tile, TileKind};

/// Dense `width x height` tile array for one level, stored row-major as `tiles[y][x]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    pub tiles: Vec<Vec<Tile>>,
}

impl Grid {
    /// A solid block of wall.
    pub fn new(width: i32, height: i32) -> Self {
        Self::filled(width, height, Tile::wall())
    }

    pub fn filled(width: i32, height: i32, tile: Tile) -> Self {
        Self {
            width,
            height,
            tiles: vec![vec![tile; width.max(0) as usize]; height.max(0) as usize],
        }
    }

    pub fn in_bounds(&self, pos: Coord) -> bool {
        pos.x >= 0 && pos.x < self.width && pos.y >= 0 && pos.y < self.height
    }

    pub fn get(&self, pos: Coord) -> Option<&Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.tiles.get(pos.y as usize)?.get(pos.x as usize)
    }

    pub fn get_mut(&mut self, pos: Coord) -> Option<&mut Tile> {
        if !self.in_bounds(pos) {
            return None;
        }
        self.tiles.get_mut(pos.y as usize)?.get_mut(pos.x as usize)
    }

    /// Writes a tile; positions off the grid are ignored.
    pub fn set(&mut self, pos: Coord, tile: Tile) {
        if let Some(slot) = self.get_mut(pos) {
            *slot = tile;
        }
    }

    pub fn kind_at(&self, pos: Coord) -> Option<TileKind> {
        self.get(pos).map(|tile| tile.kind)
    }

    pub fn is_kind(&self, pos: Coord, kind: TileKind) -> bool {
        self.kind_at(pos) == Some(kind)
    }

    pub fn center(&self) -> Coord {
        Coord::new(self.width / 2, self.height / 2)
    }

    /// Every cell at least `margin` cells away from each edge, column by column.
    pub fn cells_within(&self, margin: i32) -> impl Iterator<Item = Coord> + '_ {
        let (width, height) = (self.width, self.height);
        (margin..width - margin).flat_map(move |x| (margin..height - margin).map(move |y| Coord::new(x, y)))
    }

    pub fn positions_of(&self, kind: TileKind) -> Vec<Coord> {
        self.cells_within(0).filter(|pos| self.is_kind(*pos, kind)).collect()
    }

    pub fn count(&self, kind: TileKind) -> usize {
        self.tiles.iter().flatten().filter(|tile| tile.kind == kind).count()
    }

    /// Flood fill over traversable cells with 8-way movement.
    pub fn reachable(&self, from: Coord, to: Coord) -> bool {
        let passable = |pos: Coord| self.get(pos).map_or(false, Tile::is_traversable);
        if !passable(from) || !passable(to) {
            return false;
        }

        let mut seen = vec![vec![false; self.width as usize]; self.height as usize];
        let mut queue = VecDeque::from([from]);
        seen[from.y as usize][from.x as usize] = true;

        while let Some(pos) = queue.pop_front() {
            if pos == to {
                return true;
            }
            for next in pos.neighbors() {
                if passable(next) && !seen[next.y as usize][next.x as usize] {
                    seen[next.y as usize][next.x as usize] = true;
                    queue.push_back(next);
                }
            }
        }

        false
    }

    /// Slight per-cell color variation on interior walls (+-5) and floors (+-3).
    pub fn jitter_colors(&mut self, rng: &mut impl Rng) {
        for y in 1..self.height - 1 {
            for x in 1..self.width - 1 {
                let tile = &mut self.tiles[y as usize][x as usize];
                let spread = match tile.kind {
                    TileKind::Wall => 5,
                    TileKind::Floor => 3,
                    _ => continue,
                };
                let delta = [
                    rng.gen_range(-spread..=spread),
                    rng.gen_range(-spread..=spread),
                    rng.gen_range(-spread..=spread),
                ];
                tile.tint(delta);
            }
        }
    }
}
