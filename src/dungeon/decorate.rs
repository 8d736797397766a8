use rand::seq::SliceRandom;
use rand::Rng;
use tracing::debug;

use super::{Coord, Exit, Grid, Room, RoomType, Tile, TileKind};
use crate::config::GeneratorConfig;
use crate::entity::{Furniture, Placements, Setup};
use crate::error::{GenerationError, GenerationResult};

/// Tags rooms and lays out their fixed furniture patterns.
pub struct Decorator<'a> {
    config: &'a GeneratorConfig,
}

impl<'a> Decorator<'a> {
    pub fn new(config: &'a GeneratorConfig) -> Self {
        Self { config }
    }

    /// First room becomes the start, last room the end, and every room in
    /// between takes the next type from a shuffled pool. Returns the entry
    /// point and the exit.
    pub fn decorate(
        &self,
        grid: &mut Grid,
        rooms: &mut [Room],
        entities: &mut Placements,
        floor: u32,
        rng: &mut impl Rng,
    ) -> GenerationResult<(Coord, Exit)> {
        if rooms.len() < 2 {
            return Err(GenerationError::TooFewRooms { found: rooms.len() });
        }

        let mut pool = RoomType::POOL.to_vec();
        pool.shuffle(rng);

        let last = rooms.len() - 1;
        let mut entry = rooms[0].center();
        let mut exit = Exit::Stairs(rooms[last].center());

        for (index, room) in rooms.iter_mut().enumerate() {
            room.room_type = if index == 0 {
                RoomType::Start
            } else if index == last {
                RoomType::End
            } else {
                pool.pop().unwrap_or(RoomType::Plain)
            };

            match room.room_type {
                RoomType::Start => entry = self.place_entry(grid, room),
                RoomType::End => exit = self.place_exit(grid, room, entities, floor),
                RoomType::TreeGrove => self.plant_trees(grid, room, entities, rng),
                RoomType::Fountain => self.place_fountain(grid, room, entities, rng),
                RoomType::CloudCluster => self.place_clouds(grid, room, entities, rng),
                RoomType::PillarSquare => self.place_pillars(grid, room, entities),
                RoomType::LockedChest => {
                    entities.spawn(Furniture::Chest, room.center(), Setup::empty_chest());
                }
                RoomType::Plain | RoomType::Unassigned => {}
            }
        }

        debug!(rooms = rooms.len(), floor, "rooms decorated");
        Ok((entry, exit))
    }

    fn place_entry(&self, grid: &mut Grid, room: &Room) -> Coord {
        let center = room.center();
        grid.set(center, Tile::up_stairs());
        center
    }

    fn place_exit(&self, grid: &mut Grid, room: &Room, entities: &mut Placements, floor: u32) -> Exit {
        let center = room.center();
        if floor == self.config.final_floor {
            entities.spawn(Furniture::WinButton, center, Setup::None);
            Exit::WinTrigger(center)
        } else {
            grid.set(center, Tile::down_stairs());
            Exit::Stairs(center)
        }
    }

    fn plant_trees(&self, grid: &mut Grid, room: &Room, entities: &mut Placements, rng: &mut impl Rng) {
        for _ in 0..room.area() / 10 {
            let Some(pos) = inset_cell(room, rng) else {
                return;
            };
            place_on(grid, entities, pos, Furniture::Tree, Tile::screen_wall());
        }
    }

    fn place_fountain(&self, grid: &mut Grid, room: &Room, entities: &mut Placements, rng: &mut impl Rng) {
        for _ in 0..self.config.max_placement_attempts {
            let Some(pos) = inset_cell(room, rng) else {
                return;
            };
            if is_free_floor(grid, entities, pos) {
                entities.spawn(Furniture::Fountain, pos, Setup::None);
                return;
            }
        }
    }

    fn place_clouds(&self, grid: &mut Grid, room: &Room, entities: &mut Placements, rng: &mut impl Rng) {
        let Some(middle) = inset_cell(room, rng) else {
            return;
        };
        for dx in -1..=1 {
            for dy in -1..=1 {
                place_on(grid, entities, middle.offset(dx, dy), Furniture::Cloud, Tile::screen_floor());
            }
        }
    }

    fn place_pillars(&self, grid: &mut Grid, room: &Room, entities: &mut Placements) {
        let center = room.center();
        for (dx, dy) in [(-1, -1), (1, -1), (-1, 1), (1, 1)] {
            place_on(grid, entities, center.offset(dx, dy), Furniture::Pillar, Tile::screen_wall());
        }
    }
}

fn is_free_floor(grid: &Grid, entities: &Placements, pos: Coord) -> bool {
    grid.is_kind(pos, TileKind::Floor) && !entities.is_occupied(pos)
}

fn place_on(grid: &mut Grid, entities: &mut Placements, pos: Coord, furniture: Furniture, base: Tile) {
    if is_free_floor(grid, entities, pos) && entities.spawn(furniture, pos, Setup::None).is_some() {
        grid.set(pos, base);
    }
}

/// Random cell at least two cells in from the room bounds, if the room has one.
fn inset_cell(room: &Room, rng: &mut impl Rng) -> Option<Coord> {
    let (x1, x2) = (room.x1 + 2, room.x2 - 2);
    let (y1, y2) = (room.y1 + 2, room.y2 - 2);
    if x1 > x2 || y1 > y2 {
        return None;
    }
    Some(Coord::new(rng.gen_range(x1..=x2), rng.gen_range(y1..=y2)))
}
