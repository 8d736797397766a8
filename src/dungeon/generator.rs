use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use super::{
    place_doors, place_iron_bars, remove_doors_at_intersection, stock_chests, CaveCarver, Coord, Decorator, Grid,
    Populator, RectangularCarver, Room,
};
use crate::config::GeneratorConfig;
use crate::entity::Placements;
use crate::error::{GenerationError, GenerationResult};
use crate::tables::SpawnTables;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Layout {
    /// Rooms joined by L-shaped corridors.
    Rectangular,
    /// Drunkard's walk caverns.
    Cave,
}

impl std::fmt::Display for Layout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Layout::Rectangular => write!(f, "rectangular"),
            Layout::Cave => write!(f, "cave"),
        }
    }
}

/// Where the player leaves the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Exit {
    Stairs(Coord),
    /// The win button on the final floor.
    WinTrigger(Coord),
}

impl Exit {
    pub fn position(&self) -> Coord {
        match self {
            Exit::Stairs(pos) | Exit::WinTrigger(pos) => *pos,
        }
    }
}

/// A finished level, ready to hand to the entity factory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub floor: u32,
    pub layout: Layout,
    pub grid: Grid,
    pub rooms: Vec<Room>,
    pub entities: Placements,
    pub entry: Coord,
    pub exit: Exit,
}

impl Level {
    pub fn is_connected(&self) -> bool {
        self.grid.reachable(self.entry, self.exit.position())
    }

    /// Hex SHA-256 over the terrain kinds and every placement. Cosmetic color
    /// variation is left out.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.floor.to_le_bytes());
        hasher.update(self.grid.width.to_le_bytes());
        hasher.update(self.grid.height.to_le_bytes());
        for tile in self.grid.tiles.iter().flatten() {
            hasher.update([tile.kind as u8]);
        }
        for placement in &self.entities {
            hasher.update(placement.id.0.to_le_bytes());
            hasher.update(placement.archetype.name().as_bytes());
            hasher.update(placement.pos.x.to_le_bytes());
            hasher.update(placement.pos.y.to_le_bytes());
            hasher.update(format!("{:?}", placement.setup).as_bytes());
        }
        hex::encode(hasher.finalize())
    }
}

pub struct LevelGenerator<'a> {
    config: &'a GeneratorConfig,
    tables: &'a SpawnTables,
}

impl<'a> LevelGenerator<'a> {
    /// Rejects a configuration that could not produce a level.
    pub fn new(config: &'a GeneratorConfig, tables: &'a SpawnTables) -> GenerationResult<Self> {
        config.validate()?;
        Ok(Self { config, tables })
    }

    /// Same seed, same level.
    pub fn generate_seeded(&self, floor: u32, seed: u64) -> GenerationResult<Level> {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.generate(floor, &mut rng)
    }

    /// Caves with probability `cave_chance`, rooms and corridors otherwise.
    pub fn generate(&self, floor: u32, rng: &mut impl Rng) -> GenerationResult<Level> {
        let layout = if rng.gen_bool(self.config.cave_chance) {
            Layout::Cave
        } else {
            Layout::Rectangular
        };
        self.generate_layout(layout, floor, rng)
    }

    pub fn generate_layout(&self, layout: Layout, floor: u32, rng: &mut impl Rng) -> GenerationResult<Level> {
        match layout {
            Layout::Rectangular => self.generate_rectangular(floor, rng),
            Layout::Cave => self.generate_cave(floor, rng),
        }
    }

    pub fn generate_rectangular(&self, floor: u32, rng: &mut impl Rng) -> GenerationResult<Level> {
        let mut grid = Grid::new(self.config.map_width, self.config.map_height);
        let rooms = RectangularCarver::new(&self.config.rectangular).carve(&mut grid, rng);
        if rooms.len() < 2 {
            return Err(GenerationError::TooFewRooms { found: rooms.len() });
        }

        let level = self.furnish(Layout::Rectangular, grid, rooms, floor, rng)?;
        if !level.is_connected() {
            return Err(GenerationError::Unreachable {
                from: level.entry,
                to: level.exit.position(),
            });
        }

        self.log_finished(&level);
        Ok(level)
    }

    /// Keeps digging into the same grid until enough rooms turn up, up to
    /// `max_cave_attempts` rounds. A level whose exit cannot be reached is
    /// dropped and digging starts over on a fresh grid.
    pub fn generate_cave(&self, floor: u32, rng: &mut impl Rng) -> GenerationResult<Level> {
        let carver = CaveCarver::new(&self.config.cave);
        let (width, height) = (self.config.map_width, self.config.map_height);
        let mut grid = Grid::new(width, height);
        let mut best = 0;

        for attempt in 1..=self.config.max_cave_attempts {
            let rooms = carver.carve(&mut grid, rng);
            best = best.max(rooms.len());

            if rooms.len() < self.config.min_cave_rooms {
                debug!(attempt, rooms = rooms.len(), "cave short of rooms, digging further");
                continue;
            }

            let dug = std::mem::replace(&mut grid, Grid::new(width, height));
            let level = self.furnish(Layout::Cave, dug, rooms, floor, rng)?;
            if level.is_connected() {
                self.log_finished(&level);
                return Ok(level);
            }
            warn!(attempt, entry = %level.entry, exit = %level.exit.position(), "cave exit unreachable, starting over");
        }

        Err(GenerationError::RoomQuotaUnmet {
            attempts: self.config.max_cave_attempts,
            best,
        })
    }

    /// Everything after carving, shared by both layouts.
    fn furnish(
        &self,
        layout: Layout,
        mut grid: Grid,
        mut rooms: Vec<Room>,
        floor: u32,
        rng: &mut impl Rng,
    ) -> GenerationResult<Level> {
        let mut entities = Placements::new();

        let (entry, exit) = Decorator::new(self.config).decorate(&mut grid, &mut rooms, &mut entities, floor, rng)?;

        let populator = Populator::new(self.tables, self.config.max_placement_attempts);
        let mut spawned = 0;
        for room in &rooms {
            spawned += populator.place_entities(&grid, room, &mut entities, floor, rng);
        }
        debug!(spawned, "rooms populated");
        stock_chests(&mut entities, rng);

        place_doors(&mut grid, &mut entities, rng);
        remove_doors_at_intersection(&mut grid, &mut entities);
        place_iron_bars(&mut grid, &mut entities, rng);
        grid.jitter_colors(rng);

        Ok(Level {
            floor,
            layout,
            grid,
            rooms,
            entities,
            entry,
            exit,
        })
    }

    fn log_finished(&self, level: &Level) {
        info!(
            floor = level.floor,
            layout = %level.layout,
            rooms = level.rooms.len(),
            entities = level.entities.len(),
            "level generated"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{RoomType, TileKind};

    #[test]
    fn test_seeded_levels_repeat() {
        let config = GeneratorConfig::default();
        let tables = SpawnTables::default();
        let generator = LevelGenerator::new(&config, &tables).unwrap();

        let first = generator.generate_seeded(3, 99).unwrap();
        let second = generator.generate_seeded(3, 99).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.fingerprint(), second.fingerprint());
        assert_eq!(first.fingerprint().len(), 64);
    }

    #[test]
    fn test_rectangular_level_shape() {
        let config = GeneratorConfig::default();
        let tables = SpawnTables::default();
        let generator = LevelGenerator::new(&config, &tables).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(7);

        let level = generator.generate_rectangular(2, &mut rng).unwrap();
        assert_eq!(level.layout, Layout::Rectangular);
        assert_eq!(level.rooms.first().map(|r| r.room_type), Some(RoomType::Start));
        assert_eq!(level.rooms.last().map(|r| r.room_type), Some(RoomType::End));
        assert_eq!(level.entry, level.rooms[0].center());
        assert!(matches!(level.exit, Exit::Stairs(_)));
        assert!(level.grid.is_kind(level.entry, TileKind::Stairs));
        assert!(level.is_connected());
    }

    #[test]
    fn test_cave_level_meets_room_quota() {
        let config = GeneratorConfig::default();
        let tables = SpawnTables::default();
        let generator = LevelGenerator::new(&config, &tables).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(13);

        let level = generator.generate_cave(config.final_floor, &mut rng).unwrap();
        assert_eq!(level.layout, Layout::Cave);
        assert!(level.rooms.len() >= config.min_cave_rooms);
        assert!(matches!(level.exit, Exit::WinTrigger(_)));
        assert!(level.is_connected());
    }

    #[test]
    fn test_cave_quota_ceiling() {
        let mut config = GeneratorConfig::default();
        config.min_cave_rooms = 500;
        config.max_cave_attempts = 3;
        let tables = SpawnTables::default();
        let generator = LevelGenerator::new(&config, &tables).unwrap();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        match generator.generate_cave(1, &mut rng) {
            Err(GenerationError::RoomQuotaUnmet { attempts, best }) => {
                assert_eq!(attempts, 3);
                assert!(best < 500);
            }
            other => panic!("expected RoomQuotaUnmet, got {:?}", other.map(|level| level.rooms.len())),
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = GeneratorConfig::default();
        config.map_width = 4;
        let tables = SpawnTables::default();
        assert!(matches!(
            LevelGenerator::new(&config, &tables),
            Err(GenerationError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_exit_position() {
        let pos = Coord::new(4, 9);
        assert_eq!(Exit::Stairs(pos).position(), pos);
        assert_eq!(Exit::WinTrigger(pos).position(), pos);
    }
}
