use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

use super::{Coord, Grid, Room, TileKind};
use crate::entity::{Archetype, ChestSlot, Furniture, Item, Placements, Setup};
use crate::tables::{get_max_value_for_floor, SpawnTables};

/// Scatters monsters, items and traps over room floors.
pub struct Populator<'a> {
    tables: &'a SpawnTables,
    max_attempts: u32,
}

impl<'a> Populator<'a> {
    pub fn new(tables: &'a SpawnTables, max_attempts: u32) -> Self {
        Self { tables, max_attempts }
    }

    /// Rolls how many of each class the room gets, draws them from the floor's
    /// weighted pools and drops each on a free floor cell. Returns the number spawned.
    pub fn place_entities(
        &self,
        grid: &Grid,
        room: &Room,
        entities: &mut Placements,
        floor: u32,
        rng: &mut impl Rng,
    ) -> usize {
        let monster_count = rng.gen_range(0..=get_max_value_for_floor(&self.tables.max_monsters, floor));
        let item_count = rng.gen_range(0..=get_max_value_for_floor(&self.tables.max_items, floor));
        let trap_count = rng.gen_range(0..=get_max_value_for_floor(&self.tables.max_traps, floor));

        let monsters = self.tables.monsters.choose(rng, monster_count as usize, floor);
        let items = self.tables.items.choose(rng, item_count as usize, floor);
        let traps = self.tables.traps.choose(rng, trap_count as usize, floor);

        let mut spawned = 0;
        for monster in monsters {
            spawned += self.drop_in(grid, room, entities, monster.into(), Setup::None, rng);
        }
        for item in items {
            spawned += self.drop_in(grid, room, entities, item.into(), Setup::None, rng);
        }
        for trap in traps {
            let setup = match trap {
                Furniture::Trap => Setup::roll_trap(rng),
                _ => Setup::None,
            };
            spawned += self.drop_in(grid, room, entities, trap.into(), setup, rng);
        }

        spawned
    }

    fn drop_in(
        &self,
        grid: &Grid,
        room: &Room,
        entities: &mut Placements,
        archetype: Archetype,
        setup: Setup,
        rng: &mut impl Rng,
    ) -> usize {
        match self.free_cell(grid, room, entities, rng) {
            Some(pos) => entities.spawn(archetype, pos, setup).map_or(0, |_| 1),
            None => {
                warn!(
                    archetype = archetype.name(),
                    attempts = self.max_attempts,
                    "no free floor cell in room, skipping"
                );
                0
            }
        }
    }

    /// Samples interior cells until one is unoccupied floor, up to the attempt ceiling.
    pub fn free_cell(&self, grid: &Grid, room: &Room, entities: &Placements, rng: &mut impl Rng) -> Option<Coord> {
        if room.x2 - room.x1 < 2 || room.y2 - room.y1 < 2 {
            return None;
        }
        for _ in 0..self.max_attempts {
            let pos = Coord::new(
                rng.gen_range(room.x1 + 1..=room.x2 - 1),
                rng.gen_range(room.y1 + 1..=room.y2 - 1),
            );
            if grid.is_kind(pos, TileKind::Floor) && !entities.is_occupied(pos) {
                return Some(pos);
            }
        }
        None
    }
}

/// Fills every chest with one to five items copied from those lying around
/// the level. Money stands in when the level has none. Arrows share a slot.
pub fn stock_chests(entities: &mut Placements, rng: &mut impl Rng) {
    let loose: Vec<Item> = entities
        .items()
        .filter_map(|placement| match placement.archetype {
            Archetype::Item(item) => Some(item),
            _ => None,
        })
        .collect();
    let chests: Vec<_> = entities
        .furniture()
        .filter(|placement| placement.archetype == Furniture::Chest.into())
        .map(|placement| placement.id)
        .collect();

    for id in chests {
        let mut stock: Vec<ChestSlot> = Vec::new();
        for _ in 0..rng.gen_range(1..=5) {
            let item = loose.choose(rng).copied().unwrap_or(Item::Money);
            match stock.iter_mut().find(|slot| slot.item == item && item.stacks()) {
                Some(slot) => slot.count += 1,
                None => stock.push(ChestSlot { item, count: 1 }),
            }
        }

        if let Some(Setup::Chest { contents, .. }) = entities.get_mut(id).map(|chest| &mut chest.setup) {
            *contents = stock;
        }
    }

    debug!(loose = loose.len(), "chests stocked");
}
