use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{Archetype, Item, Lock};
use crate::dungeon::Coord;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DoorState {
    Open,
    Closed,
    /// Needs a search roll of `difficulty` before it shows up.
    Hidden { difficulty: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageType {
    None,
    Water,
    Fire,
    Explosion,
    Piercing,
    Slashing,
    Bludgeoning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrapKind {
    Water,
    Fire,
    LandMine,
    Dart,
    Arrow,
    Bolt,
    Bear,
    FallingRock,
    Web,
    Hole,
    Spike,
}

impl TrapKind {
    pub const ALL: [TrapKind; 11] = [
        TrapKind::Water,
        TrapKind::Fire,
        TrapKind::LandMine,
        TrapKind::Dart,
        TrapKind::Arrow,
        TrapKind::Bolt,
        TrapKind::Bear,
        TrapKind::FallingRock,
        TrapKind::Web,
        TrapKind::Hole,
        TrapKind::Spike,
    ];

    /// Damage type and dice expression dealt when sprung.
    pub fn damage(&self) -> (DamageType, &'static str) {
        match self {
            TrapKind::Water => (DamageType::Water, "1d6+2"),
            TrapKind::Fire => (DamageType::Fire, "2d6+3"),
            TrapKind::LandMine => (DamageType::Explosion, "3d8+4"),
            TrapKind::Dart => (DamageType::Piercing, "2d2"),
            TrapKind::Arrow => (DamageType::Piercing, "2d4"),
            TrapKind::Bolt => (DamageType::Piercing, "2d6"),
            TrapKind::Spike => (DamageType::Piercing, "3d6"),
            TrapKind::Bear => (DamageType::Slashing, "3d6"),
            TrapKind::FallingRock => (DamageType::Bludgeoning, "2d8"),
            TrapKind::Web | TrapKind::Hole => (DamageType::None, "0"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChestSlot {
    pub item: Item,
    pub count: u32,
}

/// Spawn-time state for archetypes that need more than a position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Setup {
    None,
    Door { state: DoorState, lock: Lock },
    Trap { kind: TrapKind, lock: Lock },
    Chest { lock: Lock, contents: Vec<ChestSlot> },
}

impl Setup {
    /// Open, closed or hidden with equal odds. Shut doors are locked one time in six.
    pub fn roll_door(rng: &mut impl Rng) -> Self {
        let locked = rng.gen_range(0..6) == 5;
        let (state, locked) = match rng.gen_range(0..3) {
            0 => (DoorState::Open, false),
            1 => (DoorState::Closed, locked),
            _ => (
                DoorState::Hidden {
                    difficulty: rng.gen_range(15..=20),
                },
                locked,
            ),
        };
        Setup::Door {
            state,
            lock: Lock { difficulty: 20, locked },
        }
    }

    pub fn roll_trap(rng: &mut impl Rng) -> Self {
        let kind = TrapKind::ALL.choose(rng).copied().unwrap_or(TrapKind::Dart);
        Setup::Trap {
            kind,
            lock: Lock {
                difficulty: 20,
                locked: true,
            },
        }
    }

    pub fn empty_chest() -> Self {
        Setup::Chest {
            lock: Lock {
                difficulty: 20,
                locked: false,
            },
            contents: Vec::new(),
        }
    }
}

/// Instruction to build `archetype` at `pos`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub id: EntityId,
    pub archetype: Archetype,
    pub pos: Coord,
    pub setup: Setup,
}

impl Placement {
    pub fn door_state(&self) -> Option<DoorState> {
        match &self.setup {
            Setup::Door { state, .. } => Some(*state),
            _ => None,
        }
    }

    pub fn glyph(&self) -> char {
        match self.door_state() {
            Some(DoorState::Open) => '.',
            Some(DoorState::Hidden { .. }) => ' ',
            _ => self.archetype.glyph(),
        }
    }
}

/// Everything spawned on one level, in spawn order. At most one placement per cell.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placements {
    entries: Vec<Placement>,
    next_id: u32,
}

impl Placements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuses occupied cells.
    pub fn spawn(&mut self, archetype: impl Into<Archetype>, pos: Coord, setup: Setup) -> Option<EntityId> {
        if self.is_occupied(pos) {
            return None;
        }

        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entries.push(Placement {
            id,
            archetype: archetype.into(),
            pos,
            setup,
        });
        Some(id)
    }

    pub fn is_occupied(&self, pos: Coord) -> bool {
        self.entries.iter().any(|entry| entry.pos == pos)
    }

    pub fn at(&self, pos: Coord) -> Option<&Placement> {
        self.entries.iter().find(|entry| entry.pos == pos)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Placement> {
        self.entries.iter_mut().find(|entry| entry.id == id)
    }

    pub fn remove_at(&mut self, pos: Coord) -> Option<Placement> {
        let index = self.entries.iter().position(|entry| entry.pos == pos)?;
        Some(self.entries.remove(index))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Placement> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn monsters(&self) -> impl Iterator<Item = &Placement> {
        self.entries.iter().filter(|entry| entry.archetype.is_monster())
    }

    pub fn items(&self) -> impl Iterator<Item = &Placement> {
        self.entries.iter().filter(|entry| entry.archetype.is_item())
    }

    pub fn furniture(&self) -> impl Iterator<Item = &Placement> {
        self.entries.iter().filter(|entry| entry.archetype.is_furniture())
    }

    pub fn count_of(&self, archetype: impl Into<Archetype>) -> usize {
        let archetype = archetype.into();
        self.entries.iter().filter(|entry| entry.archetype == archetype).count()
    }

    pub fn blocks_movement_at(&self, pos: Coord) -> bool {
        self.at(pos).map_or(false, |entry| entry.archetype.blocks_movement())
    }
}

impl<'a> IntoIterator for &'a Placements {
    type Item = &'a Placement;
    type IntoIter = std::slice::Iter<'a, Placement>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Furniture, Monster};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_spawn_refuses_occupied_cell() {
        let mut placements = Placements::new();
        let pos = Coord::new(3, 4);
        assert!(placements.spawn(Monster::Rat, pos, Setup::None).is_some());
        assert!(placements.spawn(Item::Money, pos, Setup::None).is_none());
        assert_eq!(placements.len(), 1);
    }

    #[test]
    fn test_remove_frees_cell() {
        let mut placements = Placements::new();
        let pos = Coord::new(1, 1);
        let first = placements.spawn(Furniture::Door, pos, Setup::None);
        let removed = placements.remove_at(pos);
        assert_eq!(removed.map(|p| p.id), first);
        assert!(!placements.is_occupied(pos));

        let second = placements.spawn(Furniture::Door, pos, Setup::None);
        assert_ne!(first, second);
    }

    #[test]
    fn test_door_rolls_follow_rules() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut seen_hidden = false;
        for _ in 0..200 {
            match Setup::roll_door(&mut rng) {
                Setup::Door { state: DoorState::Open, lock } => assert!(!lock.locked),
                Setup::Door {
                    state: DoorState::Hidden { difficulty },
                    ..
                } => {
                    assert!((15..=20).contains(&difficulty));
                    seen_hidden = true;
                }
                Setup::Door { .. } => {}
                other => panic!("unexpected setup {:?}", other),
            }
        }
        assert!(seen_hidden);
    }
}
