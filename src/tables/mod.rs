//! Floor-indexed spawn tables.
//!
//! Both table shapes are step functions over depth: an entry keyed by floor `n`
//! applies to floor `n` and every deeper floor until a later entry overrides it.

use rand::distributions::WeightedIndex;
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entity::{Furniture, Item, Monster};

/// `(minimum floor, value)` pairs sorted by ascending floor.
pub type CapTable = Vec<(u32, u32)>;

/// Value of the last entry whose minimum floor is `<= floor`, or 0 above the first entry.
pub fn get_max_value_for_floor(table: &[(u32, u32)], floor: u32) -> u32 {
    let mut current = 0;
    for &(minimum, value) in table {
        if minimum > floor {
            break;
        }
        current = value;
    }
    current
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedFloorTable<T> {
    pub entries: BTreeMap<u32, Vec<(T, u32)>>,
}

impl<T: Copy + PartialEq> WeightedFloorTable<T> {
    pub fn new(entries: impl IntoIterator<Item = (u32, Vec<(T, u32)>)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Every archetype unlocked at `floor`. A deeper entry for the same
    /// archetype replaces its weight instead of adding a second slot.
    pub fn pool_for_floor(&self, floor: u32) -> Vec<(T, u32)> {
        let mut pool: Vec<(T, u32)> = Vec::new();
        for (_, choices) in self.entries.range(..=floor) {
            for &(archetype, weight) in choices {
                match pool.iter_mut().find(|(existing, _)| *existing == archetype) {
                    Some(slot) => slot.1 = weight,
                    None => pool.push((archetype, weight)),
                }
            }
        }
        pool
    }

    /// `count` draws with replacement. Empty when nothing is unlocked yet.
    pub fn choose(&self, rng: &mut impl Rng, count: usize, floor: u32) -> Vec<T> {
        let pool = self.pool_for_floor(floor);
        let Ok(weights) = WeightedIndex::new(pool.iter().map(|(_, weight)| *weight)) else {
            return Vec::new();
        };
        (0..count).map(|_| pool[weights.sample(rng)].0).collect()
    }
}

/// Per-room caps and weighted pools used when populating a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTables {
    pub max_items: CapTable,
    pub max_monsters: CapTable,
    pub max_traps: CapTable,
    pub items: WeightedFloorTable<Item>,
    pub monsters: WeightedFloorTable<Monster>,
    pub traps: WeightedFloorTable<Furniture>,
}

impl Default for SpawnTables {
    fn default() -> Self {
        use Item::*;
        use Monster::*;

        Self {
            max_items: vec![(1, 1), (2, 1), (3, 1), (4, 1), (6, 1), (8, 1), (10, 1)],
            max_monsters: vec![(1, 1), (2, 1), (4, 1), (6, 1), (8, 2), (10, 4)],
            max_traps: vec![(1, 1)],
            items: WeightedFloorTable::new([
                (0, vec![(Arrow, 1), (HealthPotion, 1), (ConfusionScroll, 5), (VisionScroll, 1), (Money, 5)]),
                (
                    2,
                    vec![
                        (Arrow, 1),
                        (Hat, 5),
                        (Club, 2),
                        (SmallWoodenShield, 2),
                        (Lockpick, 1),
                        (LeatherArmor, 2),
                        (LockpickScroll, 5),
                        (BlindedScroll, 5),
                    ],
                ),
                (
                    3,
                    vec![
                        (Arrow, 1),
                        (HealthPotion, 1),
                        (DumbScroll, 5),
                        (Hat, 1),
                        (SmallWoodenShield, 1),
                        (WoodenBow, 1),
                        (ChainMail, 1),
                        (Spear, 2),
                    ],
                ),
                (4, vec![(Arrow, 1), (AmputationScroll, 2), (MasterLockpick, 1), (Boots, 1), (LeatherArmor, 1)]),
                (
                    5,
                    vec![
                        (Arrow, 1),
                        (HealthPotion, 1),
                        (LightningScroll, 5),
                        (VisionScroll, 1),
                        (LargeWoodenShield, 2),
                        (Sword, 1),
                        (Hat, 1),
                        (WoodenBow, 1),
                    ],
                ),
                (
                    6,
                    vec![
                        (Arrow, 1),
                        (FireballScroll, 5),
                        (ChainMail, 10),
                        (LightningScroll, 5),
                        (LargeWoodenShield, 2),
                        (Axe, 2),
                    ],
                ),
                (
                    7,
                    vec![
                        (Arrow, 1),
                        (HealthPotion, 1),
                        (ScaleArmor, 5),
                        (AmputationScroll, 5),
                        (Sword, 1),
                        (WoodenBow, 1),
                        (FireballScroll, 5),
                    ],
                ),
                (8, vec![(Arrow, 1), (Boots, 10), (ScaleArmor, 2), (Sword, 5)]),
                (10, vec![(Arrow, 1), (HealthPotion, 1), (Money, 10), (TowerShield, 2)]),
            ]),
            monsters: WeightedFloorTable::new([
                (0, vec![(MinorAnt, 5), (Ant, 5), (MinorRat, 5), (Sheep, 5)]),
                (2, vec![(MinorRat, 5), (Rat, 10), (DireRat, 2)]),
                (4, vec![(Troll, 5), (Orc, 10), (DireRat, 2)]),
                (5, vec![(SmallZombie, 10), (Orc, 10), (Dog, 2)]),
                (7, vec![(SmallZombie, 30), (Dog, 5), (DireRat, 10)]),
                (8, vec![(Dog, 30), (Troll, 5), (Dragon, 2)]),
                (10, vec![(Dragon, 30), (Troll, 10), (SmallZombie, 10)]),
            ]),
            traps: WeightedFloorTable::new([(0, vec![(Furniture::Trap, 1)])]),
        }
    }
}

impl SpawnTables {
    /// The minimum floor at which `item` first appears, if ever.
    pub fn item_unlock_floor(&self, item: Item) -> Option<u32> {
        self.items
            .entries
            .iter()
            .find(|(_, choices)| choices.iter().any(|(candidate, _)| *candidate == item))
            .map(|(floor, _)| *floor)
    }

    pub fn monster_unlock_floor(&self, monster: Monster) -> Option<u32> {
        self.monsters
            .entries
            .iter()
            .find(|(_, choices)| choices.iter().any(|(candidate, _)| *candidate == monster))
            .map(|(floor, _)| *floor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0)]
    #[case(1, 1)]
    #[case(7, 1)]
    #[case(8, 2)]
    #[case(9, 2)]
    #[case(10, 4)]
    #[case(99, 4)]
    fn test_monster_caps(#[case] floor: u32, #[case] expected: u32) {
        let tables = SpawnTables::default();
        assert_eq!(get_max_value_for_floor(&tables.max_monsters, floor), expected);
    }

    #[test]
    fn test_deeper_entry_overrides_weight() {
        let tables = SpawnTables::default();
        let pool = tables.monsters.pool_for_floor(2);
        assert!(pool.contains(&(Monster::MinorRat, 5)));
        assert!(pool.contains(&(Monster::Rat, 10)));
        assert_eq!(pool.iter().filter(|(m, _)| *m == Monster::MinorRat).count(), 1);

        let deep = tables.monsters.pool_for_floor(8);
        assert!(deep.contains(&(Monster::Dog, 30)));
    }

    #[test]
    fn test_floor_zero_draws_only_floor_zero_items() {
        let tables = SpawnTables::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for item in tables.items.choose(&mut rng, 500, 0) {
            assert_eq!(tables.item_unlock_floor(item), Some(0));
        }
    }

    #[test]
    fn test_choose_from_locked_table_is_empty() {
        let table = WeightedFloorTable::new([(3, vec![(Item::Sword, 1)])]);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        assert!(table.choose(&mut rng, 4, 2).is_empty());
        assert_eq!(table.choose(&mut rng, 4, 3), vec![Item::Sword; 4]);
    }

    #[test]
    fn test_tables_round_trip_through_json() {
        let tables = SpawnTables::default();
        let json = serde_json::to_string(&tables).unwrap();
        let parsed: SpawnTables = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, tables);
    }
}
