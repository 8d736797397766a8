use serde::{Deserialize, Serialize};

use crate::dungeon::Rgb;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Monster {
    MinorAnt,
    Ant,
    MinorRat,
    Rat,
    DireRat,
    Sheep,
    Orc,
    Troll,
    SmallZombie,
    Dog,
    Dragon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Item {
    Arrow,
    HealthPotion,
    Money,
    ConfusionScroll,
    VisionScroll,
    LockpickScroll,
    BlindedScroll,
    DumbScroll,
    AmputationScroll,
    LightningScroll,
    FireballScroll,
    Hat,
    Boots,
    Club,
    Spear,
    Sword,
    Axe,
    WoodenBow,
    LeatherArmor,
    ChainMail,
    ScaleArmor,
    SmallWoodenShield,
    LargeWoodenShield,
    TowerShield,
    Lockpick,
    MasterLockpick,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Furniture {
    Door,
    IronBars,
    Tree,
    Fountain,
    Cloud,
    Pillar,
    Chest,
    Trap,
    /// Ends the game when used; replaces the down stairs on the final floor.
    WinButton,
}

/// Template for something the entity factory can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Archetype {
    Monster(Monster),
    Item(Item),
    Furniture(Furniture),
}

/// Lock fitted to doors, chests and traps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lock {
    pub difficulty: u8,
    pub locked: bool,
}

impl Monster {
    pub fn name(&self) -> &'static str {
        match self {
            Monster::MinorAnt => "Minor Ant",
            Monster::Ant => "Ant",
            Monster::MinorRat => "Minor Rat",
            Monster::Rat => "Rat",
            Monster::DireRat => "Dire Rat",
            Monster::Sheep => "Sheep",
            Monster::Orc => "Orc",
            Monster::Troll => "Troll",
            Monster::SmallZombie => "Small Zombie",
            Monster::Dog => "Dog",
            Monster::Dragon => "Dragon",
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Monster::MinorAnt | Monster::Ant => 'a',
            Monster::MinorRat | Monster::Rat | Monster::DireRat => 'r',
            Monster::Sheep => 's',
            Monster::Orc => 'o',
            Monster::Troll => 'T',
            Monster::SmallZombie => 'z',
            Monster::Dog => 'd',
            Monster::Dragon => 'D',
        }
    }
}

impl Item {
    pub fn name(&self) -> &'static str {
        match self {
            Item::Arrow => "Arrow",
            Item::HealthPotion => "Health Potion",
            Item::Money => "Money",
            Item::ConfusionScroll => "Scroll of Confusion",
            Item::VisionScroll => "Scroll of Vision",
            Item::LockpickScroll => "Scroll of Lockpicking",
            Item::BlindedScroll => "Scroll of Blindness",
            Item::DumbScroll => "Scroll of Dumbness",
            Item::AmputationScroll => "Scroll of Amputation",
            Item::LightningScroll => "Scroll of Lightning",
            Item::FireballScroll => "Scroll of Fireball",
            Item::Hat => "Hat",
            Item::Boots => "Boots",
            Item::Club => "Club",
            Item::Spear => "Spear",
            Item::Sword => "Sword",
            Item::Axe => "Axe",
            Item::WoodenBow => "Wooden Bow",
            Item::LeatherArmor => "Leather Armor",
            Item::ChainMail => "Chain Mail",
            Item::ScaleArmor => "Scale Armor",
            Item::SmallWoodenShield => "Small Wooden Shield",
            Item::LargeWoodenShield => "Large Wooden Shield",
            Item::TowerShield => "Tower Shield",
            Item::Lockpick => "Lockpick",
            Item::MasterLockpick => "Master Lockpick",
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Item::Arrow => '|',
            Item::HealthPotion => '!',
            Item::Money => '$',
            Item::ConfusionScroll
            | Item::VisionScroll
            | Item::LockpickScroll
            | Item::BlindedScroll
            | Item::DumbScroll
            | Item::AmputationScroll
            | Item::LightningScroll
            | Item::FireballScroll => '~',
            Item::Hat | Item::Boots => '[',
            Item::Club | Item::Spear | Item::Sword | Item::Axe | Item::WoodenBow => '/',
            Item::LeatherArmor | Item::ChainMail | Item::ScaleArmor => ']',
            Item::SmallWoodenShield | Item::LargeWoodenShield | Item::TowerShield => ')',
            Item::Lockpick | Item::MasterLockpick => '-',
        }
    }

    /// Arrows stack into one inventory slot.
    pub fn stacks(&self) -> bool {
        matches!(self, Item::Arrow)
    }
}

impl Furniture {
    pub fn name(&self) -> &'static str {
        match self {
            Furniture::Door => "Door",
            Furniture::IronBars => "Iron Bars",
            Furniture::Tree => "Tree",
            Furniture::Fountain => "Fountain",
            Furniture::Cloud => "Cloud",
            Furniture::Pillar => "Pillar",
            Furniture::Chest => "Wooden Chest",
            Furniture::Trap => "Trap",
            Furniture::WinButton => "Button",
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Furniture::Door => '+',
            Furniture::IronBars => '#',
            Furniture::Tree => 'P',
            Furniture::Fountain => '{',
            Furniture::Cloud => '#',
            Furniture::Pillar => 'O',
            Furniture::Chest => '(',
            Furniture::Trap => '^',
            Furniture::WinButton => 'o',
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Furniture::Door | Furniture::Chest => [135, 60, 35],
            Furniture::IronBars | Furniture::Fountain | Furniture::Trap => [10, 140, 160],
            Furniture::Tree => [10, 150, 30],
            Furniture::Cloud => [150, 150, 30],
            Furniture::Pillar => [127, 127, 127],
            Furniture::WinButton => [255, 50, 50],
        }
    }
}

impl Archetype {
    pub fn name(&self) -> &'static str {
        match self {
            Archetype::Monster(monster) => monster.name(),
            Archetype::Item(item) => item.name(),
            Archetype::Furniture(furniture) => furniture.name(),
        }
    }

    pub fn glyph(&self) -> char {
        match self {
            Archetype::Monster(monster) => monster.glyph(),
            Archetype::Item(item) => item.glyph(),
            Archetype::Furniture(furniture) => furniture.glyph(),
        }
    }

    pub fn color(&self) -> Rgb {
        match self {
            Archetype::Monster(_) => [255, 255, 255],
            Archetype::Item(_) => [230, 200, 120],
            Archetype::Furniture(furniture) => furniture.color(),
        }
    }

    pub fn blocks_movement(&self) -> bool {
        match self {
            Archetype::Monster(_) => true,
            Archetype::Item(_) => false,
            Archetype::Furniture(furniture) => matches!(
                furniture,
                Furniture::IronBars | Furniture::Tree | Furniture::Fountain | Furniture::Pillar | Furniture::WinButton
            ),
        }
    }

    pub fn blocks_sight(&self) -> bool {
        matches!(
            self,
            Archetype::Furniture(Furniture::Tree | Furniture::Cloud | Furniture::Pillar | Furniture::Door)
        )
    }

    /// Only lockable furniture carries a lock.
    pub fn lock(&self) -> Option<Lock> {
        match self {
            Archetype::Furniture(Furniture::Door | Furniture::Trap) => Some(Lock {
                difficulty: 20,
                locked: true,
            }),
            Archetype::Furniture(Furniture::Chest) => Some(Lock {
                difficulty: 20,
                locked: false,
            }),
            _ => None,
        }
    }

    pub fn is_monster(&self) -> bool {
        matches!(self, Archetype::Monster(_))
    }

    pub fn is_item(&self) -> bool {
        matches!(self, Archetype::Item(_))
    }

    pub fn is_furniture(&self) -> bool {
        matches!(self, Archetype::Furniture(_))
    }
}

impl From<Monster> for Archetype {
    fn from(monster: Monster) -> Self {
        Archetype::Monster(monster)
    }
}

impl From<Item> for Archetype {
    fn from(item: Item) -> Self {
        Archetype::Item(item)
    }
}

impl From<Furniture> for Archetype {
    fn from(furniture: Furniture) -> Self {
        Archetype::Furniture(furniture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lock_capability() {
        assert!(Archetype::from(Furniture::Door).lock().is_some());
        assert!(Archetype::from(Furniture::Chest).lock().is_some());
        assert!(Archetype::from(Furniture::Tree).lock().is_none());
        assert!(Archetype::from(Monster::Dragon).lock().is_none());
    }

    #[test]
    fn test_blocking() {
        assert!(Archetype::from(Monster::Rat).blocks_movement());
        assert!(!Archetype::from(Item::Money).blocks_movement());
        assert!(!Archetype::from(Furniture::Cloud).blocks_movement());
        assert!(Archetype::from(Furniture::Cloud).blocks_sight());
        assert!(!Archetype::from(Furniture::IronBars).blocks_sight());
    }
}
