use serde::{Deserialize, Serialize};

pub type Rgb = [u8; 3];

const WHITE: Rgb = [255, 255, 255];
const FLOOR_DARK: Rgb = [50, 50, 150];
const FLOOR_LIGHT: Rgb = [200, 180, 50];
const WALL_DARK: Rgb = [0, 0, 100];
const WALL_LIGHT: Rgb = [130, 110, 50];

/// Terrain role of a cell. This is the match target for every bitmask rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Wall,
    Floor,
    Door,
    Stairs,
    IronBar,
    Window,
    /// Base under furniture that blocks sight (trees, pillars, clouds).
    Placeholder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Graphic {
    pub ch: char,
    pub fg: Rgb,
    pub bg: Rgb,
}

impl Graphic {
    pub const fn new(ch: char, fg: Rgb, bg: Rgb) -> Self {
        Self { ch, fg, bg }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub walkable: bool,
    pub transparent: bool,
    pub kind: TileKind,
    /// Appearance outside the field of view.
    pub dark: Graphic,
    /// Appearance inside the field of view.
    pub light: Graphic,
}

impl Tile {
    pub const fn floor() -> Self {
        Self {
            walkable: true,
            transparent: true,
            kind: TileKind::Floor,
            dark: Graphic::new(' ', WHITE, FLOOR_DARK),
            light: Graphic::new(' ', WHITE, FLOOR_LIGHT),
        }
    }

    pub const fn wall() -> Self {
        Self {
            walkable: false,
            transparent: false,
            kind: TileKind::Wall,
            dark: Graphic::new(' ', WHITE, WALL_DARK),
            light: Graphic::new(' ', WHITE, WALL_LIGHT),
        }
    }

    pub const fn open_door() -> Self {
        Self {
            walkable: true,
            transparent: true,
            kind: TileKind::Door,
            dark: Graphic::new('.', [10, 90, 100], FLOOR_DARK),
            light: Graphic::new('.', WHITE, FLOOR_LIGHT),
        }
    }

    pub const fn closed_door() -> Self {
        Self {
            walkable: false,
            transparent: false,
            kind: TileKind::Door,
            dark: Graphic::new('+', FLOOR_DARK, WALL_DARK),
            light: Graphic::new('+', WHITE, WALL_LIGHT),
        }
    }

    /// Looks like a wall until someone finds it.
    pub const fn hidden_door() -> Self {
        Self {
            walkable: false,
            transparent: false,
            kind: TileKind::Door,
            dark: Graphic::new(' ', FLOOR_DARK, WALL_DARK),
            light: Graphic::new(' ', WHITE, WALL_LIGHT),
        }
    }

    pub const fn iron_bars() -> Self {
        Self {
            walkable: false,
            transparent: true,
            kind: TileKind::IronBar,
            dark: Graphic::new('#', [10, 90, 100], FLOOR_DARK),
            light: Graphic::new('#', [10, 140, 160], FLOOR_LIGHT),
        }
    }

    pub const fn up_stairs() -> Self {
        Self::stairs('<')
    }

    pub const fn down_stairs() -> Self {
        Self::stairs('>')
    }

    const fn stairs(ch: char) -> Self {
        Self {
            walkable: true,
            transparent: true,
            kind: TileKind::Stairs,
            dark: Graphic::new(ch, WALL_DARK, FLOOR_DARK),
            light: Graphic::new(ch, WHITE, FLOOR_LIGHT),
        }
    }

    /// Opaque base that reads as wall when remembered (trees, pillars).
    pub const fn screen_wall() -> Self {
        Self {
            walkable: true,
            transparent: false,
            kind: TileKind::Placeholder,
            dark: Graphic::new(' ', WHITE, WALL_DARK),
            light: Graphic::new(' ', WHITE, FLOOR_LIGHT),
        }
    }

    /// Opaque base that reads as floor when remembered (clouds).
    pub const fn screen_floor() -> Self {
        Self {
            walkable: true,
            transparent: false,
            kind: TileKind::Placeholder,
            dark: Graphic::new(' ', WHITE, FLOOR_DARK),
            light: Graphic::new(' ', WHITE, FLOOR_LIGHT),
        }
    }

    pub fn is(&self, kind: TileKind) -> bool {
        self.kind == kind
    }

    /// Doors count even when shut: they can be opened, picked or found.
    pub fn is_traversable(&self) -> bool {
        self.walkable || self.kind == TileKind::Door
    }

    /// Shifts the lit background color. Channels saturate at the byte range.
    pub fn tint(&mut self, delta: [i16; 3]) {
        for (channel, d) in self.light.bg.iter_mut().zip(delta) {
            *channel = (*channel as i16 + d).clamp(0, u8::MAX as i16) as u8;
        }
    }
}

impl Default for Tile {
    fn default() -> Self {
        Self::wall()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_door_blocks_but_is_traversable() {
        let door = Tile::closed_door();
        assert!(!door.walkable);
        assert!(door.is_traversable());
        assert!(!Tile::wall().is_traversable());
    }

    #[test]
    fn test_tint_saturates() {
        let mut tile = Tile::floor();
        tile.tint([100, -250, 0]);
        assert_eq!(tile.light.bg, [255, 0, 50]);
        assert_eq!(tile.dark, Tile::floor().dark);
    }

    #[test]
    fn test_iron_bars_see_through() {
        let bars = Tile::iron_bars();
        assert!(bars.transparent);
        assert!(!bars.walkable);
        assert!(bars.is(TileKind::IronBar));
    }
}
