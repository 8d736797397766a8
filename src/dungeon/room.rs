use serde::{Deserialize, Serialize};

use super::Coord;

/// Semantic tag a room carries through decoration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomType {
    Unassigned,
    Start,
    End,
    Plain,
    TreeGrove,
    Fountain,
    CloudCluster,
    PillarSquare,
    LockedChest,
}

impl RoomType {
    /// Decoration archetypes a level draws from, each used at most once except `Plain`.
    pub const POOL: [RoomType; 6] = [
        RoomType::Plain,
        RoomType::TreeGrove,
        RoomType::Fountain,
        RoomType::CloudCluster,
        RoomType::PillarSquare,
        RoomType::LockedChest,
    ];
}

/// Axis-aligned rectangle whose bounds include its wall ring; the carved
/// interior is `(x1, x2) x (y1, y2)` exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Room {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub room_type: RoomType,
}

impl Room {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x1: x,
            y1: y,
            x2: x + width,
            y2: y + height,
            room_type: RoomType::Unassigned,
        }
    }

    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }

    pub fn area(&self) -> i32 {
        self.width() * self.height()
    }

    pub fn center(&self) -> Coord {
        Coord::new((self.x1 + self.x2) / 2, (self.y1 + self.y2) / 2)
    }

    /// Cells inside the wall ring.
    pub fn inner(&self) -> impl Iterator<Item = Coord> {
        let (x1, y1, x2, y2) = (self.x1, self.y1, self.x2, self.y2);
        (y1 + 1..y2).flat_map(move |y| (x1 + 1..x2).map(move |x| Coord::new(x, y)))
    }

    pub fn contains(&self, pos: Coord) -> bool {
        pos.x > self.x1 && pos.x < self.x2 && pos.y > self.y1 && pos.y < self.y2
    }

    /// Touching edges count as intersecting, so neighbors never share a wall.
    pub fn intersects(&self, other: &Room) -> bool {
        self.x1 <= other.x2 && self.x2 >= other.x1 && self.y1 <= other.y2 && self.y2 >= other.y1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_dimensions() {
        let room = Room::new(10, 20, 6, 4);
        assert_eq!(room.width(), 6);
        assert_eq!(room.height(), 4);
        assert_eq!(room.area(), 24);
        assert_eq!(room.center(), Coord::new(13, 22));
        assert_eq!(room.inner().count(), 5 * 3);
    }

    #[test]
    fn test_inner_excludes_wall_ring() {
        let room = Room::new(0, 0, 4, 4);
        assert!(room.inner().all(|pos| room.contains(pos)));
        assert!(!room.contains(Coord::new(0, 2)));
        assert!(!room.contains(Coord::new(4, 2)));
        assert!(room.contains(Coord::new(3, 3)));
    }

    #[test]
    fn test_room_intersects() {
        let a = Room::new(0, 0, 5, 5);
        let touching = Room::new(5, 0, 5, 5);
        let apart = Room::new(6, 6, 3, 3);

        assert!(a.intersects(&touching));
        assert!(touching.intersects(&a));
        assert!(!a.intersects(&apart));
        assert!(!apart.intersects(&a));
    }
}
