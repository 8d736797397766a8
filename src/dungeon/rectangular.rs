use rand::Rng;
use tracing::debug;

use super::{Coord, Grid, Room, Tile};
use crate::config::RectangularConfig;

pub struct RectangularCarver<'a> {
    config: &'a RectangularConfig,
}

impl<'a> RectangularCarver<'a> {
    pub fn new(config: &'a RectangularConfig) -> Self {
        Self { config }
    }

    /// One sampling attempt per `max_rooms`; overlapping candidates are skipped.
    /// Rooms come back in acceptance order, each joined to the one before it.
    pub fn carve(&self, grid: &mut Grid, rng: &mut impl Rng) -> Vec<Room> {
        let mut rooms: Vec<Room> = Vec::new();

        for _ in 0..self.config.max_rooms {
            let room_width = rng.gen_range(self.config.room_min_size..=self.config.room_max_size);
            let room_height = rng.gen_range(self.config.room_min_size..=self.config.room_max_size);

            // Keep at least one wall cell between the room and the map edge
            let x = rng.gen_range(0..=grid.width - room_width - 1);
            let y = rng.gen_range(0..=grid.height - room_height - 1);

            let new_room = Room::new(x, y, room_width, room_height);
            if rooms.iter().any(|other| new_room.intersects(other)) {
                continue;
            }

            for pos in new_room.inner() {
                grid.set(pos, Tile::floor());
            }

            if let Some(previous) = rooms.last() {
                for pos in tunnel_between(previous.center(), new_room.center(), rng) {
                    grid.set(pos, Tile::floor());
                }
            }

            rooms.push(new_room);
        }

        debug!(
            accepted = rooms.len(),
            attempts = self.config.max_rooms,
            "rectangular carve finished"
        );
        rooms
    }
}

/// L-shaped tunnel, horizontal-first or vertical-first with equal odds.
pub fn tunnel_between(start: Coord, end: Coord, rng: &mut impl Rng) -> Vec<Coord> {
    let corner = if rng.gen_bool(0.5) {
        Coord::new(end.x, start.y)
    } else {
        Coord::new(start.x, end.y)
    };

    let mut path = bresenham(start, corner);
    path.extend(bresenham(corner, end));
    path
}

/// Every cell on the rasterized line from `start` to `end`, both ends included.
pub fn bresenham(start: Coord, end: Coord) -> Vec<Coord> {
    let dx = (end.x - start.x).abs();
    let dy = -(end.y - start.y).abs();
    let step_x = if start.x < end.x { 1 } else { -1 };
    let step_y = if start.y < end.y { 1 } else { -1 };

    let mut points = Vec::with_capacity((dx.max(-dy) + 1) as usize);
    let mut current = start;
    let mut error = dx + dy;

    loop {
        points.push(current);
        if current == end {
            break;
        }
        let doubled = 2 * error;
        if doubled >= dy {
            error += dy;
            current.x += step_x;
        }
        if doubled <= dx {
            error += dx;
            current.y += step_y;
        }
    }

    points
}
