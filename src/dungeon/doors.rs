use rand::Rng;
use tracing::debug;

use super::{bitmask8, Coord, Grid, Tile, TileKind};
use super::{EAST, NORTH, ORTHOGONAL, SOUTH, WEST};
use crate::entity::{DoorState, Furniture, Placements, Setup};

/// Wall silhouettes around a floor cell that sits in a passage cut through a
/// one-tile wall.
pub const DOOR_SILHOUETTES: [u8; 4] = [99, 54, 141, 216];

/// Orthogonal door arrangements around a floor cell that mean several doors
/// crowd one crossing. The first five are the three- and four-way crossings.
pub const DOOR_CLUSTERS: [u8; 11] = [
    NORTH | EAST | SOUTH | WEST,
    NORTH | EAST | WEST,
    NORTH | EAST | SOUTH,
    NORTH | SOUTH | WEST,
    EAST | SOUTH | WEST,
    NORTH | EAST,
    NORTH | SOUTH,
    NORTH | WEST,
    EAST | SOUTH,
    EAST | WEST,
    SOUTH | WEST,
];

/// One-tile wall runs: walls only north and south, or only east and west.
pub const THIN_WALLS: [u8; 2] = [NORTH | SOUTH, EAST | WEST];

pub fn door_tile(state: DoorState) -> Tile {
    match state {
        DoorState::Open => Tile::open_door(),
        DoorState::Closed => Tile::closed_door(),
        DoorState::Hidden { .. } => Tile::hidden_door(),
    }
}

/// Puts a door on every free interior floor cell whose wall mask is a doorway
/// silhouette. Returns the number of doors placed.
pub fn place_doors(grid: &mut Grid, entities: &mut Placements, rng: &mut impl Rng) -> usize {
    let mut placed = 0;

    for x in 1..grid.width - 1 {
        for y in 1..grid.height - 1 {
            let pos = Coord::new(x, y);
            if !grid.is_kind(pos, TileKind::Floor) || entities.is_occupied(pos) {
                continue;
            }
            if !DOOR_SILHOUETTES.contains(&bitmask8(grid, pos, TileKind::Wall)) {
                continue;
            }

            let setup = Setup::roll_door(rng);
            let tile = match &setup {
                Setup::Door { state, .. } => door_tile(*state),
                _ => Tile::closed_door(),
            };
            if entities.spawn(Furniture::Door, pos, setup).is_some() {
                grid.set(pos, tile);
                placed += 1;
            }
        }
    }

    debug!(placed, "doors placed");
    placed
}

/// Clears doors crowding tunnel crossings back to floor, repeating until no
/// floor cell has more than one orthogonal door. Returns the number removed.
pub fn remove_doors_at_intersection(grid: &mut Grid, entities: &mut Placements) -> usize {
    let mut removed = 0;

    loop {
        let before = removed;
        for x in 1..grid.width - 1 {
            for y in 1..grid.height - 1 {
                let pos = Coord::new(x, y);
                if !grid.is_kind(pos, TileKind::Floor) {
                    continue;
                }
                let doors = bitmask8(grid, pos, TileKind::Door) & ORTHOGONAL;
                if !DOOR_CLUSTERS.contains(&doors) {
                    continue;
                }

                for neighbor in pos.orthogonal() {
                    if grid.is_kind(neighbor, TileKind::Door) {
                        entities.remove_at(neighbor);
                        grid.set(neighbor, Tile::floor());
                        removed += 1;
                    }
                }
            }
        }
        if removed == before {
            break;
        }
    }

    debug!(removed, "intersection doors removed");
    removed
}

/// Swaps one-tile wall runs for iron bars, one time in ten.
pub fn place_iron_bars(grid: &mut Grid, entities: &mut Placements, rng: &mut impl Rng) -> usize {
    let mut placed = 0;

    for x in 1..grid.width - 1 {
        for y in 1..grid.height - 1 {
            let pos = Coord::new(x, y);
            if !grid.is_kind(pos, TileKind::Wall) {
                continue;
            }
            if !THIN_WALLS.contains(&bitmask8(grid, pos, TileKind::Wall)) || !rng.gen_ratio(1, 10) {
                continue;
            }
            if entities.spawn(Furniture::IronBars, pos, Setup::None).is_some() {
                grid.set(pos, Tile::iron_bars());
                placed += 1;
            }
        }
    }

    debug!(placed, "iron bars placed");
    placed
}
