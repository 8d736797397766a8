use crossterm::style::{Color, Stylize};
use std::collections::HashMap;

use super::{Coord, Exit, Level, Rgb, Tile, TileKind};
use crate::entity::{DoorState, Placement};

/// Turns a finished level into terminal lines, one per grid row.
pub struct LevelRenderer {
    /// Draw with the lit palette instead of the remembered one.
    pub lit: bool,
}

impl Default for LevelRenderer {
    fn default() -> Self {
        Self { lit: true }
    }
}

impl LevelRenderer {
    pub fn new(lit: bool) -> Self {
        Self { lit }
    }

    /// Plain ASCII, entities drawn over terrain.
    pub fn render_lines(&self, level: &Level) -> Vec<String> {
        let occupants = index_placements(level);
        (0..level.grid.height)
            .map(|y| {
                (0..level.grid.width)
                    .map(|x| {
                        let pos = Coord::new(x, y);
                        self.cell(level, &occupants, pos).0
                    })
                    .collect()
            })
            .collect()
    }

    /// Same layout as `render_lines` with the tile palette applied as ANSI colors.
    pub fn render_colored(&self, level: &Level) -> Vec<String> {
        let occupants = index_placements(level);
        (0..level.grid.height)
            .map(|y| {
                let mut line = String::new();
                for x in 0..level.grid.width {
                    let (ch, fg, bg) = self.cell(level, &occupants, Coord::new(x, y));
                    line.push_str(&ch.with(to_color(fg)).on(to_color(bg)).to_string());
                }
                line
            })
            .collect()
    }

    fn cell(&self, level: &Level, occupants: &HashMap<Coord, &Placement>, pos: Coord) -> (char, Rgb, Rgb) {
        let tile = level.grid.get(pos).copied().unwrap_or_default();
        let graphic = if self.lit { tile.light } else { tile.dark };

        match occupants.get(&pos) {
            Some(placement) if placement.door_state().is_none() => {
                (placement.archetype.glyph(), placement.archetype.color(), graphic.bg)
            }
            Some(placement) => (door_glyph(placement.door_state()), graphic.fg, graphic.bg),
            None => (terrain_glyph(&tile), graphic.fg, graphic.bg),
        }
    }
}

fn index_placements(level: &Level) -> HashMap<Coord, &Placement> {
    level.entities.iter().map(|placement| (placement.pos, placement)).collect()
}

fn door_glyph(state: Option<DoorState>) -> char {
    match state {
        Some(DoorState::Open) => '\'',
        Some(DoorState::Hidden { .. }) => '#',
        _ => '+',
    }
}

/// Background-only tiles get a stand-in character so the map reads without color.
fn terrain_glyph(tile: &Tile) -> char {
    if tile.light.ch != ' ' {
        return tile.light.ch;
    }
    match tile.kind {
        TileKind::Wall => '#',
        TileKind::Floor | TileKind::Placeholder => '.',
        TileKind::Door => '+',
        TileKind::Stairs => '>',
        TileKind::IronBar => '=',
        TileKind::Window => '"',
    }
}

fn to_color([r, g, b]: Rgb) -> Color {
    Color::Rgb { r, g, b }
}

/// Short human-readable report printed under the map.
pub fn level_summary(level: &Level) -> Vec<String> {
    vec![
        format!("floor {} ({} layout), {} rooms", level.floor, level.layout, level.rooms.len()),
        format!(
            "{} monsters, {} items, {} furniture",
            level.entities.monsters().count(),
            level.entities.items().count(),
            level.entities.furniture().count()
        ),
        format!("entry {} -> exit {}", level.entry, describe_exit(level)),
        format!("fingerprint {}", level.fingerprint()),
    ]
}

fn describe_exit(level: &Level) -> String {
    match level.exit {
        Exit::Stairs(pos) => format!("{} (stairs)", pos),
        Exit::WinTrigger(pos) => format!("{} (win trigger)", pos),
    }
}
