use thiserror::Error;

use crate::dungeon::Coord;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GenerationError {
    #[error("invalid generator configuration: {0}")]
    InvalidConfig(String),

    #[error("cave carver found at most {best} rooms in {attempts} attempts")]
    RoomQuotaUnmet { attempts: u32, best: usize },

    #[error("rectangular carver placed {found} room(s); a level needs at least 2")]
    TooFewRooms { found: usize },

    #[error("exit {to} cannot be reached from entry {from}")]
    Unreachable { from: Coord, to: Coord },
}

pub type GenerationResult<T> = std::result::Result<T, GenerationError>;
