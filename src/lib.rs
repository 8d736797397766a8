pub mod config;
pub mod dungeon;
pub mod entity;
pub mod error;
pub mod tables;

pub use config::*;
pub use dungeon::*;
pub use entity::*;
pub use error::*;
pub use tables::*;
