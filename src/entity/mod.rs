pub mod archetype;
pub mod placement;

pub use archetype::*;
pub use placement::*;
