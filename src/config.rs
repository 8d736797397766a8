use anyhow::{Context, Result};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{GenerationError, GenerationResult};

/// Smallest grid that still leaves room for a 5x5 discovery window plus walls.
pub const MIN_MAP_SIDE: i32 = 10;

/// Inclusive `min..=max` range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: u32,
    pub max: u32,
}

impl Bounds {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    pub fn roll(&self, rng: &mut impl Rng) -> u32 {
        rng.gen_range(self.min..=self.max)
    }

    fn check(&self, name: &str) -> GenerationResult<()> {
        if self.min > self.max {
            return Err(GenerationError::InvalidConfig(format!(
                "{} minimum {} exceeds maximum {}",
                name, self.min, self.max
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RectangularConfig {
    pub max_rooms: u32,
    pub room_min_size: i32,
    pub room_max_size: i32,
}

impl Default for RectangularConfig {
    fn default() -> Self {
        Self {
            max_rooms: 30,
            room_min_size: 6,
            room_max_size: 10,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaveConfig {
    /// Walks started from fresh points.
    pub drunks: Bounds,
    /// Turns taken on each walk.
    pub walks: Bounds,
    /// Straight steps after each turn.
    pub steps: Bounds,
}

impl Default for CaveConfig {
    fn default() -> Self {
        Self {
            drunks: Bounds::new(10, 30),
            walks: Bounds::new(15, 25),
            steps: Bounds::new(2, 4),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub map_width: i32,
    pub map_height: i32,
    pub rectangular: RectangularConfig,
    pub cave: CaveConfig,
    /// Chance that a new floor is a cave rather than rooms and corridors.
    pub cave_chance: f64,
    /// Floor whose last room holds the win trigger instead of stairs.
    pub final_floor: u32,
    pub min_cave_rooms: usize,
    pub max_cave_attempts: u32,
    pub max_placement_attempts: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            map_width: 80,
            map_height: 45,
            rectangular: RectangularConfig::default(),
            cave: CaveConfig::default(),
            cave_chance: 0.25,
            final_floor: 10,
            min_cave_rooms: 4,
            max_cave_attempts: 64,
            max_placement_attempts: 100,
        }
    }
}

impl GeneratorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read generator config from {}", path.display()))?;

        let config: GeneratorConfig = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse generator config {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Rejected generator config {}", path.display()))?;

        Ok(config)
    }

    pub fn validate(&self) -> GenerationResult<()> {
        let invalid = |message: String| Err(GenerationError::InvalidConfig(message));

        if self.map_width < MIN_MAP_SIDE || self.map_height < MIN_MAP_SIDE {
            return invalid(format!(
                "map {}x{} is smaller than {}x{}",
                self.map_width, self.map_height, MIN_MAP_SIDE, MIN_MAP_SIDE
            ));
        }

        let rect = &self.rectangular;
        if rect.max_rooms < 2 {
            return invalid(format!("max_rooms {} cannot yield an entry and an exit", rect.max_rooms));
        }
        if rect.room_min_size < 3 {
            return invalid(format!("room_min_size {} leaves no interior", rect.room_min_size));
        }
        if rect.room_min_size > rect.room_max_size {
            return invalid(format!(
                "room_min_size {} exceeds room_max_size {}",
                rect.room_min_size, rect.room_max_size
            ));
        }
        // Rooms are sampled with at least one wall cell to the map edge.
        if rect.room_max_size + 1 > self.map_width || rect.room_max_size + 1 > self.map_height {
            return invalid(format!(
                "room_max_size {} does not fit a {}x{} map",
                rect.room_max_size, self.map_width, self.map_height
            ));
        }

        self.cave.drunks.check("drunks")?;
        self.cave.walks.check("walks")?;
        self.cave.steps.check("steps")?;

        if self.min_cave_rooms < 2 {
            return invalid(format!(
                "min_cave_rooms {} cannot yield an entry and an exit",
                self.min_cave_rooms
            ));
        }
        if !(0.0..=1.0).contains(&self.cave_chance) {
            return invalid(format!("cave_chance {} is not a probability", self.cave_chance));
        }
        if self.max_cave_attempts == 0 || self.max_placement_attempts == 0 {
            return invalid("attempt ceilings must be positive".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(GeneratorConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_rejects_inverted_bounds() {
        let mut config = GeneratorConfig::default();
        config.cave.steps = Bounds::new(5, 2);
        assert!(matches!(config.validate(), Err(GenerationError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_rooms_larger_than_map() {
        let mut config = GeneratorConfig::default();
        config.map_height = 12;
        config.rectangular.room_max_size = 12;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_single_room_budget() {
        let mut config = GeneratorConfig::default();
        config.rectangular.max_rooms = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GeneratorConfig =
            serde_json::from_str(r#"{ "map_width": 40, "cave": { "steps": { "min": 3, "max": 3 } } }"#).unwrap();
        assert_eq!(config.map_width, 40);
        assert_eq!(config.map_height, 45);
        assert_eq!(config.cave.steps, Bounds::new(3, 3));
        assert_eq!(config.cave.drunks, Bounds::new(10, 30));
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = GeneratorConfig::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("broken.json"));
    }
}
