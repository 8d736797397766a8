use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use super::Level;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportMetadata {
    pub generated_at: chrono::DateTime<chrono::Utc>,
    /// Absent when the level came from an unseeded generator.
    pub seed: Option<u64>,
    pub version: String,
    pub fingerprint: String,
}

/// A level as written to disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelExport {
    pub metadata: ExportMetadata,
    pub level: Level,
}

impl LevelExport {
    pub fn new(level: Level, seed: Option<u64>) -> Self {
        Self {
            metadata: ExportMetadata {
                generated_at: chrono::Utc::now(),
                seed,
                version: env!("CARGO_PKG_VERSION").to_string(),
                fingerprint: level.fingerprint(),
            },
            level,
        }
    }

    /// Pretty JSON through a temporary file that is then renamed into place.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self).with_context(|| "Failed to serialize level export")?;

        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, content)
            .with_context(|| format!("Failed to write level export to {}", temp_path.display()))?;

        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to rename {} to {}", temp_path.display(), path.display()))?;

        Ok(())
    }

    /// Reads an export back and checks the stored fingerprint against the level.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read level export from {}", path.display()))?;

        let export: LevelExport = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse level export {}", path.display()))?;

        let actual = export.level.fingerprint();
        if actual != export.metadata.fingerprint {
            bail!(
                "Level export {} is inconsistent: fingerprint {} does not match recorded {}",
                path.display(),
                actual,
                export.metadata.fingerprint
            );
        }

        Ok(export)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GeneratorConfig;
    use crate::dungeon::LevelGenerator;
    use crate::tables::SpawnTables;

    fn sample_level(seed: u64) -> Level {
        let config = GeneratorConfig::default();
        let tables = SpawnTables::default();
        LevelGenerator::new(&config, &tables).unwrap().generate_seeded(2, seed).unwrap()
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("levels").join("floor2.json");
        let export = LevelExport::new(sample_level(77), Some(77));

        export.save(&path).unwrap();
        assert!(!path.with_extension("tmp").exists());

        let loaded = LevelExport::load(&path).unwrap();
        assert_eq!(loaded.metadata.seed, Some(77));
        assert_eq!(loaded.metadata.version, env!("CARGO_PKG_VERSION"));
        assert_eq!(loaded.level, export.level);
    }

    #[test]
    fn test_tampered_export_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("floor.json");
        let mut export = LevelExport::new(sample_level(5), None);
        export.metadata.fingerprint = "0".repeat(64);
        export.save(&path).unwrap();

        let err = LevelExport::load(&path).unwrap_err();
        assert!(err.to_string().contains("inconsistent"));
    }

    #[test]
    fn test_missing_file_names_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        let err = LevelExport::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("absent.json"));
    }
}
