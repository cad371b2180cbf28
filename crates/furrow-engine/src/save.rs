//! Save/Load farm state.
//!
//! A save file is the `FRSV` magic followed by a bincode-encoded
//! [`SaveGame`]: the grid snapshot, day counter, money, energy and the last
//! weather seen. Saves can also be exported as pretty JSON for inspection.

use crate::economy::{Energy, FarmContext, Wallet};
use furrow_common::{MagicBytes, SchemaVersion};
use furrow_sim::{CropCatalog, Farm, GridSnapshot, PlotGrid, SnapshotError, WeatherSample};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use thiserror::Error;
use tracing::info;

/// Extension of save files.
const SAVE_EXTENSION: &str = "sav";

/// Errors that can occur during save/load operations.
#[derive(Debug, Error)]
pub enum SaveError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid magic bytes
    #[error("Invalid save file format")]
    InvalidFormat,

    /// Version mismatch
    #[error("Incompatible save version: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected version
        expected: SchemaVersion,
        /// Found version
        found: SchemaVersion,
    },

    /// Save file not found
    #[error("Save not found: {0}")]
    NotFound(String),

    /// Save file corrupted
    #[error("Save file corrupted: {0}")]
    Corrupted(String),

    /// Grid contents could not be restored
    #[error("Invalid farm grid: {0}")]
    Grid(#[from] SnapshotError),
}

/// Result type for save operations.
pub type SaveResult<T> = Result<T, SaveError>;

/// Complete farm save data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveGame {
    /// Save format version
    pub version: SchemaVersion,
    /// Save name
    pub name: String,
    /// Save timestamp (Unix seconds)
    pub timestamp: u64,
    /// Days advanced so far
    pub day: u32,
    /// Money
    pub money: u64,
    /// Energy
    pub energy: Energy,
    /// Weather of the most recent day, if any day has run
    pub last_weather: Option<WeatherSample>,
    /// Plot contents
    pub grid: GridSnapshot,
}

impl SaveGame {
    /// Capture the current farm and player resources.
    #[must_use]
    pub fn capture(
        name: impl Into<String>,
        farm: &Farm,
        ctx: &FarmContext,
        last_weather: Option<WeatherSample>,
    ) -> Self {
        Self {
            version: SchemaVersion::SAVE_GAME,
            name: name.into(),
            timestamp: current_timestamp(),
            day: farm.day(),
            money: ctx.wallet.balance(),
            energy: ctx.energy,
            last_weather,
            grid: farm.grid().snapshot(),
        }
    }

    /// Rebuild the farm and player resources, resolving species in `catalog`.
    pub fn restore(&self, catalog: CropCatalog) -> SaveResult<(Farm, FarmContext)> {
        let grid = PlotGrid::from_snapshot(&self.grid, &catalog)?;
        let farm = Farm::from_parts(grid, catalog, self.day);
        let ctx = FarmContext {
            wallet: Wallet::new(self.money),
            energy: Energy::with_current(self.energy.current(), self.energy.max()),
        };
        Ok((farm, ctx))
    }

    /// Serializes to binary format.
    pub fn to_bytes(&self) -> SaveResult<Vec<u8>> {
        let mut buffer = Vec::new();

        // Write magic bytes
        buffer.extend_from_slice(MagicBytes::SAVE.as_bytes());

        // Serialize data
        let data = bincode::serialize(self).map_err(|e| SaveError::Serialization(e.to_string()))?;

        buffer.extend(data);

        Ok(buffer)
    }

    /// Deserializes from binary format.
    pub fn from_bytes(bytes: &[u8]) -> SaveResult<Self> {
        // Check magic bytes
        if !MagicBytes::SAVE.matches(bytes) {
            return Err(SaveError::InvalidFormat);
        }

        // Deserialize data
        let save: SaveGame =
            bincode::deserialize(&bytes[4..]).map_err(|e| SaveError::Corrupted(e.to_string()))?;

        // Check version
        if !SchemaVersion::SAVE_GAME.can_read(&save.version) {
            return Err(SaveError::VersionMismatch {
                expected: SchemaVersion::SAVE_GAME,
                found: save.version,
            });
        }

        Ok(save)
    }

    /// Pretty JSON rendering for inspection.
    pub fn to_json(&self) -> SaveResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| SaveError::Serialization(e.to_string()))
    }
}

/// Save metadata for listing saves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveMetadata {
    /// Save file name
    pub name: String,
    /// Save timestamp
    pub timestamp: u64,
    /// Days advanced
    pub day: u32,
    /// Money
    pub money: u64,
    /// Occupied plots
    pub crops: usize,
    /// Save file size in bytes
    pub file_size: u64,
}

impl SaveMetadata {
    /// Creates metadata from a save game.
    #[must_use]
    pub fn from_save(save: &SaveGame, file_size: u64) -> Self {
        Self {
            name: save.name.clone(),
            timestamp: save.timestamp,
            day: save.day,
            money: save.money,
            crops: save.grid.plots.len(),
            file_size,
        }
    }
}

/// Save manager for handling save files.
#[derive(Debug)]
pub struct SaveManager {
    /// Directory for save files
    save_dir: PathBuf,
}

impl SaveManager {
    /// Creates a new save manager with the given save directory.
    #[must_use]
    pub fn new(save_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
        }
    }

    /// Gets the save directory path.
    #[must_use]
    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Ensures the save directory exists.
    pub fn ensure_dir(&self) -> SaveResult<()> {
        fs::create_dir_all(&self.save_dir)?;
        Ok(())
    }

    /// Gets the path for a save file.
    fn save_path(&self, name: &str) -> PathBuf {
        self.save_dir.join(format!("{name}.{SAVE_EXTENSION}"))
    }

    /// Gets the path for a temporary save file.
    fn temp_path(&self, name: &str) -> PathBuf {
        self.save_dir.join(format!("{name}.{SAVE_EXTENSION}.tmp"))
    }

    /// Saves a farm to disk.
    ///
    /// Writes to a temp file first, then renames it over the old save.
    pub fn save(&self, name: &str, data: &SaveGame) -> SaveResult<()> {
        self.ensure_dir()?;

        let bytes = data.to_bytes()?;
        let temp_path = self.temp_path(name);
        let final_path = self.save_path(name);

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &final_path)?;

        info!(
            "Saved '{name}' (day {}, {} bytes) to {}",
            data.day,
            bytes.len(),
            final_path.display()
        );
        Ok(())
    }

    /// Loads a farm save from disk.
    pub fn load(&self, name: &str) -> SaveResult<SaveGame> {
        let path = self.save_path(name);

        if !path.exists() {
            return Err(SaveError::NotFound(name.to_string()));
        }

        let mut file = fs::File::open(&path)?;
        let mut bytes = Vec::new();
        file.read_to_end(&mut bytes)?;

        SaveGame::from_bytes(&bytes)
    }

    /// Lists all readable saves, newest first.
    pub fn list_saves(&self) -> SaveResult<Vec<SaveMetadata>> {
        self.ensure_dir()?;

        let mut saves = Vec::new();

        for entry in fs::read_dir(&self.save_dir)? {
            let entry = entry?;
            let path = entry.path();

            if path.extension().is_some_and(|ext| ext == SAVE_EXTENSION) {
                let Some(name) = path.file_stem().and_then(|s| s.to_str()) else {
                    continue;
                };
                if let Ok(save) = self.load(name) {
                    let file_size = entry.metadata().map(|m| m.len()).unwrap_or(0);
                    saves.push(SaveMetadata::from_save(&save, file_size));
                }
            }
        }

        saves.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        Ok(saves)
    }

    /// Deletes a save file.
    pub fn delete(&self, name: &str) -> SaveResult<()> {
        let path = self.save_path(name);

        if !path.exists() {
            return Err(SaveError::NotFound(name.to_string()));
        }

        fs::remove_file(&path)?;

        Ok(())
    }

    /// Checks if a save exists.
    #[must_use]
    pub fn exists(&self, name: &str) -> bool {
        self.save_path(name).exists()
    }

    /// Writes a save as pretty JSON to `path`.
    pub fn export_json(&self, name: &str, path: impl AsRef<Path>) -> SaveResult<()> {
        let json = self.load(name)?.to_json()?;
        fs::write(path.as_ref(), json)?;
        info!("Exported '{name}' to {}", path.as_ref().display());
        Ok(())
    }
}

/// Returns current Unix timestamp.
fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use furrow_common::PlotCoord;
    use tempfile::TempDir;

    fn sample_farm() -> (Farm, FarmContext) {
        let mut farm = Farm::new(4, 3);
        farm.plant(PlotCoord::new(0, 0), "wheat").expect("empty");
        farm.plant(PlotCoord::new(3, 2), "potato").expect("empty");
        farm.water(PlotCoord::new(0, 0)).expect("water");
        farm.advance_day(&WeatherSample::new(19.0, 1.0, 18.0));
        farm.advance_day(&WeatherSample::new(23.0, 6.0, 14.0));

        let mut ctx = FarmContext::new(420, 100);
        ctx.energy.spend(37).expect("energy");
        (farm, ctx)
    }

    #[test]
    fn test_save_game_serialization() {
        let (farm, ctx) = sample_farm();
        let weather = WeatherSample::new(23.0, 6.0, 14.0);
        let save = SaveGame::capture("Spring", &farm, &ctx, Some(weather));

        let bytes = save.to_bytes().expect("serialization should succeed");
        assert_eq!(&bytes[0..4], b"FRSV");

        let loaded = SaveGame::from_bytes(&bytes).expect("deserialization should succeed");
        assert_eq!(loaded, save);
        assert_eq!(loaded.day, 2);
        assert_eq!(loaded.money, 420);
        assert_eq!(loaded.energy.current(), 63);
        assert_eq!(loaded.last_weather, Some(weather));
    }

    #[test]
    fn test_restore_rebuilds_farm() {
        let (farm, ctx) = sample_farm();
        let save = SaveGame::capture("Spring", &farm, &ctx, None);

        let (restored, restored_ctx) = save
            .restore(CropCatalog::with_defaults())
            .expect("valid save");
        assert_eq!(restored.day(), 2);
        assert_eq!(restored.grid().snapshot(), farm.grid().snapshot());
        assert_eq!(
            restored.status(PlotCoord::new(0, 0)),
            farm.status(PlotCoord::new(0, 0))
        );
        assert_eq!(restored_ctx, ctx);
    }

    #[test]
    fn test_restore_unknown_species_fails() {
        let (farm, ctx) = sample_farm();
        let save = SaveGame::capture("Spring", &farm, &ctx, None);

        let result = save.restore(CropCatalog::new());
        assert!(matches!(result, Err(SaveError::Grid(_))));
    }

    #[test]
    fn test_save_game_invalid_format() {
        let bad_bytes = vec![0, 1, 2, 3, 4, 5];
        let result = SaveGame::from_bytes(&bad_bytes);
        assert!(matches!(result, Err(SaveError::InvalidFormat)));

        let result = SaveGame::from_bytes(b"FRSV\x01");
        assert!(matches!(result, Err(SaveError::Corrupted(_))));
    }

    #[test]
    fn test_save_game_version_mismatch() {
        let (farm, ctx) = sample_farm();
        let mut save = SaveGame::capture("Future", &farm, &ctx, None);
        save.version = SchemaVersion::new(9, 0, 0);

        let bytes = save.to_bytes().expect("serialize");
        assert!(matches!(
            SaveGame::from_bytes(&bytes),
            Err(SaveError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_save_manager_save_load() {
        let dir = TempDir::new().expect("temp dir");
        let manager = SaveManager::new(dir.path().join("saves"));
        let (farm, ctx) = sample_farm();
        let save = SaveGame::capture("Spring", &farm, &ctx, None);

        manager.save("slot1", &save).expect("save should succeed");
        assert!(manager.exists("slot1"));
        assert!(!manager.save_dir().join("slot1.sav.tmp").exists());

        let loaded = manager.load("slot1").expect("load should succeed");
        assert_eq!(loaded, save);
    }

    #[test]
    fn test_save_manager_overwrite() {
        let dir = TempDir::new().expect("temp dir");
        let manager = SaveManager::new(dir.path());
        let (mut farm, ctx) = sample_farm();

        manager
            .save("slot", &SaveGame::capture("A", &farm, &ctx, None))
            .expect("first save");
        farm.advance_day(&WeatherSample::default());
        manager
            .save("slot", &SaveGame::capture("A", &farm, &ctx, None))
            .expect("second save");

        assert_eq!(manager.load("slot").expect("load").day, 3);
    }

    #[test]
    fn test_save_manager_list_and_delete() {
        let dir = TempDir::new().expect("temp dir");
        let manager = SaveManager::new(dir.path());
        let (farm, ctx) = sample_farm();

        manager
            .save("one", &SaveGame::capture("One", &farm, &ctx, None))
            .expect("save");
        manager
            .save("two", &SaveGame::capture("Two", &farm, &ctx, None))
            .expect("save");
        fs::write(dir.path().join("junk.sav"), b"not a save").expect("write junk");
        fs::write(dir.path().join("notes.txt"), b"ignored").expect("write notes");

        let saves = manager.list_saves().expect("list");
        assert_eq!(saves.len(), 2);
        assert!(saves.iter().all(|m| m.crops == 2 && m.file_size > 0));

        manager.delete("one").expect("delete");
        assert!(!manager.exists("one"));
        assert!(matches!(manager.delete("one"), Err(SaveError::NotFound(_))));
        assert!(matches!(manager.load("one"), Err(SaveError::NotFound(_))));
    }

    #[test]
    fn test_export_json() {
        let dir = TempDir::new().expect("temp dir");
        let manager = SaveManager::new(dir.path());
        let (farm, ctx) = sample_farm();
        manager
            .save("slot", &SaveGame::capture("Spring", &farm, &ctx, None))
            .expect("save");

        let out = dir.path().join("slot.json");
        manager.export_json("slot", &out).expect("export");

        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&out).expect("read")).expect("valid json");
        assert_eq!(json["name"], "Spring");
        assert_eq!(json["day"], 2);
        assert_eq!(json["grid"]["plots"][0]["species"], "wheat");
    }
}
