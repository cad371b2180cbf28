//! Engine configuration.
//!
//! Provides the farm size, session length, weather, economy and save settings.
//! Configuration can be loaded from and saved to a TOML file.

use furrow_common::MAX_GRID_SIDE;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Configuration file name.
const CONFIG_FILE: &str = "furrow.toml";

/// A crop to plant on a given day of the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantingOrder {
    /// Plot column
    pub x: u32,
    /// Plot row
    pub y: u32,
    /// Species identifier
    pub species: String,
    /// Day on which to plant (1 = first day)
    #[serde(default = "first_day")]
    pub day: u32,
}

fn first_day() -> u32 {
    1
}

/// Bounds for randomly generated fallback weather.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackWeatherBounds {
    /// Minimum temperature (°C)
    pub temperature_min: f32,
    /// Maximum temperature (°C)
    pub temperature_max: f32,
    /// Minimum precipitation (mm)
    pub precipitation_min: f32,
    /// Maximum precipitation (mm)
    pub precipitation_max: f32,
    /// Minimum solar radiation (kW/m²)
    pub solar_min: f32,
    /// Maximum solar radiation (kW/m²)
    pub solar_max: f32,
}

impl Default for FallbackWeatherBounds {
    fn default() -> Self {
        Self {
            temperature_min: 10.0,
            temperature_max: 35.0,
            precipitation_min: 0.0,
            precipitation_max: 15.0,
            solar_min: 8.0,
            solar_max: 25.0,
        }
    }
}

impl FallbackWeatherBounds {
    fn validate(&mut self) {
        order(&mut self.temperature_min, &mut self.temperature_max);
        self.precipitation_min = self.precipitation_min.max(0.0);
        self.precipitation_max = self.precipitation_max.max(0.0);
        order(&mut self.precipitation_min, &mut self.precipitation_max);
        self.solar_min = self.solar_min.max(0.0);
        self.solar_max = self.solar_max.max(0.0);
        order(&mut self.solar_min, &mut self.solar_max);
    }
}

fn order(min: &mut f32, max: &mut f32) {
    if *min > *max {
        std::mem::swap(min, max);
    }
}

/// Engine configuration parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    // === Farm Settings ===
    /// Farm width in plots
    pub grid_width: u32,
    /// Farm height in plots
    pub grid_height: u32,

    // === Session Settings ===
    /// Number of days to simulate
    pub days: u32,
    /// Water thirsty crops before each day
    pub auto_water: bool,
    /// Harvest ripe crops after each day
    pub auto_harvest: bool,
    /// Clear dead crops before each day
    pub auto_clear_dead: bool,
    /// Crops to plant
    pub plantings: Vec<PlantingOrder>,

    // === Weather Settings ===
    /// Seed for fallback weather (None = random)
    pub weather_seed: Option<u64>,
    /// JSON file with one weather sample per day
    pub weather_script: Option<PathBuf>,
    /// Bounds for fallback weather
    pub fallback_weather: FallbackWeatherBounds,

    // === Economy Settings ===
    /// Money at the start of the session
    pub starting_money: u64,
    /// Daily energy budget
    pub max_energy: u32,
    /// Energy to plant a crop
    pub plant_energy: u32,
    /// Energy to water a crop
    pub water_energy: u32,
    /// Energy to harvest a crop
    pub harvest_energy: u32,
    /// Energy to clear a dead crop
    pub clear_energy: u32,
    /// Seed cost as a fraction of the species' harvest value
    pub seed_cost_ratio: f32,

    // === Persistence Settings ===
    /// Directory for save files
    pub save_dir: PathBuf,
    /// Save slot name
    pub save_name: String,
    /// Save at the end of the session
    pub autosave: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            // Farm
            grid_width: 5,
            grid_height: 3,

            // Session
            days: 30,
            auto_water: true,
            auto_harvest: true,
            auto_clear_dead: true,
            plantings: Vec::new(),

            // Weather
            weather_seed: None,
            weather_script: None,
            fallback_weather: FallbackWeatherBounds::default(),

            // Economy
            starting_money: 500,
            max_energy: 100,
            plant_energy: 5,
            water_energy: 2,
            harvest_energy: 3,
            clear_energy: 4,
            seed_cost_ratio: 0.25,

            // Persistence
            save_dir: PathBuf::from("saves"),
            save_name: "farm".to_string(),
            autosave: true,
        }
    }
}

impl EngineConfig {
    /// Load configuration from the default file location.
    /// Returns default config if file doesn't exist.
    pub fn load() -> Self {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from a specific path.
    /// Returns default config if file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();

        if !path.exists() {
            info!("Config file not found, using defaults");
            return Self::default();
        }

        match fs::File::open(path) {
            Ok(mut file) => {
                let mut contents = String::new();
                if let Err(e) = file.read_to_string(&mut contents) {
                    warn!("Failed to read config file: {e}");
                    return Self::default();
                }

                match toml::from_str::<Self>(&contents) {
                    Ok(mut config) => {
                        config.validate();
                        info!("Loaded config from {}", path.display());
                        config
                    },
                    Err(e) => {
                        warn!("Failed to parse config file: {e}");
                        Self::default()
                    },
                }
            },
            Err(e) => {
                warn!("Failed to open config file: {e}");
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn config_path() -> PathBuf {
        if let Some(config_dir) = dirs_config_path() {
            let candidate = config_dir.join("furrow").join(CONFIG_FILE);
            if candidate.exists() {
                return candidate;
            }
        }
        PathBuf::from(CONFIG_FILE)
    }

    /// Validate and clamp configuration values to sensible ranges.
    pub fn validate(&mut self) {
        // Farm
        self.grid_width = self.grid_width.clamp(1, MAX_GRID_SIDE);
        self.grid_height = self.grid_height.clamp(1, MAX_GRID_SIDE);

        // Session
        self.days = self.days.clamp(1, 3650);
        for order in &mut self.plantings {
            order.day = order.day.max(1);
        }

        // Weather
        self.fallback_weather.validate();

        // Economy
        self.max_energy = self.max_energy.max(1);
        self.seed_cost_ratio = if self.seed_cost_ratio.is_finite() {
            self.seed_cost_ratio.clamp(0.0, 1.0)
        } else {
            0.0
        };

        if self.save_name.trim().is_empty() {
            self.save_name = "farm".to_string();
        }
    }
}

/// Get platform-specific config directory.
fn dirs_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Application Support"))
    }

    #[cfg(target_os = "windows")]
    {
        std::env::var("APPDATA").ok().map(PathBuf::from)
    }

    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| {
                std::env::var("HOME")
                    .ok()
                    .map(|h| PathBuf::from(h).join(".config"))
            })
    }

    #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.grid_width, 5);
        assert_eq!(config.grid_height, 3);
        assert_eq!(config.days, 30);
        assert!(config.auto_water);
        assert_eq!(config.fallback_weather.temperature_max, 35.0);
    }

    #[test]
    fn test_config_validation() {
        let mut config = EngineConfig::default();

        // Set invalid values
        config.grid_width = 0;
        config.grid_height = u32::MAX;
        config.days = 100_000;
        config.seed_cost_ratio = 4.0;
        config.fallback_weather.solar_min = 30.0;
        config.fallback_weather.solar_max = -2.0;
        config.save_name = "  ".to_string();

        config.validate();

        // Should be clamped
        assert_eq!(config.grid_width, 1);
        assert_eq!(config.grid_height, MAX_GRID_SIDE);
        assert_eq!(config.days, 3650);
        assert_eq!(config.seed_cost_ratio, 1.0);
        assert_eq!(config.fallback_weather.solar_min, 0.0);
        assert_eq!(config.fallback_weather.solar_max, 30.0);
        assert_eq!(config.save_name, "farm");
    }

    #[test]
    fn test_config_save_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("furrow.toml");

        // Create and save config
        let mut config = EngineConfig::default();
        config.grid_width = 8;
        config.auto_harvest = false;
        config.weather_seed = Some(12345);
        config.plantings.push(PlantingOrder {
            x: 2,
            y: 1,
            species: "tomato".to_string(),
            day: 3,
        });

        config.save_to(&config_path).expect("Failed to save config");

        // Load and verify
        let loaded = EngineConfig::load_from(&config_path);
        assert_eq!(loaded.grid_width, 8);
        assert!(!loaded.auto_harvest);
        assert_eq!(loaded.weather_seed, Some(12345));
        assert_eq!(loaded.plantings, config.plantings);
    }

    #[test]
    fn test_config_load_missing_file() {
        let config = EngineConfig::load_from("/nonexistent/path/furrow.toml");
        // Should return defaults
        assert_eq!(config.grid_width, 5);
    }

    #[test]
    fn test_config_load_invalid_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("furrow.toml");
        fs::write(&config_path, "grid_width = \"wide\"").expect("write");

        let config = EngineConfig::load_from(&config_path);
        assert_eq!(config.grid_width, 5);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let toml_str = r#"
            days = 12

            [[plantings]]
            x = 0
            y = 0
            species = "wheat"
        "#;
        let config: EngineConfig = toml::from_str(toml_str).expect("valid toml");
        assert_eq!(config.days, 12);
        assert_eq!(config.grid_width, 5);
        assert_eq!(config.plantings[0].day, 1);
    }
}
