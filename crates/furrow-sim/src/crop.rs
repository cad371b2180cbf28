//! Crop growth model.
//!
//! A [`Crop`] carries one planted crop's biological state and applies the daily
//! update rule for a [`WeatherSample`]:
//! - Warnings are computed from the state before growth is applied
//! - Growth is skipped when the soil is too dry or the temperature far off
//! - Otherwise growth advances by the species rate scaled by temperature,
//!   water and solar modifiers, and water is consumed
//! - Heat, rain and strong sunlight then adjust water and health

use crate::catalog::CropSpecies;
use crate::weather::{
    WeatherSample, EXTREME_COLD_TEMPERATURE, EXTREME_HEAT_TEMPERATURE, HIGH_SOLAR_WARNING,
    HOT_DAY_TEMPERATURE, SCORCHING_SOLAR,
};
use furrow_common::{FarmError, FarmResult, SpeciesId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Water level of a freshly planted crop.
pub const INITIAL_WATER_LEVEL: f32 = 50.0;
/// Water added by a single watering.
pub const DEFAULT_WATER_AMOUNT: f32 = 30.0;
/// Growth at which a crop can be harvested.
pub const HARVEST_THRESHOLD: f32 = 75.0;
/// Water level below which a crop is considered thirsty.
pub const LOW_WATER_LEVEL: f32 = 40.0;
/// Upper bound of the comfortable water band.
pub const GOOD_WATER_LEVEL: f32 = 70.0;
/// Water level above which watering is refused and excess is reported.
pub const SATURATION_LEVEL: f32 = 90.0;
/// Water level above which roots start to rot.
pub const WATERLOGGED_LEVEL: f32 = 95.0;
/// Degrees outside the optimal temperature band at which growth stops.
pub const TEMPERATURE_TOLERANCE: f32 = 10.0;

const PERFECT_GROWTH: f32 = 95.0;
const HEALTHY: f32 = 90.0;
const PERFECT_GROWTH_BONUS: f64 = 1.2;
const HEALTHY_BONUS: f64 = 1.1;

/// Severity of a crop warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningKind {
    /// Needs immediate attention.
    Critical,
    /// Should be looked at.
    Warning,
    /// Informational notice.
    Info,
    /// Conditions are good.
    Success,
}

/// A player-facing notice produced by a day of growth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    /// Severity.
    pub kind: WarningKind,
    /// Message text.
    pub message: String,
}

impl Warning {
    fn new(kind: WarningKind, message: String) -> Self {
        Self { kind, message }
    }
}

/// Growth stage of a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GrowthStage {
    /// Just planted (growth below 25%).
    #[default]
    Seed,
    /// Small sprout (25-49%).
    Sprout,
    /// Growing plant (50-74%).
    Growing,
    /// Fully grown, can be harvested (75% and up).
    Mature,
    /// Withered; can only be cleared.
    Dead,
}

impl GrowthStage {
    /// Stage for a growth percentage of a living crop.
    #[must_use]
    pub fn from_growth(growth: f32) -> Self {
        match growth {
            g if g >= HARVEST_THRESHOLD => Self::Mature,
            g if g >= 50.0 => Self::Growing,
            g if g >= 25.0 => Self::Sprout,
            _ => Self::Seed,
        }
    }

    /// Get the display name of this stage.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Seed => "Seed",
            Self::Sprout => "Sprout",
            Self::Growing => "Growing",
            Self::Mature => "Mature",
            Self::Dead => "Dead",
        }
    }

    /// Check if this crop is dead and should be removed.
    #[must_use]
    pub fn is_dead(self) -> bool {
        matches!(self, Self::Dead)
    }
}

/// Result of harvesting a crop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestResult {
    /// Species harvested.
    pub species: SpeciesId,
    /// Growth at harvest time.
    pub quality: f32,
    /// Health at harvest time.
    pub health: f32,
    /// Sale value after quality multipliers.
    pub value: u32,
    /// Days the crop was alive.
    pub days_alive: u32,
}

/// Read-only snapshot of a crop for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropStatus {
    /// Species identifier.
    pub species: SpeciesId,
    /// Growth percentage.
    pub growth: f32,
    /// Water level percentage.
    pub water_level: f32,
    /// Health percentage.
    pub health: f32,
    /// Days alive.
    pub days_alive: u32,
    /// Current stage.
    pub stage: GrowthStage,
    /// Whether the crop can be harvested now.
    pub can_harvest: bool,
    /// Solar radiation seen on the last day.
    pub last_solar_radiation: f32,
}

/// Mutable part of a crop, as persisted in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CropState {
    /// Growth percentage [0, 100].
    pub growth: f32,
    /// Water level percentage [0, 100].
    pub water_level: f32,
    /// Health percentage [0, 100].
    pub health: f32,
    /// Days alive.
    pub days_alive: u32,
    /// Value of `days_alive` when the last low-water warning fired.
    pub last_water_warning_day: u32,
    /// Solar radiation seen on the last day.
    pub last_solar_radiation: f32,
    /// Latched once the crop dies.
    pub withered: bool,
}

impl Default for CropState {
    fn default() -> Self {
        Self {
            growth: 0.0,
            water_level: INITIAL_WATER_LEVEL,
            health: 100.0,
            days_alive: 0,
            last_water_warning_day: 0,
            last_solar_radiation: 0.0,
            withered: false,
        }
    }
}

/// One planted crop.
#[derive(Debug, Clone)]
pub struct Crop {
    species: Arc<CropSpecies>,
    state: CropState,
}

impl Crop {
    /// Create a freshly planted crop.
    #[must_use]
    pub fn new(species: Arc<CropSpecies>) -> Self {
        Self::from_state(species, CropState::default())
    }

    /// Rebuild a crop from persisted state. Percentages are clamped to [0, 100].
    #[must_use]
    pub fn from_state(species: Arc<CropSpecies>, state: CropState) -> Self {
        let mut crop = Self { species, state };
        crop.state.growth = clamp_percent(crop.state.growth);
        crop.clamp_levels();
        crop.update_withered();
        crop
    }

    /// Species definition.
    #[must_use]
    pub fn species(&self) -> &Arc<CropSpecies> {
        &self.species
    }

    /// Current persisted state.
    #[must_use]
    pub fn state(&self) -> CropState {
        self.state
    }

    /// Growth percentage.
    #[must_use]
    pub fn growth(&self) -> f32 {
        self.state.growth
    }

    /// Water level percentage.
    #[must_use]
    pub fn water_level(&self) -> f32 {
        self.state.water_level
    }

    /// Health percentage.
    #[must_use]
    pub fn health(&self) -> f32 {
        self.state.health
    }

    /// Days alive.
    #[must_use]
    pub fn days_alive(&self) -> u32 {
        self.state.days_alive
    }

    /// Solar radiation seen on the last day.
    #[must_use]
    pub fn last_solar_radiation(&self) -> f32 {
        self.state.last_solar_radiation
    }

    /// Current growth stage. Death overrides growth.
    #[must_use]
    pub fn stage(&self) -> GrowthStage {
        if self.is_dead() {
            GrowthStage::Dead
        } else {
            GrowthStage::from_growth(self.state.growth)
        }
    }

    /// Check if the crop has died.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.state.withered || self.state.water_level <= 0.0 || self.state.health <= 0.0
    }

    /// Check if the crop can be harvested.
    #[must_use]
    pub fn can_harvest(&self) -> bool {
        !self.is_dead() && self.state.growth >= HARVEST_THRESHOLD
    }

    /// Check if a living crop is running low on water.
    #[must_use]
    pub fn needs_water(&self) -> bool {
        !self.is_dead() && self.state.water_level < LOW_WATER_LEVEL
    }

    /// Display snapshot.
    #[must_use]
    pub fn status(&self) -> CropStatus {
        CropStatus {
            species: self.species.id.clone(),
            growth: self.state.growth,
            water_level: self.state.water_level,
            health: self.state.health,
            days_alive: self.state.days_alive,
            stage: self.stage(),
            can_harvest: self.can_harvest(),
            last_solar_radiation: self.state.last_solar_radiation,
        }
    }

    /// Advance the crop by one day of weather.
    ///
    /// Returns the warnings raised from the pre-growth state. A dead crop does
    /// not change and raises nothing.
    pub fn grow(&mut self, weather: &WeatherSample) -> Vec<Warning> {
        if self.is_dead() {
            return Vec::new();
        }

        self.state.days_alive += 1;
        self.state.last_solar_radiation = weather.solar;

        let warnings = self.check_conditions(weather);

        if self.is_growth_gated(weather) {
            debug!(
                species = %self.species.id,
                water_level = self.state.water_level,
                temperature = weather.temperature,
                "Growth skipped"
            );
            return warnings;
        }

        let amount = self.species.growth_rate
            * temperature_modifier(&self.species, weather.temperature)
            * water_modifier(&self.species, self.state.water_level)
            * solar_modifier(&self.species, weather.solar);
        self.state.growth = clamp_percent(self.state.growth + amount);
        self.state.water_level -= self.species.water_consumption;

        self.apply_weather_effects(weather);
        self.clamp_levels();
        self.update_withered();

        warnings
    }

    /// Add water, capped at 100%. Returns the amount actually added.
    ///
    /// Negative amounts add nothing.
    pub fn water(&mut self, amount: f32) -> f32 {
        let before = self.state.water_level;
        self.state.water_level = clamp_percent(before + amount.max(0.0));
        self.state.water_level - before
    }

    /// Compute the harvest without changing the crop.
    ///
    /// Fails with `NotReady` below the harvest threshold and also for a dead
    /// crop at any growth; `PlotGrid::harvest` reports the dead case as
    /// `CropDead` instead.
    pub fn harvest(&self) -> FarmResult<HarvestResult> {
        if !self.can_harvest() {
            return Err(FarmError::NotReady {
                growth: self.state.growth,
            });
        }

        let mut value = f64::from(self.species.harvest_value);
        if self.state.growth >= PERFECT_GROWTH {
            value *= PERFECT_GROWTH_BONUS;
        }
        if self.state.health >= HEALTHY {
            value *= HEALTHY_BONUS;
        }

        Ok(HarvestResult {
            species: self.species.id.clone(),
            quality: self.state.growth,
            health: self.state.health,
            value: value.floor() as u32,
            days_alive: self.state.days_alive,
        })
    }

    fn is_growth_gated(&self, weather: &WeatherSample) -> bool {
        self.state.water_level < self.species.water_need.min
            || self
                .species
                .optimal_temperature
                .distance_outside(weather.temperature)
                > TEMPERATURE_TOLERANCE
    }

    fn check_conditions(&mut self, weather: &WeatherSample) -> Vec<Warning> {
        let name = &self.species.name;
        let water = self.state.water_level;
        let mut warnings = Vec::new();

        if water < self.species.water_need.min {
            warnings.push(Warning::new(
                WarningKind::Critical,
                format!("{name} needs water urgently!"),
            ));
        } else if water < LOW_WATER_LEVEL
            && self
                .state
                .days_alive
                .saturating_sub(self.state.last_water_warning_day)
                > 1
        {
            warnings.push(Warning::new(
                WarningKind::Warning,
                format!("{name} is running low on water ({water:.0}%)"),
            ));
            self.state.last_water_warning_day = self.state.days_alive;
        }

        if weather.temperature > EXTREME_HEAT_TEMPERATURE {
            warnings.push(Warning::new(
                WarningKind::Info,
                format!(
                    "Extreme heat ({:.1}°C): {name} will use more water",
                    weather.temperature
                ),
            ));
        }
        if weather.temperature < EXTREME_COLD_TEMPERATURE {
            warnings.push(Warning::new(
                WarningKind::Info,
                format!(
                    "Extreme cold ({:.1}°C): {name} will grow slowly",
                    weather.temperature
                ),
            ));
        }

        if water > SATURATION_LEVEL {
            warnings.push(Warning::new(
                WarningKind::Warning,
                format!("Too much water for {name}, do not water now"),
            ));
        }
        if (LOW_WATER_LEVEL..=GOOD_WATER_LEVEL).contains(&water) {
            warnings.push(Warning::new(
                WarningKind::Success,
                format!("{name} has a good water level"),
            ));
        }

        if weather.solar > HIGH_SOLAR_WARNING {
            warnings.push(Warning::new(
                WarningKind::Warning,
                format!(
                    "High solar radiation ({:.1} kW/m²): inspect your {name}",
                    weather.solar
                ),
            ));
        }

        warnings
    }

    fn apply_weather_effects(&mut self, weather: &WeatherSample) {
        if weather.temperature > HOT_DAY_TEMPERATURE {
            self.state.water_level -= 2.0;
        }
        self.state.water_level += weather.rain_soak();
        if self.state.water_level > WATERLOGGED_LEVEL {
            self.state.health -= 3.0;
        }
        if weather.solar > SCORCHING_SOLAR {
            self.state.water_level -= 1.0;
            self.state.health -= 1.0;
        }
    }

    fn clamp_levels(&mut self) {
        self.state.water_level = clamp_percent(self.state.water_level);
        self.state.health = clamp_percent(self.state.health);
    }

    fn update_withered(&mut self) {
        if self.state.water_level <= 0.0 || self.state.health <= 0.0 {
            self.state.withered = true;
        }
    }
}

/// Growth multiplier for the day's temperature.
#[must_use]
pub fn temperature_modifier(species: &CropSpecies, temperature: f32) -> f32 {
    let distance = species.optimal_temperature.distance_outside(temperature);
    if distance == 0.0 {
        1.0
    } else {
        (1.0 - (distance / 10.0) * 0.2).max(0.2)
    }
}

/// Growth multiplier for the soil water level.
#[must_use]
pub fn water_modifier(species: &CropSpecies, water_level: f32) -> f32 {
    let need = species.water_need;
    if water_level < need.min {
        if need.min > 0.0 {
            water_level / need.min
        } else {
            0.0
        }
    } else if water_level > need.max {
        (1.0 - (water_level - need.max) / 50.0).max(0.5)
    } else {
        1.0
    }
}

/// Growth multiplier for the day's solar radiation.
#[must_use]
pub fn solar_modifier(species: &CropSpecies, solar: f32) -> f32 {
    let optimal = species.optimal_solar;
    if optimal.contains(solar) {
        1.0
    } else if solar < 10.0 {
        0.5
    } else if solar < optimal.min {
        0.7 + (solar - 10.0) * 0.06
    } else {
        (1.0 - (solar - optimal.max) * 0.02).max(0.6)
    }
}

fn clamp_percent(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}
