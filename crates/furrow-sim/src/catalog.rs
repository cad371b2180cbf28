//! Crop species definitions and the species catalog.

use furrow_common::{FarmError, FarmResult, SpeciesId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// An inclusive `[min, max]` band of preferred values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OptimalRange {
    /// Lower bound (inclusive).
    pub min: f32,
    /// Upper bound (inclusive).
    pub max: f32,
}

impl OptimalRange {
    /// Creates a new range.
    #[must_use]
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Checks if a value lies inside the range.
    #[must_use]
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }

    /// Distance from the nearest bound, or 0 inside the range.
    #[must_use]
    pub fn distance_outside(&self, value: f32) -> f32 {
        if value < self.min {
            self.min - value
        } else if value > self.max {
            value - self.max
        } else {
            0.0
        }
    }

    /// Checks that the bounds are finite and ordered.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

/// Growth parameters of one crop species.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CropSpecies {
    /// Unique identifier.
    pub id: SpeciesId,
    /// Display name.
    pub name: String,
    /// Baseline growth per day (percent).
    pub growth_rate: f32,
    /// Water consumed per growing day (percent).
    pub water_consumption: f32,
    /// Base sale value of a harvest.
    pub harvest_value: u32,
    /// Typical days to maturity (informational).
    pub maturity_days: u32,
    /// Preferred air temperature (°C).
    pub optimal_temperature: OptimalRange,
    /// Preferred soil water level (percent).
    pub water_need: OptimalRange,
    /// Preferred solar radiation (kW/m²).
    pub optimal_solar: OptimalRange,
}

impl CropSpecies {
    /// Create a new species definition builder.
    #[must_use]
    pub fn builder(id: SpeciesId, name: &str) -> CropSpeciesBuilder {
        CropSpeciesBuilder::new(id, name)
    }

    /// Checks the definition for unusable parameters.
    pub fn validate(&self) -> FarmResult<()> {
        let ranges = [
            ("optimal temperature", self.optimal_temperature),
            ("water need", self.water_need),
            ("optimal solar", self.optimal_solar),
        ];
        for (label, range) in ranges {
            if !range.is_ordered() {
                return Err(self.invalid(format!(
                    "{label} range [{}, {}] is not ordered",
                    range.min, range.max
                )));
            }
        }
        if !(self.growth_rate.is_finite() && self.growth_rate >= 0.0) {
            return Err(self.invalid(format!("growth rate {} is negative", self.growth_rate)));
        }
        if !(self.water_consumption.is_finite() && self.water_consumption >= 0.0) {
            return Err(self.invalid(format!(
                "water consumption {} is negative",
                self.water_consumption
            )));
        }
        Ok(())
    }

    fn invalid(&self, reason: String) -> FarmError {
        FarmError::InvalidSpecies {
            id: self.id.to_string(),
            reason,
        }
    }
}

/// Builder for species definitions.
#[derive(Debug)]
pub struct CropSpeciesBuilder {
    species: CropSpecies,
}

impl CropSpeciesBuilder {
    /// Create a new builder with middle-of-the-road defaults.
    #[must_use]
    pub fn new(id: SpeciesId, name: &str) -> Self {
        Self {
            species: CropSpecies {
                id,
                name: name.to_string(),
                growth_rate: 8.0,
                water_consumption: 3.0,
                harvest_value: 40,
                maturity_days: 12,
                optimal_temperature: OptimalRange::new(15.0, 25.0),
                water_need: OptimalRange::new(30.0, 70.0),
                optimal_solar: OptimalRange::new(15.0, 25.0),
            },
        }
    }

    /// Set daily growth rate and water consumption.
    #[must_use]
    pub fn rates(mut self, growth_rate: f32, water_consumption: f32) -> Self {
        self.species.growth_rate = growth_rate;
        self.species.water_consumption = water_consumption;
        self
    }

    /// Set harvest value and days to maturity.
    #[must_use]
    pub fn harvest(mut self, value: u32, maturity_days: u32) -> Self {
        self.species.harvest_value = value;
        self.species.maturity_days = maturity_days;
        self
    }

    /// Set preferred temperature range.
    #[must_use]
    pub fn temperature(mut self, min: f32, max: f32) -> Self {
        self.species.optimal_temperature = OptimalRange::new(min, max);
        self
    }

    /// Set preferred water level range.
    #[must_use]
    pub fn water(mut self, min: f32, max: f32) -> Self {
        self.species.water_need = OptimalRange::new(min, max);
        self
    }

    /// Set preferred solar radiation range.
    #[must_use]
    pub fn solar(mut self, min: f32, max: f32) -> Self {
        self.species.optimal_solar = OptimalRange::new(min, max);
        self
    }

    /// Build the species definition.
    #[must_use]
    pub fn build(self) -> CropSpecies {
        self.species
    }
}

/// Lookup of species definitions by identifier.
#[derive(Debug, Clone, Default)]
pub struct CropCatalog {
    species: HashMap<SpeciesId, Arc<CropSpecies>>,
}

impl CropCatalog {
    /// Create a new empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog with the built-in species.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        for species in default_species() {
            debug_assert!(species.validate().is_ok(), "{} is malformed", species.id);
            catalog.species.insert(species.id.clone(), Arc::new(species));
        }
        catalog
    }

    /// Register a species, replacing any previous definition with the same id.
    pub fn register(&mut self, species: CropSpecies) -> FarmResult<()> {
        species.validate()?;
        self.species.insert(species.id.clone(), Arc::new(species));
        Ok(())
    }

    /// Look up a species by identifier.
    pub fn get(&self, id: &str) -> FarmResult<Arc<CropSpecies>> {
        self.species
            .get(id)
            .cloned()
            .ok_or_else(|| FarmError::UnknownSpecies(id.to_string()))
    }

    /// Check if a species is registered.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.species.contains_key(id)
    }

    /// Number of registered species.
    #[must_use]
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Check if the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Registered identifiers in sorted order.
    #[must_use]
    pub fn ids(&self) -> Vec<&SpeciesId> {
        let mut ids: Vec<_> = self.species.keys().collect();
        ids.sort();
        ids
    }
}

fn default_species() -> [CropSpecies; 5] {
    [
        CropSpecies::builder(SpeciesId::WHEAT, "Wheat")
            .rates(10.0, 3.0)
            .harvest(40, 10)
            .temperature(12.0, 25.0)
            .water(30.0, 80.0)
            .solar(15.0, 25.0)
            .build(),
        CropSpecies::builder(SpeciesId::CORN, "Corn")
            .rates(6.0, 4.0)
            .harvest(60, 16)
            .temperature(20.0, 32.0)
            .water(35.0, 80.0)
            .solar(20.0, 30.0)
            .build(),
        CropSpecies::builder(SpeciesId::TOMATO, "Tomato")
            .rates(7.0, 5.0)
            .harvest(80, 14)
            .temperature(18.0, 29.0)
            .water(25.0, 75.0)
            .solar(18.0, 28.0)
            .build(),
        CropSpecies::builder(SpeciesId::POTATO, "Potato")
            .rates(7.5, 3.0)
            .harvest(50, 12)
            .temperature(12.0, 22.0)
            .water(30.0, 70.0)
            .solar(12.0, 22.0)
            .build(),
        CropSpecies::builder(SpeciesId::CARROT, "Carrot")
            .rates(9.0, 2.5)
            .harvest(30, 9)
            .temperature(10.0, 24.0)
            .water(25.0, 65.0)
            .solar(10.0, 20.0)
            .build(),
    ]
}
