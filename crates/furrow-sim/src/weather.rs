//! Daily weather input for the simulation.
//!
//! A [`WeatherSample`] is supplied once per day advance. The core treats any
//! sample as valid input, extreme values included; substituting a sample when
//! the weather source fails is the host's job.

use serde::{Deserialize, Serialize};

/// Temperature (°C) above which crops lose extra water.
pub const HOT_DAY_TEMPERATURE: f32 = 32.0;
/// Temperature (°C) above which an extreme heat notice is raised.
pub const EXTREME_HEAT_TEMPERATURE: f32 = 35.0;
/// Temperature (°C) below which an extreme cold notice is raised.
pub const EXTREME_COLD_TEMPERATURE: f32 = 10.0;
/// Precipitation (mm) above which the surplus soaks into the soil.
pub const RAIN_SOAK_THRESHOLD: f32 = 8.0;
/// Water level gained per mm of precipitation above [`RAIN_SOAK_THRESHOLD`].
pub const RAIN_SOAK_FACTOR: f32 = 1.5;
/// Solar radiation (kW/m²) above which crops scorch.
pub const SCORCHING_SOLAR: f32 = 28.0;
/// Solar radiation (kW/m²) above which a high radiation warning is raised.
pub const HIGH_SOLAR_WARNING: f32 = 30.0;

/// One day's weather reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Air temperature in °C.
    pub temperature: f32,
    /// Precipitation in mm (non-negative).
    pub precipitation: f32,
    /// Solar radiation in kW/m² (non-negative).
    pub solar: f32,
}

impl Default for WeatherSample {
    fn default() -> Self {
        Self::new(20.0, 0.0, 18.0)
    }
}

impl WeatherSample {
    /// Creates a new weather sample.
    #[must_use]
    pub const fn new(temperature: f32, precipitation: f32, solar: f32) -> Self {
        Self {
            temperature,
            precipitation,
            solar,
        }
    }

    /// Checks that every field is a finite number and the non-negative
    /// fields are non-negative.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.temperature.is_finite()
            && self.precipitation.is_finite()
            && self.solar.is_finite()
            && self.precipitation >= 0.0
            && self.solar >= 0.0
    }

    /// Water level soaked up from rain above the soak threshold.
    #[must_use]
    pub fn rain_soak(&self) -> f32 {
        if self.precipitation > RAIN_SOAK_THRESHOLD {
            (self.precipitation - RAIN_SOAK_THRESHOLD) * RAIN_SOAK_FACTOR
        } else {
            0.0
        }
    }

    /// Coarse sky condition for display.
    #[must_use]
    pub fn sky(&self) -> Sky {
        Sky::classify(self)
    }
}

/// Coarse sky condition derived from a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sky {
    /// Clear skies, normal conditions.
    #[default]
    Clear,
    /// Overcast, reduced sunlight.
    Cloudy,
    /// Raining.
    Raining,
    /// Heavy rain.
    Storm,
}

impl Sky {
    /// Classifies a sample by precipitation, then by sunlight.
    #[must_use]
    pub fn classify(sample: &WeatherSample) -> Self {
        match sample.precipitation {
            p if p > 12.0 => Self::Storm,
            p if p > 2.0 => Self::Raining,
            _ if sample.solar < 12.0 => Self::Cloudy,
            _ => Self::Clear,
        }
    }

    /// Get the display name for this sky condition.
    #[must_use]
    pub fn display_name(self) -> &'static str {
        match self {
            Self::Clear => "Clear",
            Self::Cloudy => "Cloudy",
            Self::Raining => "Raining",
            Self::Storm => "Storm",
        }
    }

    /// Check if it's currently raining (includes storm).
    #[must_use]
    pub fn is_raining(self) -> bool {
        matches!(self, Self::Raining | Self::Storm)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rain_soak() {
        assert_eq!(WeatherSample::new(20.0, 8.0, 15.0).rain_soak(), 0.0);
        assert!((WeatherSample::new(20.0, 12.0, 15.0).rain_soak() - 6.0).abs() < 1e-5);
    }

    #[test]
    fn test_well_formed() {
        assert!(WeatherSample::default().is_well_formed());
        assert!(WeatherSample::new(-40.0, 0.0, 0.0).is_well_formed());
        assert!(!WeatherSample::new(f32::NAN, 0.0, 10.0).is_well_formed());
        assert!(!WeatherSample::new(20.0, -1.0, 10.0).is_well_formed());
        assert!(!WeatherSample::new(20.0, 1.0, f32::INFINITY).is_well_formed());
    }

    #[test]
    fn test_sky_classification() {
        assert_eq!(WeatherSample::new(20.0, 0.0, 20.0).sky(), Sky::Clear);
        assert_eq!(WeatherSample::new(20.0, 0.0, 8.0).sky(), Sky::Cloudy);
        assert_eq!(WeatherSample::new(20.0, 5.0, 8.0).sky(), Sky::Raining);
        assert_eq!(WeatherSample::new(20.0, 15.0, 8.0).sky(), Sky::Storm);
        assert!(Sky::Storm.is_raining());
        assert!(!Sky::Cloudy.is_raining());
    }
}
