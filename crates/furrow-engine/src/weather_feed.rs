//! Daily weather sources.
//!
//! The simulation core takes one [`WeatherSample`] per day and never fails on
//! weather. Everything that can go wrong with a source (a script running dry,
//! a malformed sample, an unreadable file) is absorbed here by substituting a
//! fallback sample and logging it.

use crate::config::FallbackWeatherBounds;
use furrow_sim::WeatherSample;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Weather source errors.
#[derive(Debug, Error)]
pub enum WeatherError {
    /// No sample left for the requested day
    #[error("Weather script exhausted on day {day}")]
    Exhausted {
        /// Requested day
        day: u32,
    },

    /// Script file could not be read
    #[error("Failed to read weather script: {0}")]
    Io(#[from] std::io::Error),

    /// Script file is not a JSON array of samples
    #[error("Invalid weather script: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A source of daily weather.
pub trait WeatherProvider {
    /// Produce the sample for `day` (first day is 1).
    fn next_sample(&mut self, day: u32) -> Result<WeatherSample, WeatherError>;
}

/// Pre-recorded weather, consumed one sample per day.
#[derive(Debug, Clone, Default)]
pub struct ScriptedWeather {
    samples: VecDeque<WeatherSample>,
}

impl ScriptedWeather {
    /// Create a script from samples in day order.
    #[must_use]
    pub fn new(samples: impl IntoIterator<Item = WeatherSample>) -> Self {
        Self {
            samples: samples.into_iter().collect(),
        }
    }

    /// Load a JSON array of `{temperature, precipitation, solar}` objects.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, WeatherError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let samples: Vec<WeatherSample> = serde_json::from_str(&contents)?;
        info!(
            "Loaded {} weather samples from {}",
            samples.len(),
            path.display()
        );
        Ok(Self::new(samples))
    }

    /// Samples not yet consumed.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.samples.len()
    }
}

impl WeatherProvider for ScriptedWeather {
    fn next_sample(&mut self, day: u32) -> Result<WeatherSample, WeatherError> {
        self.samples
            .pop_front()
            .ok_or(WeatherError::Exhausted { day })
    }
}

/// Uniformly random weather within configured bounds.
#[derive(Debug, Clone)]
pub struct RandomWeather {
    rng: fastrand::Rng,
    bounds: FallbackWeatherBounds,
}

impl RandomWeather {
    /// Create a generator. `None` seeds from system entropy.
    #[must_use]
    pub fn new(bounds: FallbackWeatherBounds, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };
        Self { rng, bounds }
    }

    /// Draw one sample.
    pub fn sample(&mut self) -> WeatherSample {
        let b = self.bounds;
        WeatherSample::new(
            lerp(b.temperature_min, b.temperature_max, self.rng.f32()),
            lerp(b.precipitation_min, b.precipitation_max, self.rng.f32()),
            lerp(b.solar_min, b.solar_max, self.rng.f32()),
        )
    }
}

impl WeatherProvider for RandomWeather {
    fn next_sample(&mut self, _day: u32) -> Result<WeatherSample, WeatherError> {
        Ok(self.sample())
    }
}

fn lerp(min: f32, max: f32, t: f32) -> f32 {
    min + (max - min) * t
}

/// A provider backed by random fallback weather.
///
/// Always yields a well-formed sample. Provider errors and malformed samples
/// are replaced by a fallback draw and counted.
pub struct WeatherFeed {
    provider: Box<dyn WeatherProvider>,
    fallback: RandomWeather,
    substitutions: u32,
}

impl std::fmt::Debug for WeatherFeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherFeed")
            .field("fallback", &self.fallback)
            .field("substitutions", &self.substitutions)
            .finish_non_exhaustive()
    }
}

impl WeatherFeed {
    /// Wrap `provider` with a fallback generator.
    #[must_use]
    pub fn new(provider: Box<dyn WeatherProvider>, fallback: RandomWeather) -> Self {
        Self {
            provider,
            fallback,
            substitutions: 0,
        }
    }

    /// A feed that only ever uses the fallback generator.
    #[must_use]
    pub fn random(bounds: FallbackWeatherBounds, seed: Option<u64>) -> Self {
        // Offset the seed so the primary and fallback streams differ.
        let fallback_seed = seed.map(|s| s.wrapping_add(1));
        Self::new(
            Box::new(RandomWeather::new(bounds, seed)),
            RandomWeather::new(bounds, fallback_seed),
        )
    }

    /// Weather for `day`. Never fails.
    pub fn sample_for(&mut self, day: u32) -> WeatherSample {
        match self.provider.next_sample(day) {
            Ok(sample) if sample.is_well_formed() => {
                debug!(
                    day,
                    temperature = sample.temperature,
                    precipitation = sample.precipitation,
                    solar = sample.solar,
                    "Weather sample"
                );
                sample
            },
            Ok(sample) => {
                warn!(day, ?sample, "Malformed weather sample, using fallback");
                self.substitute()
            },
            Err(e) => {
                warn!(day, "Weather provider failed ({e}), using fallback");
                self.substitute()
            },
        }
    }

    /// Number of days that used fallback weather.
    #[must_use]
    pub fn substitutions(&self) -> u32 {
        self.substitutions
    }

    fn substitute(&mut self) -> WeatherSample {
        self.substitutions += 1;
        self.fallback.sample()
    }
}
