//! Farm orchestration: day advances and player actions.

use crate::catalog::CropCatalog;
use crate::crop::{Crop, CropStatus, HarvestResult, Warning};
use crate::grid::{PlotGrid, PlotState};
use crate::weather::WeatherSample;
use furrow_common::{FarmResult, PlotCoord};
use std::collections::BTreeMap;
use tracing::info;

/// Outcome of one day advance.
#[derive(Debug, Clone, PartialEq)]
pub struct DaySummary {
    /// Day number that was just completed (first day is 1).
    pub day: u32,
    /// Warnings raised, keyed by plot.
    pub warnings_by_plot: BTreeMap<PlotCoord, Vec<Warning>>,
    /// Plots ready to harvest after the advance.
    pub ready_to_harvest: usize,
    /// Living crops running low on water after the advance.
    pub needing_water: usize,
    /// Plots without a crop.
    pub empty: usize,
    /// Plots holding a dead crop.
    pub dead: usize,
}

impl DaySummary {
    /// Total number of warnings across all plots.
    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.warnings_by_plot.values().map(Vec::len).sum()
    }
}

/// A farm: the plot grid, the species it can plant, and the day counter.
#[derive(Debug, Clone)]
pub struct Farm {
    grid: PlotGrid,
    catalog: CropCatalog,
    day: u32,
}

impl Farm {
    /// Create a farm of empty plots with the built-in species.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_catalog(width, height, CropCatalog::with_defaults())
    }

    /// Create a farm of empty plots with a custom catalog.
    #[must_use]
    pub fn with_catalog(width: u32, height: u32, catalog: CropCatalog) -> Self {
        Self::from_parts(PlotGrid::new(width, height), catalog, 0)
    }

    /// Assemble a farm from a restored grid.
    #[must_use]
    pub fn from_parts(grid: PlotGrid, catalog: CropCatalog, day: u32) -> Self {
        Self { grid, catalog, day }
    }

    /// The plot grid.
    #[must_use]
    pub fn grid(&self) -> &PlotGrid {
        &self.grid
    }

    /// The species catalog.
    #[must_use]
    pub fn catalog(&self) -> &CropCatalog {
        &self.catalog
    }

    /// Number of days advanced so far.
    #[must_use]
    pub fn day(&self) -> u32 {
        self.day
    }

    /// Display status of the crop at `coord`, if any.
    #[must_use]
    pub fn status(&self, coord: PlotCoord) -> Option<CropStatus> {
        self.grid.crop(coord).map(Crop::status)
    }

    /// Plant a species by identifier.
    pub fn plant(&mut self, coord: PlotCoord, species: &str) -> FarmResult<()> {
        let species = self.catalog.get(species)?;
        self.grid.plant(coord, species)
    }

    /// Water one crop. Returns the water actually added.
    pub fn water(&mut self, coord: PlotCoord) -> FarmResult<f32> {
        self.grid.water(coord)
    }

    /// Water every crop that accepts water. Returns how many were watered.
    pub fn water_all(&mut self) -> usize {
        self.grid.water_all()
    }

    /// Harvest a mature crop.
    pub fn harvest(&mut self, coord: PlotCoord) -> FarmResult<HarvestResult> {
        self.grid.harvest(coord)
    }

    /// Clear a dead crop.
    pub fn remove_dead(&mut self, coord: PlotCoord) -> FarmResult<()> {
        self.grid.remove_dead(coord)
    }

    /// Apply one day of weather to every crop and summarize the farm.
    pub fn advance_day(&mut self, weather: &WeatherSample) -> DaySummary {
        self.day += 1;
        let warnings_by_plot = self.grid.advance_all(weather);

        let mut summary = DaySummary {
            day: self.day,
            warnings_by_plot,
            ready_to_harvest: 0,
            needing_water: 0,
            empty: 0,
            dead: 0,
        };
        for slot in self.grid.iter() {
            match slot.state() {
                PlotState::Empty => summary.empty += 1,
                PlotState::Mature => summary.ready_to_harvest += 1,
                PlotState::Dead => summary.dead += 1,
                PlotState::Growing => {}
            }
            if slot.crop().is_some_and(Crop::needs_water) {
                summary.needing_water += 1;
            }
        }

        info!(
            day = summary.day,
            ready = summary.ready_to_harvest,
            thirsty = summary.needing_water,
            empty = summary.empty,
            dead = summary.dead,
            warnings = summary.warning_count(),
            "Day advanced"
        );
        summary
    }
}
