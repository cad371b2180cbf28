//! Farm plot grid.
//!
//! A dense `width x height` array of plots, each holding at most one crop.
//! Every operation validates its coordinate first and either applies fully or
//! returns an error with the grid untouched.
//!
//! Plot lifecycle: `Empty -> Growing -> (Mature | Dead)`. A mature crop stays
//! harvestable until harvested; a dead crop stays in its plot until removed.

use crate::catalog::CropSpecies;
use crate::crop::{Crop, HarvestResult, Warning, DEFAULT_WATER_AMOUNT, SATURATION_LEVEL};
use crate::weather::WeatherSample;
use furrow_common::{FarmError, FarmResult, PlotCoord};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lifecycle state of a plot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PlotState {
    /// No crop.
    #[default]
    Empty,
    /// Crop growing, not yet harvestable.
    Growing,
    /// Crop ready to harvest.
    Mature,
    /// Crop withered, waiting to be cleared.
    Dead,
}

/// One cell of the farm grid.
#[derive(Debug, Clone)]
pub struct PlotSlot {
    coord: PlotCoord,
    crop: Option<Crop>,
    vacated: bool,
}

impl PlotSlot {
    fn empty(coord: PlotCoord) -> Self {
        Self {
            coord,
            crop: None,
            vacated: false,
        }
    }

    /// Position of this plot.
    #[must_use]
    pub fn coord(&self) -> PlotCoord {
        self.coord
    }

    /// Check if the plot holds a crop (dead or alive).
    #[must_use]
    pub fn is_occupied(&self) -> bool {
        self.crop.is_some()
    }

    /// The crop in this plot, if any.
    #[must_use]
    pub fn crop(&self) -> Option<&Crop> {
        self.crop.as_ref()
    }

    /// Whether the view should draw this plot as bare soil because its crop
    /// died. The dead crop is still in the plot until removed.
    #[must_use]
    pub fn is_vacated(&self) -> bool {
        self.vacated
    }

    /// Lifecycle state.
    #[must_use]
    pub fn state(&self) -> PlotState {
        match &self.crop {
            None => PlotState::Empty,
            Some(crop) if crop.is_dead() => PlotState::Dead,
            Some(crop) if crop.can_harvest() => PlotState::Mature,
            Some(_) => PlotState::Growing,
        }
    }

    fn clear(&mut self) -> Option<Crop> {
        self.vacated = false;
        self.crop.take()
    }
}

/// The farm's plots.
#[derive(Debug, Clone)]
pub struct PlotGrid {
    width: u32,
    height: u32,
    slots: Vec<PlotSlot>,
}

impl PlotGrid {
    /// Create a grid of empty plots.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let len = width as usize * height as usize;
        let slots = (0..len)
            .map(|index| PlotSlot::empty(PlotCoord::from_index(index, width)))
            .collect();
        Self {
            width,
            height,
            slots,
        }
    }

    /// Grid width in plots.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Grid height in plots.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Total number of plots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Check if the grid has no plots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn index_of(&self, coord: PlotCoord) -> FarmResult<usize> {
        if coord.is_within(self.width, self.height) {
            Ok(coord.to_index(self.width))
        } else {
            Err(FarmError::OutOfBounds {
                x: coord.x,
                y: coord.y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Get a plot.
    pub fn slot(&self, coord: PlotCoord) -> FarmResult<&PlotSlot> {
        let index = self.index_of(coord)?;
        Ok(&self.slots[index])
    }

    fn slot_mut(&mut self, coord: PlotCoord) -> FarmResult<&mut PlotSlot> {
        let index = self.index_of(coord)?;
        Ok(&mut self.slots[index])
    }

    /// Get the crop in a plot, if the coordinate is valid and occupied.
    #[must_use]
    pub fn crop(&self, coord: PlotCoord) -> Option<&Crop> {
        self.slot(coord).ok().and_then(PlotSlot::crop)
    }

    /// Lifecycle state of a plot.
    pub fn state_at(&self, coord: PlotCoord) -> FarmResult<PlotState> {
        self.slot(coord).map(PlotSlot::state)
    }

    /// Iterate over all plots in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &PlotSlot> {
        self.slots.iter()
    }

    /// Plant a fresh crop of `species` in an empty plot.
    pub fn plant(&mut self, coord: PlotCoord, species: Arc<CropSpecies>) -> FarmResult<()> {
        let slot = self.slot_mut(coord)?;
        if slot.is_occupied() {
            return Err(FarmError::AlreadyOccupied {
                x: coord.x,
                y: coord.y,
            });
        }

        debug!(%coord, species = %species.id, "Planted crop");
        slot.crop = Some(Crop::new(species));
        slot.vacated = false;
        Ok(())
    }

    /// Place an existing crop in an empty plot.
    pub(crate) fn insert(&mut self, coord: PlotCoord, crop: Crop) -> FarmResult<()> {
        let slot = self.slot_mut(coord)?;
        if slot.is_occupied() {
            return Err(FarmError::AlreadyOccupied {
                x: coord.x,
                y: coord.y,
            });
        }
        slot.vacated = crop.is_dead();
        slot.crop = Some(crop);
        Ok(())
    }

    /// Harvest a mature crop and clear its plot. Dead crops are refused with
    /// `CropDead` whatever their growth.
    pub fn harvest(&mut self, coord: PlotCoord) -> FarmResult<HarvestResult> {
        let slot = self.slot_mut(coord)?;
        let crop = slot.crop.as_ref().ok_or(FarmError::NoCrop {
            x: coord.x,
            y: coord.y,
        })?;
        if crop.is_dead() {
            return Err(FarmError::CropDead {
                x: coord.x,
                y: coord.y,
            });
        }
        let result = crop.harvest()?;

        slot.clear();
        info!(
            %coord,
            species = %result.species,
            value = result.value,
            "Harvested crop"
        );
        Ok(result)
    }

    /// Water a crop with the default amount. Returns the water actually added.
    ///
    /// Refuses empty plots, dead crops, and crops already at the saturation
    /// level.
    pub fn water(&mut self, coord: PlotCoord) -> FarmResult<f32> {
        let slot = self.slot_mut(coord)?;
        let crop = slot.crop.as_mut().ok_or(FarmError::NoCrop {
            x: coord.x,
            y: coord.y,
        })?;
        if crop.is_dead() {
            return Err(FarmError::CropDead {
                x: coord.x,
                y: coord.y,
            });
        }
        if crop.water_level() >= SATURATION_LEVEL {
            return Err(FarmError::SaturatedSoil {
                water_level: crop.water_level(),
            });
        }

        let delta = crop.water(DEFAULT_WATER_AMOUNT);
        debug!(%coord, delta, water_level = crop.water_level(), "Watered crop");
        Ok(delta)
    }

    /// Water every living crop below the saturation level. Returns how many
    /// plots were watered.
    pub fn water_all(&mut self) -> usize {
        let mut watered = 0;
        for slot in &mut self.slots {
            if let Some(crop) = slot.crop.as_mut() {
                if !crop.is_dead() && crop.water_level() < SATURATION_LEVEL {
                    crop.water(DEFAULT_WATER_AMOUNT);
                    watered += 1;
                }
            }
        }
        debug!(watered, "Watered all crops");
        watered
    }

    /// Clear a dead crop from its plot.
    pub fn remove_dead(&mut self, coord: PlotCoord) -> FarmResult<()> {
        let slot = self.slot_mut(coord)?;
        if slot.state() != PlotState::Dead {
            return Err(FarmError::NotDead {
                x: coord.x,
                y: coord.y,
            });
        }
        slot.clear();
        debug!(%coord, "Cleared dead crop");
        Ok(())
    }

    /// Grow every living crop by one day of weather.
    ///
    /// Returns the warnings of each plot that raised any. Crops that die are
    /// marked vacated but stay in their plot.
    pub fn advance_all(&mut self, weather: &WeatherSample) -> BTreeMap<PlotCoord, Vec<Warning>> {
        let mut report = BTreeMap::new();
        for slot in &mut self.slots {
            let Some(crop) = slot.crop.as_mut() else {
                continue;
            };
            if crop.is_dead() {
                continue;
            }

            let warnings = crop.grow(weather);
            if crop.is_dead() {
                slot.vacated = true;
                warn!(
                    coord = %slot.coord,
                    species = %crop.species().id,
                    water_level = crop.water_level(),
                    health = crop.health(),
                    "Crop died"
                );
            }
            if !warnings.is_empty() {
                report.insert(slot.coord, warnings);
            }
        }
        report
    }

    /// Number of plots holding a crop.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_occupied()).count()
    }

    /// Number of empty plots.
    #[must_use]
    pub fn empty_count(&self) -> usize {
        self.len() - self.occupied_count()
    }

    /// Coordinates of plots in the given state.
    #[must_use]
    pub fn coords_in_state(&self, state: PlotState) -> Vec<PlotCoord> {
        self.slots
            .iter()
            .filter(|s| s.state() == state)
            .map(PlotSlot::coord)
            .collect()
    }

    /// Coordinates of harvestable plots.
    #[must_use]
    pub fn harvestable_coords(&self) -> Vec<PlotCoord> {
        self.coords_in_state(PlotState::Mature)
    }

    /// Coordinates of plots holding a dead crop.
    #[must_use]
    pub fn dead_coords(&self) -> Vec<PlotCoord> {
        self.coords_in_state(PlotState::Dead)
    }
}
