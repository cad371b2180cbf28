//! Grid snapshots for external save systems.
//!
//! A [`GridSnapshot`] is a plain serde value holding every occupied plot's
//! species id and crop state. The core defines no byte format; hosts encode
//! the snapshot however they persist the rest of the game.

use crate::catalog::CropCatalog;
use crate::crop::{Crop, CropState};
use crate::grid::PlotGrid;
use furrow_common::{FarmError, PlotCoord, SchemaVersion, SpeciesId, MAX_GRID_SIDE};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors restoring a grid from a snapshot.
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// Snapshot written by an incompatible version
    #[error("Incompatible snapshot version: expected {expected}, found {found}")]
    VersionMismatch {
        /// Version this build reads
        expected: SchemaVersion,
        /// Version in the snapshot
        found: SchemaVersion,
    },

    /// Grid size outside 1..=`MAX_GRID_SIDE` on either side
    #[error("Invalid grid size {width}x{height}")]
    InvalidDimensions {
        /// Width in the snapshot
        width: u32,
        /// Height in the snapshot
        height: u32,
    },

    /// Plot outside the snapshot's own dimensions
    #[error("Plot {0} lies outside the snapshot grid")]
    OutOfBounds(PlotCoord),

    /// Two entries for the same plot
    #[error("Plot {0} appears more than once")]
    DuplicatePlot(PlotCoord),

    /// Species id not in the catalog
    #[error("Plot {coord} has unknown species '{species}'")]
    UnknownSpecies {
        /// Plot position
        coord: PlotCoord,
        /// Species id found
        species: SpeciesId,
    },
}

/// One occupied plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotSnapshot {
    /// Column.
    pub x: u32,
    /// Row.
    pub y: u32,
    /// Species id.
    pub species: SpeciesId,
    /// Crop state.
    pub state: CropState,
}

impl PlotSnapshot {
    /// Plot position.
    #[must_use]
    pub fn coord(&self) -> PlotCoord {
        PlotCoord::new(self.x, self.y)
    }
}

/// Full grid contents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSnapshot {
    /// Snapshot schema version.
    pub version: SchemaVersion,
    /// Grid width.
    pub width: u32,
    /// Grid height.
    pub height: u32,
    /// Occupied plots in row-major order.
    pub plots: Vec<PlotSnapshot>,
}

impl PlotGrid {
    /// Capture every occupied plot.
    #[must_use]
    pub fn snapshot(&self) -> GridSnapshot {
        let plots = self
            .iter()
            .filter_map(|slot| {
                slot.crop().map(|crop| PlotSnapshot {
                    x: slot.coord().x,
                    y: slot.coord().y,
                    species: crop.species().id.clone(),
                    state: crop.state(),
                })
            })
            .collect();

        GridSnapshot {
            version: SchemaVersion::GRID_SNAPSHOT,
            width: self.width(),
            height: self.height(),
            plots,
        }
    }

    /// Rebuild a grid from a snapshot, resolving species in `catalog`.
    pub fn from_snapshot(
        snapshot: &GridSnapshot,
        catalog: &CropCatalog,
    ) -> Result<Self, SnapshotError> {
        if !SchemaVersion::GRID_SNAPSHOT.can_read(&snapshot.version) {
            return Err(SnapshotError::VersionMismatch {
                expected: SchemaVersion::GRID_SNAPSHOT,
                found: snapshot.version,
            });
        }

        let side = 1..=MAX_GRID_SIDE;
        if !side.contains(&snapshot.width) || !side.contains(&snapshot.height) {
            return Err(SnapshotError::InvalidDimensions {
                width: snapshot.width,
                height: snapshot.height,
            });
        }

        let mut grid = Self::new(snapshot.width, snapshot.height);
        for plot in &snapshot.plots {
            let coord = plot.coord();
            let species =
                catalog
                    .get(plot.species.as_str())
                    .map_err(|_| SnapshotError::UnknownSpecies {
                        coord,
                        species: plot.species.clone(),
                    })?;

            grid.insert(coord, Crop::from_state(species, plot.state))
                .map_err(|err| match err {
                    FarmError::AlreadyOccupied { .. } => SnapshotError::DuplicatePlot(coord),
                    _ => SnapshotError::OutOfBounds(coord),
                })?;
        }
        Ok(grid)
    }
}
