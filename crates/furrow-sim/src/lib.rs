//! # Furrow Sim
//!
//! Crop growth and farm plot simulation for Furrow.
//!
//! This crate is the deterministic core of the game. It owns no I/O, clock or
//! randomness; hosts feed it one weather sample per day and player actions.
//! - Species catalog with growth parameters
//! - Per-crop growth, water and health update rule
//! - Plot grid with single occupancy and a plot lifecycle
//! - Farm orchestration and daily summaries
//! - Grid snapshots for save systems
//!
//! The farm is not internally synchronized. A multi-threaded host must
//! serialize access, e.g. by keeping one `Farm` behind a mutex.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod crop;
pub mod farm;
pub mod grid;
pub mod snapshot;
pub mod weather;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::crop::*;
    pub use crate::farm::*;
    pub use crate::grid::*;
    pub use crate::snapshot::*;
    pub use crate::weather::*;
}

pub use prelude::*;
