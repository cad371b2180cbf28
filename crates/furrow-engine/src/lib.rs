//! Furrow Engine - headless host for the Furrow farm simulation.
//!
//! This crate wires the simulation core to the outside world:
//! configuration, the daily weather feed, player actions with their money
//! and energy costs, save files, and the session runner used by the `furrow`
//! binary.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod actions;
pub mod config;
pub mod economy;
pub mod save;
pub mod session;
pub mod weather_feed;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::actions::*;
    pub use crate::config::*;
    pub use crate::economy::*;
    pub use crate::save::*;
    pub use crate::session::*;
    pub use crate::weather_feed::*;
}

pub use prelude::*;
