//! # Furrow Common
//!
//! Common types, utilities, and shared abstractions for Furrow.
//!
//! This crate provides foundational types used across all Furrow crates:
//! - Plot coordinate type and grid indexing
//! - Species identifiers
//! - Version information and magic bytes for snapshots and saves
//! - The farm error taxonomy
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plot_coord_indexing() {
        let coord = PlotCoord::new(3, 2);
        assert_eq!(coord.to_index(5), 13);
        assert_eq!(PlotCoord::from_index(13, 5), coord);
    }

    #[test]
    fn test_species_id_constants() {
        assert_eq!(SpeciesId::TOMATO.as_str(), "tomato");
        assert_eq!(SpeciesId::new("tomato"), SpeciesId::TOMATO);
    }

    #[test]
    fn test_version_compatibility() {
        let v1 = SchemaVersion::new(1, 0, 0);
        let v2 = SchemaVersion::new(1, 1, 0);
        let v3 = SchemaVersion::new(2, 0, 0);

        // v2 can read v1 data (newer version reading older data)
        assert!(v2.is_compatible_with(&v1));
        // Different major versions are incompatible
        assert!(!v1.is_compatible_with(&v3));
    }
}
