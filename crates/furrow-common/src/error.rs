//! Error types for Furrow.
//!
//! Every variant is an expected domain outcome. Operations that return one of
//! these leave the farm exactly as it was before the call.

use thiserror::Error;

/// Rejection reasons for crop and plot operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FarmError {
    /// Coordinate outside the grid extent
    #[error("Plot ({x}, {y}) is outside the {width}x{height} farm")]
    OutOfBounds {
        /// X coordinate
        x: u32,
        /// Y coordinate
        y: u32,
        /// Grid width
        width: u32,
        /// Grid height
        height: u32,
    },

    /// Plant attempted on a plot that already holds a crop
    #[error("Plot ({x}, {y}) is already planted")]
    AlreadyOccupied {
        /// X coordinate
        x: u32,
        /// Y coordinate
        y: u32,
    },

    /// Water, harvest or removal attempted on an empty plot
    #[error("Plot ({x}, {y}) has no crop")]
    NoCrop {
        /// X coordinate
        x: u32,
        /// Y coordinate
        y: u32,
    },

    /// Harvest attempted before the crop reached maturity
    #[error("Crop is not ready to harvest (growth {growth:.1}%)")]
    NotReady {
        /// Growth at the time of the attempt
        growth: f32,
    },

    /// Removal attempted on an empty plot or a viable crop
    #[error("Plot ({x}, {y}) has no dead crop to remove")]
    NotDead {
        /// X coordinate
        x: u32,
        /// Y coordinate
        y: u32,
    },

    /// Water attempted on an already saturated crop
    #[error("Soil is saturated (water level {water_level:.1}%)")]
    SaturatedSoil {
        /// Water level at the time of the attempt
        water_level: f32,
    },

    /// Water or harvest attempted on a crop that has withered
    #[error("Crop at ({x}, {y}) is dead")]
    CropDead {
        /// X coordinate
        x: u32,
        /// Y coordinate
        y: u32,
    },

    /// Species identifier not present in the catalog
    #[error("Unknown crop species: {0}")]
    UnknownSpecies(String),

    /// Species definition rejected by the catalog
    #[error("Invalid species '{id}': {reason}")]
    InvalidSpecies {
        /// Species identifier
        id: String,
        /// Why the definition was rejected
        reason: String,
    },
}

/// Result type alias for farm operations.
pub type FarmResult<T> = Result<T, FarmError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = FarmError::OutOfBounds {
            x: 7,
            y: 1,
            width: 5,
            height: 3,
        };
        assert_eq!(err.to_string(), "Plot (7, 1) is outside the 5x3 farm");

        let err = FarmError::NotReady { growth: 74.0 };
        assert_eq!(err.to_string(), "Crop is not ready to harvest (growth 74.0%)");

        let err = FarmError::UnknownSpecies("kale".to_string());
        assert_eq!(err.to_string(), "Unknown crop species: kale");
    }
}
