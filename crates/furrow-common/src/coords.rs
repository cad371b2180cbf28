//! Plot coordinates on the farm grid.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Largest supported farm side, in plots.
pub const MAX_GRID_SIDE: u32 = 64;

/// Coordinate of a plot on the farm grid.
///
/// Plots are addressed row-major: `index = x + y * width`. Ordering follows
/// the same row-major layout so that maps keyed by coordinate iterate in
/// grid order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlotCoord {
    /// Column (0 = leftmost)
    pub x: u32,
    /// Row (0 = top)
    pub y: u32,
}

impl PlotCoord {
    /// Creates a new plot coordinate.
    #[must_use]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    /// Converts to linear index for a grid of the given width.
    #[must_use]
    pub const fn to_index(self, width: u32) -> usize {
        (self.y as usize) * (width as usize) + (self.x as usize)
    }

    /// Creates from linear index.
    #[must_use]
    pub const fn from_index(index: usize, width: u32) -> Self {
        let width = width as usize;
        Self {
            x: (index % width) as u32,
            y: (index / width) as u32,
        }
    }

    /// Checks whether the coordinate lies inside a `width` x `height` grid.
    #[must_use]
    pub const fn is_within(self, width: u32, height: u32) -> bool {
        self.x < width && self.y < height
    }
}

impl Ord for PlotCoord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.cmp(&other.y).then(self.x.cmp(&other.x))
    }
}

impl PartialOrd for PlotCoord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PlotCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(u32, u32)> for PlotCoord {
    fn from((x, y): (u32, u32)) -> Self {
        Self::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_row_major_ordering() {
        let mut coords = vec![
            PlotCoord::new(1, 1),
            PlotCoord::new(4, 0),
            PlotCoord::new(0, 1),
            PlotCoord::new(0, 0),
        ];
        coords.sort();
        assert_eq!(
            coords,
            vec![
                PlotCoord::new(0, 0),
                PlotCoord::new(4, 0),
                PlotCoord::new(0, 1),
                PlotCoord::new(1, 1),
            ]
        );
    }

    #[test]
    fn test_is_within() {
        assert!(PlotCoord::new(4, 2).is_within(5, 3));
        assert!(!PlotCoord::new(5, 0).is_within(5, 3));
        assert!(!PlotCoord::new(0, 3).is_within(5, 3));
    }

    #[test]
    fn test_display() {
        assert_eq!(PlotCoord::new(2, 7).to_string(), "(2, 7)");
    }

    proptest! {
        #[test]
        fn index_round_trips_inside_grid(width in 1u32..64, height in 1u32..64, seed in any::<u64>()) {
            let x = (seed % u64::from(width)) as u32;
            let y = ((seed / 64) % u64::from(height)) as u32;
            let coord = PlotCoord::new(x, y);
            prop_assert_eq!(PlotCoord::from_index(coord.to_index(width), width), coord);
            prop_assert!(coord.to_index(width) < (width * height) as usize);
        }
    }
}
