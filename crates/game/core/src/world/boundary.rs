//! Spatial guard for positions computed by movement and teleport logic.

use std::fmt;

use super::{MapSize, Position};

/// Tracks the invalid coordinate range of the current map.
///
/// The ranges hold the first invalid coordinate on each side of an axis,
/// `(-1, width)` and `(-1, height)`. Both ends are exclusive and the edge
/// row/column `0` is rejected as well, so a coordinate is valid iff
/// `invalid.0 + 1 < c < invalid.1`. With the default `(-1, 0)` ranges no
/// position is valid until a map is loaded.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundaryChecker {
    invalid_x: (i32, i32),
    invalid_y: (i32, i32),
}

impl BoundaryChecker {
    pub const fn new() -> Self {
        Self {
            invalid_x: (-1, 0),
            invalid_y: (-1, 0),
        }
    }

    pub const fn invalid_x(&self) -> (i32, i32) {
        self.invalid_x
    }

    pub const fn invalid_y(&self) -> (i32, i32) {
        self.invalid_y
    }

    /// Resets the ranges to `(-1, width)` and `(-1, height)`.
    pub fn update_boundaries(&mut self, map_size: impl Into<MapSize>) {
        let size = map_size.into();
        self.invalid_x = (-1, size.width);
        self.invalid_y = (-1, size.height);
    }

    pub fn is_within_boundaries(&self, position: impl Into<Position>) -> bool {
        let (valid_x, valid_y) = self.get_boundary_validity(position);
        valid_x && valid_y
    }

    /// Per-axis validity, used to clamp a move one axis at a time.
    pub fn get_boundary_validity(&self, position: impl Into<Position>) -> (bool, bool) {
        let position = position.into();
        (
            axis_valid(self.invalid_x, position.x),
            axis_valid(self.invalid_y, position.y),
        )
    }
}

fn axis_valid((low, high): (i32, i32), value: i32) -> bool {
    low + 1 < value && value < high
}

impl Default for BoundaryChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for BoundaryChecker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "BoundaryChecker(invalid_x=({}, {}), invalid_y=({}, {}))",
            self.invalid_x.0, self.invalid_x.1, self.invalid_y.0, self.invalid_y.1
        )
    }
}
