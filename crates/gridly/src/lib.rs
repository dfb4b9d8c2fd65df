//! # Gridly
//!
//! Spatial substrate for discrete, turn-based grid worlds.
//!
//! Gridly represents a world as a fixed-size rectangle of cells addressed by
//! `(row, column)` [`Location`]s, with `+row` pointing down and `+column`
//! pointing right. It provides:
//!
//! - **Location arithmetic**: neighbours, paths and displacements
//! - **Directions**: the four cardinal unit steps
//! - **Bounds-checked grids**: dense, sparse and layered storage behind one
//!   [`Grid`] trait, with row and column iteration
//! - **State hashing**: deterministic fingerprints for replay verification
//!
//! ## Quick Start
//!
//! ```
//! use gridly::{DenseGrid, Dimensions, Direction, Grid, Location};
//!
//! let mut grid: DenseGrid<Option<char>> = DenseGrid::new(Dimensions::new(3, 4));
//! let origin = Location::new(1, 1);
//!
//! grid.set(origin, Some('@')).unwrap();
//! let target = origin.relative(Direction::Right, 2);
//!
//! assert!(grid.valid(target));
//! assert!(!grid.valid(target.right(1)));
//! assert_eq!(grid.get(origin).unwrap(), &Some('@'));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod direction;
pub mod grid;
pub mod hash;
pub mod location;

// Re-exports for convenience
pub use direction::{Direction, Displacement, Movement};
pub use grid::{CompositeGrid, DenseGrid, Grid, GridError, Layers, Line, SparseGrid};
pub use hash::hash_grid;
pub use location::Location;

/// Size of a grid, in rows and columns.
///
/// Valid locations satisfy `0 <= row < rows` and `0 <= column < columns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Dimensions {
    /// Number of rows
    pub rows: u32,
    /// Number of columns
    pub columns: u32,
}

impl Dimensions {
    /// Create dimensions from a row and column count.
    #[must_use]
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Total number of cells.
    #[must_use]
    pub fn area(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Check if a row index is inside the dimensions.
    #[must_use]
    pub fn contains_row(&self, row: i32) -> bool {
        u32::try_from(row).is_ok_and(|row| row < self.rows)
    }

    /// Check if a column index is inside the dimensions.
    #[must_use]
    pub fn contains_column(&self, column: i32) -> bool {
        u32::try_from(column).is_ok_and(|column| column < self.columns)
    }

    /// Check if a location is inside the dimensions.
    #[must_use]
    pub fn contains(&self, location: Location) -> bool {
        self.contains_row(location.row) && self.contains_column(location.column)
    }

    /// Row-major index of a location, if it is inside the dimensions.
    #[must_use]
    pub fn index(&self, location: Location) -> Option<usize> {
        if !self.contains(location) {
            return None;
        }
        // Both components were checked to be non-negative above
        #[allow(clippy::cast_sign_loss)]
        let (row, column) = (location.row as usize, location.column as usize);
        Some(row * self.columns as usize + column)
    }

    /// Location at a row-major index, if the index is inside the dimensions.
    #[must_use]
    pub fn location(&self, index: usize) -> Option<Location> {
        if self.columns == 0 || index >= self.area() {
            return None;
        }
        let columns = self.columns as usize;
        let row = i32::try_from(index / columns).ok()?;
        let column = i32::try_from(index % columns).ok()?;
        Some(Location::new(row, column))
    }

    /// Iterate over every location in row-major order.
    pub fn locations(&self) -> impl Iterator<Item = Location> {
        let dims = *self;
        (0..dims.area()).filter_map(move |index| dims.location(index))
    }
}
