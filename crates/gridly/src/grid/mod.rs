//! Bounds-checked 2D grids.
//!
//! The [`Grid`] trait is the storage contract shared by every grid type. All
//! accessors are bounds-checked and report [`GridError`] instead of panicking.
//!
//! - [`DenseGrid`]: one value per cell in a row-major `Vec`, for grids where
//!   most cells hold content
//! - [`SparseGrid`]: a fill value plus an ordered map of the cells that differ
//!   from it, for mostly-empty grids
//! - [`CompositeGrid`]: several same-sized layers read and written together,
//!   one [`Layers`] stack per cell

mod composite;
mod dense;
mod sparse;

pub use composite::{CompositeGrid, Layers};
pub use dense::DenseGrid;
pub use sparse::SparseGrid;

use std::ops::Range;

use crate::{Dimensions, Location};

/// Errors produced by grid access.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GridError {
    /// The location is outside the grid.
    #[error("location {location} is outside a {}x{} grid", .dimensions.rows, .dimensions.columns)]
    OutOfBounds {
        /// The rejected location.
        location: Location,
        /// The grid's dimensions.
        dimensions: Dimensions,
    },

    /// The row index is outside the grid.
    #[error("row {0} is outside the grid")]
    InvalidRow(i32),

    /// The column index is outside the grid.
    #[error("column {0} is outside the grid")]
    InvalidColumn(i32),

    /// Initial content does not match the grid's area.
    #[error("grid content has {actual} cells, expected {expected}")]
    ContentSize {
        /// Number of cells required by the dimensions.
        expected: usize,
        /// Number of cells supplied.
        actual: usize,
    },

    /// Two grids that must share dimensions do not.
    #[error("grid is {}x{}, expected {}x{}", .actual.rows, .actual.columns, .expected.rows, .expected.columns)]
    SizeMismatch {
        /// Dimensions of the first grid.
        expected: Dimensions,
        /// Dimensions of the offending grid.
        actual: Dimensions,
    },

    /// A composite grid needs at least one layer.
    #[error("composite grid has no layers")]
    NoLayers,

    /// The layer index is outside a composite grid.
    #[error("layer {layer} is outside a grid of depth {depth}")]
    InvalidLayer {
        /// The rejected layer index.
        layer: usize,
        /// Number of layers in the grid.
        depth: usize,
    },

    /// A cell stack does not have one value per layer.
    #[error("cell has {actual} layers, expected {expected}")]
    LayerCount {
        /// Depth of the grid.
        expected: usize,
        /// Number of values supplied.
        actual: usize,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Row,
    Column,
}

/// The cells of one row or one column, in increasing index order.
///
/// Returned by [`Grid::row`], [`Grid::column`], [`Grid::rows`] and
/// [`Grid::columns`].
#[derive(Debug)]
pub struct Line<'a, G: ?Sized> {
    grid: &'a G,
    axis: Axis,
    fixed: i32,
    span: Range<i32>,
}

impl<'a, G: Grid + ?Sized> Line<'a, G> {
    fn row(grid: &'a G, row: i32) -> Self {
        Self {
            grid,
            axis: Axis::Row,
            fixed: row,
            span: 0..i32::try_from(grid.num_columns()).unwrap_or(i32::MAX),
        }
    }

    fn column(grid: &'a G, column: i32) -> Self {
        Self {
            grid,
            axis: Axis::Column,
            fixed: column,
            span: 0..i32::try_from(grid.num_rows()).unwrap_or(i32::MAX),
        }
    }

    /// Index of the row or column this line walks.
    #[must_use]
    pub fn index(&self) -> i32 {
        self.fixed
    }

    fn location(&self, position: i32) -> Location {
        match self.axis {
            Axis::Row => Location::new(self.fixed, position),
            Axis::Column => Location::new(position, self.fixed),
        }
    }
}

impl<G: ?Sized> Clone for Line<'_, G> {
    fn clone(&self) -> Self {
        Self {
            grid: self.grid,
            axis: self.axis,
            fixed: self.fixed,
            span: self.span.clone(),
        }
    }
}

impl<'a, G: Grid + ?Sized> Iterator for Line<'a, G> {
    type Item = &'a G::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let grid = self.grid;
        while let Some(position) = self.span.next() {
            if let Ok(item) = grid.get(self.location(position)) {
                return Some(item);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.span.size_hint()
    }
}

impl<G: Grid + ?Sized> ExactSizeIterator for Line<'_, G> {}

/// Storage contract for a fixed-size 2D grid.
///
/// Implementors provide [`dimensions`](Grid::dimensions), [`get`](Grid::get)
/// and [`replace`](Grid::replace); everything else has a default built on
/// those three.
///
/// # Example
///
/// ```
/// use gridly::{DenseGrid, Dimensions, Grid, GridError, Location};
///
/// let mut grid: DenseGrid<u8> = DenseGrid::new(Dimensions::new(2, 3));
/// grid.set(Location::new(1, 2), 9).unwrap();
///
/// let row: Vec<u8> = grid.row(1).unwrap().copied().collect();
/// assert_eq!(row, vec![0, 0, 9]);
/// assert!(matches!(grid.get(Location::new(2, 0)), Err(GridError::OutOfBounds { .. })));
/// ```
pub trait Grid {
    /// Cell content type.
    type Item;

    /// Size of the grid.
    fn dimensions(&self) -> Dimensions;

    /// Read the content of a cell.
    fn get(&self, location: Location) -> Result<&Self::Item, GridError>;

    /// Overwrite a cell and return its previous content.
    fn replace(&mut self, location: Location, value: Self::Item) -> Result<Self::Item, GridError>;

    /// Overwrite a cell.
    fn set(&mut self, location: Location, value: Self::Item) -> Result<(), GridError> {
        self.replace(location, value).map(drop)
    }

    /// Number of rows.
    fn num_rows(&self) -> u32 {
        self.dimensions().rows
    }

    /// Number of columns.
    fn num_columns(&self) -> u32 {
        self.dimensions().columns
    }

    /// Check if a location is inside the grid.
    fn valid(&self, location: Location) -> bool {
        self.dimensions().contains(location)
    }

    /// Return `location` if it is inside the grid.
    fn check_location(&self, location: Location) -> Result<Location, GridError> {
        if self.valid(location) {
            Ok(location)
        } else {
            Err(GridError::OutOfBounds {
                location,
                dimensions: self.dimensions(),
            })
        }
    }

    /// Every location of the grid, row-major.
    fn locations(&self) -> impl Iterator<Item = Location> {
        self.dimensions().locations()
    }

    /// Every `(location, content)` pair of the grid, row-major.
    fn cells(&self) -> impl Iterator<Item = (Location, &Self::Item)> + '_ {
        self.dimensions()
            .locations()
            .filter_map(move |location| self.get(location).ok().map(|item| (location, item)))
    }

    /// Iterate over the cells of one row.
    fn row(&self, row: i32) -> Result<Line<'_, Self>, GridError> {
        if !self.dimensions().contains_row(row) {
            return Err(GridError::InvalidRow(row));
        }
        Ok(Line::row(self, row))
    }

    /// Iterate over the cells of one column.
    fn column(&self, column: i32) -> Result<Line<'_, Self>, GridError> {
        if !self.dimensions().contains_column(column) {
            return Err(GridError::InvalidColumn(column));
        }
        Ok(Line::column(self, column))
    }

    /// Every row of the grid, top to bottom.
    ///
    /// ```
    /// use gridly::{DenseGrid, Dimensions, Grid};
    ///
    /// let grid = DenseGrid::from_vec(Dimensions::new(2, 3), vec![1, 2, 3, 4, 5, 6]).unwrap();
    /// let sums: Vec<i32> = grid.rows().map(|row| row.sum()).collect();
    /// assert_eq!(sums, vec![6, 15]);
    /// ```
    fn rows(&self) -> impl Iterator<Item = Line<'_, Self>> + '_ {
        let rows = i32::try_from(self.num_rows()).unwrap_or(i32::MAX);
        (0..rows).map(move |row| Line::row(self, row))
    }

    /// Every column of the grid, left to right.
    fn columns(&self) -> impl Iterator<Item = Line<'_, Self>> + '_ {
        let columns = i32::try_from(self.num_columns()).unwrap_or(i32::MAX);
        (0..columns).map(move |column| Line::column(self, column))
    }
}
