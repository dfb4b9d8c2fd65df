//! Sparse grid storage.

use std::collections::BTreeMap;

use super::{Grid, GridError};
use crate::{Dimensions, Location};

/// Grid for mostly-empty content.
///
/// Cells equal to the fill value are not stored. Setting a cell back to the
/// fill value removes its entry. The map is a `BTreeMap` so [`occupied`]
/// iterates in row-major order.
///
/// [`occupied`]: SparseGrid::occupied
///
/// # Example
///
/// ```
/// use gridly::{Dimensions, Grid, Location, SparseGrid};
///
/// let mut grid: SparseGrid<Option<&str>> = SparseGrid::new(Dimensions::new(100, 100));
/// grid.set(Location::new(40, 2), Some("rock")).unwrap();
/// assert_eq!(grid.len(), 1);
///
/// grid.set(Location::new(40, 2), None).unwrap();
/// assert!(grid.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SparseGrid<T> {
    dimensions: Dimensions,
    fill: T,
    content: BTreeMap<Location, T>,
}

impl<T: Default> SparseGrid<T> {
    /// Create a grid whose fill value is `T::default()`.
    #[must_use]
    pub fn new(dimensions: Dimensions) -> Self {
        Self::with_fill(dimensions, T::default())
    }
}

impl<T> SparseGrid<T> {
    /// Create a grid with an explicit fill value.
    #[must_use]
    pub fn with_fill(dimensions: Dimensions, fill: T) -> Self {
        Self {
            dimensions,
            fill,
            content: BTreeMap::new(),
        }
    }

    /// The value of every unset cell.
    #[must_use]
    pub fn fill(&self) -> &T {
        &self.fill
    }

    /// Number of cells that differ from the fill value.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true if every cell holds the fill value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Cells that differ from the fill value, row-major.
    pub fn occupied(&self) -> impl Iterator<Item = (Location, &T)> + '_ {
        self.content.iter().map(|(location, item)| (*location, item))
    }
}

impl<T: Clone + PartialEq> Grid for SparseGrid<T> {
    type Item = T;

    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn get(&self, location: Location) -> Result<&T, GridError> {
        let location = self.check_location(location)?;
        Ok(self.content.get(&location).unwrap_or(&self.fill))
    }

    fn replace(&mut self, location: Location, value: T) -> Result<T, GridError> {
        let location = self.check_location(location)?;
        let previous = if value == self.fill {
            self.content.remove(&location)
        } else {
            self.content.insert(location, value)
        };
        Ok(previous.unwrap_or_else(|| self.fill.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_cells_read_fill() {
        let grid = SparseGrid::with_fill(Dimensions::new(3, 3), '.');
        assert_eq!(grid.get(Location::new(2, 2)).unwrap(), &'.');
        assert_eq!(grid.fill(), &'.');
    }

    #[test]
    fn test_setting_fill_removes_entry() {
        let mut grid = SparseGrid::with_fill(Dimensions::new(3, 3), 0u8);
        assert_eq!(grid.replace(Location::new(1, 1), 7).unwrap(), 0);
        assert_eq!(grid.len(), 1);
        assert_eq!(grid.replace(Location::new(1, 1), 0).unwrap(), 7);
        assert!(grid.is_empty());
    }

    #[test]
    fn test_occupied_is_row_major() {
        let mut grid: SparseGrid<u8> = SparseGrid::new(Dimensions::new(4, 4));
        grid.set(Location::new(3, 0), 1).unwrap();
        grid.set(Location::new(0, 3), 2).unwrap();
        grid.set(Location::new(0, 1), 3).unwrap();

        let order: Vec<_> = grid.occupied().map(|(loc, _)| loc).collect();
        assert_eq!(
            order,
            vec![Location::new(0, 1), Location::new(0, 3), Location::new(3, 0)]
        );
    }

    #[test]
    fn test_out_of_bounds_write_is_rejected() {
        let mut grid: SparseGrid<u8> = SparseGrid::new(Dimensions::new(2, 2));
        assert!(grid.set(Location::new(-1, 0), 4).is_err());
        assert!(grid.is_empty());
    }
}
