//! Dense, row-major grid storage.

use serde::{Deserialize, Serialize};

use super::{Grid, GridError};
use crate::{Dimensions, Location};

/// Grid for content present in most cells, stored as a row-major `Vec`.
///
/// # Example
///
/// ```
/// use gridly::{DenseGrid, Dimensions, Grid, Location};
///
/// let mut grid = DenseGrid::filled(Dimensions::new(2, 2), '.');
/// grid.set(Location::new(0, 1), '#').unwrap();
///
/// let text: String = grid.cells().map(|(_, c)| *c).collect();
/// assert_eq!(text, ".#..");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DenseGrid<T> {
    dimensions: Dimensions,
    content: Vec<T>,
}

impl<T: Clone + Default> DenseGrid<T> {
    /// Create a grid with every cell set to `T::default()`.
    #[must_use]
    pub fn new(dimensions: Dimensions) -> Self {
        Self::filled(dimensions, T::default())
    }
}

impl<T: Clone> DenseGrid<T> {
    /// Create a grid with every cell set to `fill`.
    #[must_use]
    pub fn filled(dimensions: Dimensions, fill: T) -> Self {
        Self {
            dimensions,
            content: vec![fill; dimensions.area()],
        }
    }
}

impl<T> DenseGrid<T> {
    /// Create a grid from row-major content.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::ContentSize`] if `content` does not hold exactly
    /// one value per cell.
    pub fn from_vec(dimensions: Dimensions, content: Vec<T>) -> Result<Self, GridError> {
        if content.len() != dimensions.area() {
            return Err(GridError::ContentSize {
                expected: dimensions.area(),
                actual: content.len(),
            });
        }
        Ok(Self {
            dimensions,
            content,
        })
    }

    /// Build from content already known to hold one value per cell.
    pub(super) fn from_parts(dimensions: Dimensions, content: Vec<T>) -> Self {
        debug_assert_eq!(content.len(), dimensions.area());
        Self {
            dimensions,
            content,
        }
    }

    /// Mutable access to a cell.
    pub fn get_mut(&mut self, location: Location) -> Result<&mut T, GridError> {
        let index = self.index(location)?;
        self.content.get_mut(index).ok_or(GridError::OutOfBounds {
            location,
            dimensions: self.dimensions,
        })
    }

    /// Row-major content of the whole grid.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.content
    }

    /// Consume the grid and return its row-major content.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.content
    }

    fn index(&self, location: Location) -> Result<usize, GridError> {
        self.dimensions
            .index(location)
            .ok_or(GridError::OutOfBounds {
                location,
                dimensions: self.dimensions,
            })
    }
}

impl<T> Grid for DenseGrid<T> {
    type Item = T;

    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn get(&self, location: Location) -> Result<&T, GridError> {
        let index = self.index(location)?;
        self.content.get(index).ok_or(GridError::OutOfBounds {
            location,
            dimensions: self.dimensions,
        })
    }

    fn replace(&mut self, location: Location, value: T) -> Result<T, GridError> {
        let slot = self.get_mut(location)?;
        Ok(std::mem::replace(slot, value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_reads() {
        let grid: DenseGrid<Option<u8>> = DenseGrid::new(Dimensions::new(5, 7));
        assert!(grid.cells().all(|(_, cell)| cell.is_none()));
        assert_eq!(grid.cells().count(), 35);
    }

    #[test]
    fn test_from_vec_checks_size() {
        let err = DenseGrid::from_vec(Dimensions::new(2, 2), vec![1, 2, 3]).unwrap_err();
        assert_eq!(
            err,
            GridError::ContentSize {
                expected: 4,
                actual: 3
            }
        );

        let grid = DenseGrid::from_vec(Dimensions::new(2, 2), vec![1, 2, 3, 4]).unwrap();
        assert_eq!(grid.get(Location::new(1, 0)).unwrap(), &3);
    }

    #[test]
    fn test_replace_returns_previous() {
        let mut grid = DenseGrid::filled(Dimensions::new(1, 3), 'a');
        let old = grid.replace(Location::new(0, 2), 'z').unwrap();
        assert_eq!(old, 'a');
        assert_eq!(grid.as_slice(), &['a', 'a', 'z']);
        assert!(grid.replace(Location::new(0, 3), 'q').is_err());
    }

    #[test]
    fn test_get_mut() {
        let mut grid: DenseGrid<u32> = DenseGrid::new(Dimensions::new(2, 2));
        *grid.get_mut(Location::new(1, 1)).unwrap() += 5;
        assert_eq!(grid.into_vec(), vec![0, 0, 0, 5]);
    }
}
