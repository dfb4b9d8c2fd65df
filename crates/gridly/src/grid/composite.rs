//! Layered grid storage.

use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

use super::{DenseGrid, Grid, GridError};
use crate::{Dimensions, Location};

/// The content of one cell across every layer, bottom layer first.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Layers<T>(Vec<T>);

impl<T> Layers<T> {
    /// Consume the stack and return its values, bottom layer first.
    #[must_use]
    pub fn into_vec(self) -> Vec<T> {
        self.0
    }
}

impl<T> Deref for Layers<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        &self.0
    }
}

impl<T> DerefMut for Layers<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        &mut self.0
    }
}

impl<T> From<Vec<T>> for Layers<T> {
    fn from(values: Vec<T>) -> Self {
        Self(values)
    }
}

impl<T, const N: usize> From<[T; N]> for Layers<T> {
    fn from(values: [T; N]) -> Self {
        Self(values.into())
    }
}

/// Several grids of the same size addressed as one.
///
/// Each cell holds a [`Layers`] stack with one value per source grid, so a
/// single [`get`](Grid::get) reads every layer at a location and a single
/// [`set`](Grid::set) writes them all. Individual layers are reached with
/// [`get_layer`](CompositeGrid::get_layer) and
/// [`replace_layer`](CompositeGrid::replace_layer).
///
/// # Example
///
/// ```
/// use gridly::{CompositeGrid, DenseGrid, Dimensions, Grid, Location};
///
/// let terrain = DenseGrid::filled(Dimensions::new(2, 2), '.');
/// let mut units = DenseGrid::filled(Dimensions::new(2, 2), ' ');
/// units.set(Location::new(1, 0), '@').unwrap();
///
/// let mut world = CompositeGrid::from_layers([terrain, units]).unwrap();
/// assert_eq!(&world.get(Location::new(1, 0)).unwrap()[..], &['.', '@']);
///
/// world.set(Location::new(0, 1), vec!['#', ' '].into()).unwrap();
/// assert_eq!(world.get_layer(Location::new(0, 1), 0).unwrap(), &'#');
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeGrid<T> {
    dimensions: Dimensions,
    depth: usize,
    cells: Vec<Layers<T>>,
}

impl<T: Clone> CompositeGrid<T> {
    /// Stack grids into layers, the first grid at the bottom.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NoLayers`] if `layers` is empty and
    /// [`GridError::SizeMismatch`] if any grid's dimensions differ from the
    /// first one's.
    pub fn from_layers<G, I>(layers: I) -> Result<Self, GridError>
    where
        G: Grid<Item = T>,
        I: IntoIterator<Item = G>,
    {
        let layers: Vec<G> = layers.into_iter().collect();
        let Some(dimensions) = layers.first().map(Grid::dimensions) else {
            return Err(GridError::NoLayers);
        };
        if let Some(other) = layers.iter().find(|layer| layer.dimensions() != dimensions) {
            return Err(GridError::SizeMismatch {
                expected: dimensions,
                actual: other.dimensions(),
            });
        }

        let cells = dimensions
            .locations()
            .map(|location| {
                layers
                    .iter()
                    .map(|layer| layer.get(location).cloned())
                    .collect::<Result<Vec<_>, _>>()
                    .map(Layers)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            dimensions,
            depth: layers.len(),
            cells,
        })
    }

    /// Create a grid of `depth` layers with every cell set to `fill`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::NoLayers`] if `depth` is zero.
    pub fn filled(dimensions: Dimensions, depth: usize, fill: T) -> Result<Self, GridError> {
        if depth == 0 {
            return Err(GridError::NoLayers);
        }
        Ok(Self {
            dimensions,
            depth,
            cells: vec![Layers(vec![fill; depth]); dimensions.area()],
        })
    }
}

impl<T> CompositeGrid<T> {
    /// Number of layers.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Read one layer of a cell.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::OutOfBounds`] for a location outside the grid and
    /// [`GridError::InvalidLayer`] for a layer index at or past the depth.
    pub fn get_layer(&self, location: Location, layer: usize) -> Result<&T, GridError> {
        let depth = self.depth;
        self.get(location)?
            .get(layer)
            .ok_or(GridError::InvalidLayer { layer, depth })
    }

    /// Overwrite one layer of a cell and return its previous value.
    ///
    /// # Errors
    ///
    /// Same as [`get_layer`](Self::get_layer).
    pub fn replace_layer(&mut self, location: Location, layer: usize, value: T) -> Result<T, GridError> {
        let depth = self.depth;
        let index = self.index(location)?;
        let slot = self
            .cells
            .get_mut(index)
            .and_then(|cell| cell.get_mut(layer))
            .ok_or(GridError::InvalidLayer { layer, depth })?;
        Ok(std::mem::replace(slot, value))
    }

    /// Every `(location, value)` pair of one layer, row-major.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::InvalidLayer`] if `layer` is at or past the depth.
    pub fn layer(&self, layer: usize) -> Result<impl Iterator<Item = (Location, &T)> + '_, GridError> {
        if layer >= self.depth {
            return Err(GridError::InvalidLayer {
                layer,
                depth: self.depth,
            });
        }
        Ok(self
            .cells()
            .filter_map(move |(location, cell)| cell.get(layer).map(|value| (location, value))))
    }

    /// Split back into one dense grid per layer, bottom layer first.
    #[must_use]
    pub fn into_layers(self) -> Vec<DenseGrid<T>> {
        let mut layers: Vec<Vec<T>> = (0..self.depth)
            .map(|_| Vec::with_capacity(self.cells.len()))
            .collect();
        for cell in self.cells {
            for (layer, value) in layers.iter_mut().zip(cell.0) {
                layer.push(value);
            }
        }
        layers
            .into_iter()
            .map(|content| DenseGrid::from_parts(self.dimensions, content))
            .collect()
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

impl<T> Grid for CompositeGrid<T> {
    type Item = Layers<T>;

    fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    fn get(&self, location: Location) -> Result<&Layers<T>, GridError> {
        let index = self.index(location)?;
        self.cells.get(index).ok_or(GridError::OutOfBounds {
            location,
            dimensions: self.dimensions,
        })
    }

    /// Overwrite every layer of a cell at once.
    ///
    /// Fails with [`GridError::LayerCount`] unless `value` has exactly one
    /// entry per layer.
    fn replace(&mut self, location: Location, value: Layers<T>) -> Result<Layers<T>, GridError> {
        if value.len() != self.depth {
            return Err(GridError::LayerCount {
                expected: self.depth,
                actual: value.len(),
            });
        }
        let index = self.index(location)?;
        let dimensions = self.dimensions;
        let slot = self
            .cells
            .get_mut(index)
            .ok_or(GridError::OutOfBounds {
                location,
                dimensions,
            })?;
        Ok(std::mem::replace(slot, value))
    }
}
