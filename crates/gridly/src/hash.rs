//! State hashing for determinism verification.
//!
//! This module provides a function to compute a deterministic hash of grid
//! content. Two grids with identical dimensions and cell content produce
//! identical hashes regardless of their storage type, which makes the hash a
//! cheap fingerprint for replay and determinism tests.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use crate::grid::Grid;

/// Compute a deterministic hash of grid state.
///
/// This hash includes:
/// - The grid dimensions
/// - Every cell's content, visited row-major
///
/// ```
/// use gridly::{hash_grid, DenseGrid, Dimensions, Grid, Location, SparseGrid};
///
/// let dims = Dimensions::new(3, 3);
/// let mut dense: DenseGrid<Option<u8>> = DenseGrid::new(dims);
/// let mut sparse: SparseGrid<Option<u8>> = SparseGrid::new(dims);
/// dense.set(Location::new(1, 2), Some(4)).unwrap();
/// sparse.set(Location::new(1, 2), Some(4)).unwrap();
///
/// assert_eq!(hash_grid(&dense), hash_grid(&sparse));
/// ```
#[must_use]
pub fn hash_grid<G>(grid: &G) -> u64
where
    G: Grid,
    G::Item: Hash,
{
    let mut hasher = DefaultHasher::new();

    grid.dimensions().hash(&mut hasher);

    for (location, item) in grid.cells() {
        location.hash(&mut hasher);
        item.hash(&mut hasher);
    }

    hasher.finish()
}
