//! Per-tick results.
//!
//! A [`TickReport`] is what the engine hands back after a commit: one
//! [`MovementRecord`] per entity, sorted by starting cell. Records are plain
//! data and serialize with serde, so callers can log or replay them.

use gridly::Location;
use serde::{Deserialize, Serialize};

use crate::arena::EntityArena;
use crate::entity::{CollisionResolution, CollisionType, Entity, EntityId};

/// Final state of one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MovementRecord {
    /// The entity's id within the tick.
    pub id: EntityId,
    /// Starting cell.
    pub from: Location,
    /// Cell after the tick; `None` if the entity died.
    pub to: Option<Location>,
    /// Final collision type.
    pub collision: CollisionType,
    /// Final resolution.
    pub resolution: CollisionResolution,
}

impl MovementRecord {
    fn from_entity<T>(entity: &Entity<T>) -> Option<Self> {
        Some(Self {
            id: entity.id(),
            from: entity.location(),
            to: entity.final_location(),
            collision: entity.collision(),
            resolution: entity.resolution()?,
        })
    }

    /// Returns true if the entity ended the tick on a different cell.
    #[must_use]
    pub fn moved(&self) -> bool {
        self.to.is_some_and(|to| to != self.from)
    }
}

/// Every entity's outcome for one tick, sorted by starting cell.
///
/// # Example
///
/// ```
/// use gridly::{DenseGrid, Dimensions, Direction, Grid, Location};
/// use gridly_movement::{CollisionResolution, MovementEngine};
///
/// let mut grid: DenseGrid<Option<char>> = DenseGrid::new(Dimensions::new(2, 2));
/// grid.set(Location::new(0, 0), Some('a')).unwrap();
/// grid.set(Location::new(1, 1), Some('b')).unwrap();
///
/// let engine = MovementEngine::new();
/// let report = engine
///     .resolve(
///         &mut grid,
///         [(Location::new(0, 0), Direction::Down), (Location::new(1, 1), Direction::Down)],
///     )
///     .unwrap();
///
/// assert_eq!(report.moved(), 1);
/// assert_eq!(report.stayed(), 1);
/// let record = report.get(Location::new(0, 0)).unwrap();
/// assert_eq!(record.to, Some(Location::new(1, 0)));
/// assert_eq!(record.resolution, CollisionResolution::Move);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickReport {
    records: Vec<MovementRecord>,
}

impl TickReport {
    /// Build a report from a fully resolved arena.
    ///
    /// Unresolved entities are left out.
    pub(crate) fn from_arena<T>(arena: &EntityArena<T>) -> Self {
        Self {
            records: arena.iter().filter_map(MovementRecord::from_entity).collect(),
        }
    }

    /// All records, sorted by starting cell.
    #[must_use]
    pub fn records(&self) -> &[MovementRecord] {
        &self.records
    }

    /// Iterate over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, MovementRecord> {
        self.records.iter()
    }

    /// The record of the entity that started at `from`.
    #[must_use]
    pub fn get(&self, from: Location) -> Option<&MovementRecord> {
        self.records
            .binary_search_by_key(&from, |record| record.from)
            .ok()
            .map(|index| &self.records[index])
    }

    /// Number of entities that ended the tick on a different cell.
    #[must_use]
    pub fn moved(&self) -> usize {
        self.records.iter().filter(|record| record.moved()).count()
    }

    /// Number of entities that kept their cell.
    #[must_use]
    pub fn stayed(&self) -> usize {
        self.records
            .iter()
            .filter(|record| record.to == Some(record.from))
            .count()
    }

    /// Number of entities that died.
    #[must_use]
    pub fn died(&self) -> usize {
        self.records.iter().filter(|record| record.to.is_none()).count()
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true for a tick without entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a TickReport {
    type Item = &'a MovementRecord;
    type IntoIter = std::slice::Iter<'a, MovementRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
