//! Per-tick entity storage.
//!
//! The [`EntityArena`] holds every [`Entity`] of one tick in a flat `Vec`,
//! indexed by [`EntityId`]. Ids are assigned in ascending row-major order of
//! the starting cell, so iterating the arena visits entities in the
//! deterministic tie-break order used throughout resolution.
//!
//! Two indices sit next to the records:
//! - by starting cell (one-to-one), to find the occupant of a destination
//! - by desired cell (one-to-many), to find the contenders for a destination
//!
//! Both are `BTreeMap`s keyed by [`Location`] so any iteration over them is
//! row-major as well.

use std::collections::BTreeMap;
use std::ops::Index;

use gridly::{Grid, Location, Movement};

use crate::entity::{Entity, EntityId};
use crate::error::MovementError;

/// Container for the entities of one tick.
#[derive(Debug, Clone)]
pub struct EntityArena<T> {
    entities: Vec<Entity<T>>,
    by_location: BTreeMap<Location, EntityId>,
    by_destination: BTreeMap<Location, Vec<EntityId>>,
}

impl<T: Clone> EntityArena<T> {
    /// Build the arena for a batch of proposals.
    ///
    /// Proposals are checked in the order given; the first starting cell
    /// outside the grid or used twice fails the whole batch. Each entity's
    /// underlying payload is cloned from its starting cell.
    ///
    /// # Errors
    ///
    /// - [`MovementError::OutOfBounds`] if a starting cell is outside the grid
    /// - [`MovementError::DuplicateLocation`] if two proposals share a
    ///   starting cell
    /// - [`MovementError::BatchTooLarge`] if there are more proposals than
    ///   entity ids
    pub fn from_batch<G, I, M>(grid: &G, batch: I) -> Result<Self, MovementError>
    where
        G: Grid<Item = T>,
        I: IntoIterator<Item = (Location, M)>,
        M: Into<Movement>,
    {
        let mut proposals: BTreeMap<Location, Option<Location>> = BTreeMap::new();
        for (location, movement) in batch {
            if !grid.valid(location) {
                return Err(MovementError::OutOfBounds { location });
            }
            let desired = location.apply(movement.into());
            if proposals.insert(location, desired).is_some() {
                return Err(MovementError::DuplicateLocation { location });
            }
        }

        let len = proposals.len();
        let mut arena = Self {
            entities: Vec::with_capacity(len),
            by_location: BTreeMap::new(),
            by_destination: BTreeMap::new(),
        };
        for (index, (location, desired)) in proposals.into_iter().enumerate() {
            let id = EntityId::from_index(index).ok_or(MovementError::BatchTooLarge { len })?;
            let underlying = grid.get(location)?.clone();
            arena
                .entities
                .push(Entity::new(id, underlying, location, desired));
            arena.by_location.insert(location, id);
            if let Some(desired) = desired {
                arena.by_destination.entry(desired).or_default().push(id);
            }
        }
        Ok(arena)
    }
}

impl<T> EntityArena<T> {
    /// Look up an entity by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity<T>> {
        self.entities.get(id.index())
    }

    pub(crate) fn get_mut(&mut self, id: EntityId) -> &mut Entity<T> {
        &mut self.entities[id.index()]
    }

    /// The id of the entity starting at `location`, if any.
    #[must_use]
    pub fn id_at(&self, location: Location) -> Option<EntityId> {
        self.by_location.get(&location).copied()
    }

    /// The entity starting at `location`, if any.
    #[must_use]
    pub fn at_location(&self, location: Location) -> Option<&Entity<T>> {
        self.id_at(location).and_then(|id| self.get(id))
    }

    /// Every entity that wants to enter `destination`, in id order.
    ///
    /// Entities that stay in place count as contenders for their own cell.
    #[must_use]
    pub fn contenders(&self, destination: Location) -> &[EntityId] {
        self.by_destination
            .get(&destination)
            .map_or(&[], Vec::as_slice)
    }

    /// All entities in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity<T>> + '_ {
        self.entities.iter()
    }

    /// All ids in ascending order.
    pub fn ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter().map(Entity::id)
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the batch was empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<T> Index<EntityId> for EntityArena<T> {
    type Output = Entity<T>;

    fn index(&self, id: EntityId) -> &Entity<T> {
        &self.entities[id.index()]
    }
}
