//! Per-tick entity records.
//!
//! This module provides:
//! - [`EntityId`]: index of an entity in the tick's arena
//! - [`Entity`]: one movement proposal and its evolving resolution state
//! - [`CollisionType`], [`CollisionResolution`], [`CollisionSet`] and
//!   [`ResolutionTable`]: see [`collision`]
//!
//! An entity is created when a batch is submitted and dropped when the tick
//! ends. Only the resolver changes its classification and resolution, and it
//! does so through checked transitions: a terminal classification is never
//! overwritten and a resolution is set at most once.
//!
//! # Example
//!
//! ```
//! use gridly::{DenseGrid, Dimensions, Direction, Grid, Location};
//! use gridly_movement::{CollisionType, MovementEngine};
//!
//! let mut grid: DenseGrid<Option<char>> = DenseGrid::new(Dimensions::new(1, 3));
//! grid.set(Location::new(0, 0), Some('a')).unwrap();
//!
//! let engine = MovementEngine::new();
//! let plan = engine.plan(&grid, [(Location::new(0, 0), Direction::Right)]).unwrap();
//! let entity = plan.entities().at_location(Location::new(0, 0)).unwrap();
//!
//! assert_eq!(entity.desired_location(), Some(Location::new(0, 1)));
//! assert_eq!(entity.underlying(), &Some('a'));
//! assert_eq!(entity.collision(), CollisionType::None);
//! ```

pub mod collision;

use std::fmt;

use gridly::Location;
use serde::{Deserialize, Serialize};

use crate::error::MovementError;

pub use collision::{CollisionResolution, CollisionSet, CollisionType, ResolutionTable};

/// Identifier of an entity within one tick.
///
/// Ids are assigned in ascending row-major order of the entities' starting
/// cells, so comparing ids compares starting cells.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates an `EntityId` from its raw index.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    /// The id for arena slot `index`, if it fits.
    pub(crate) fn from_index(index: usize) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A movement proposal and its resolution state.
///
/// `T` is the grid's cell type; [`underlying`](Self::underlying) is a copy
/// of the starting cell's content taken when the batch was submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity<T> {
    id: EntityId,
    underlying: T,
    location: Location,
    desired_location: Option<Location>,
    collision: CollisionType,
    resolution: Option<CollisionResolution>,
}

impl<T> Entity<T> {
    pub(crate) fn new(
        id: EntityId,
        underlying: T,
        location: Location,
        desired_location: Option<Location>,
    ) -> Self {
        Self {
            id,
            underlying,
            location,
            desired_location,
            collision: CollisionType::Unknown,
            resolution: None,
        }
    }

    /// The entity's id.
    #[must_use]
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Content of the starting cell when the batch was submitted.
    #[must_use]
    pub fn underlying(&self) -> &T {
        &self.underlying
    }

    /// The starting cell.
    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    /// The cell the entity wants to enter.
    ///
    /// `None` if the movement leads past the edge of the coordinate space;
    /// such entities are classified as wall collisions.
    #[must_use]
    pub fn desired_location(&self) -> Option<Location> {
        self.desired_location
    }

    /// Current classification.
    #[must_use]
    pub fn collision(&self) -> CollisionType {
        self.collision
    }

    /// Resolution, once decided.
    #[must_use]
    pub fn resolution(&self) -> Option<CollisionResolution> {
        self.resolution
    }

    /// Returns true once a resolution has been decided.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolution.is_some()
    }

    /// Returns true if the entity wants a different cell.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.desired_location != Some(self.location)
    }

    /// Returns true if the starting cell will be empty after commit.
    #[must_use]
    pub fn vacates(&self) -> bool {
        match self.resolution {
            Some(CollisionResolution::Die) => true,
            Some(CollisionResolution::Move) => self.displaces(),
            Some(CollisionResolution::Stay) | None => false,
        }
    }

    /// Returns true if the entity will occupy its desired cell after commit.
    #[must_use]
    pub fn displaces(&self) -> bool {
        self.target().is_some()
    }

    /// The cell the entity moves into, if it is resolved to a move that
    /// leaves its starting cell.
    #[must_use]
    pub fn target(&self) -> Option<Location> {
        if self.resolution == Some(CollisionResolution::Move) {
            self.desired_location.filter(|&desired| desired != self.location)
        } else {
            None
        }
    }

    /// Where the entity will be after commit; `None` if it dies.
    ///
    /// Unresolved entities report their starting cell.
    #[must_use]
    pub fn final_location(&self) -> Option<Location> {
        match self.resolution {
            Some(CollisionResolution::Die) => None,
            Some(CollisionResolution::Move) => Some(self.target().unwrap_or(self.location)),
            Some(CollisionResolution::Stay) | None => Some(self.location),
        }
    }

    /// Record a classification.
    ///
    /// Only unknown and pending entities may be (re)classified.
    pub(crate) fn classify(&mut self, collision: CollisionType) -> Result<(), MovementError> {
        if self.collision.is_terminal() {
            return Err(MovementError::Reclassified {
                location: self.location,
                from: self.collision,
                to: collision,
            });
        }
        self.collision = collision;
        Ok(())
    }

    /// Record the resolution. A second call fails.
    pub(crate) fn resolve(&mut self, resolution: CollisionResolution) -> Result<(), MovementError> {
        if self.resolution.is_some() {
            return Err(MovementError::ResolutionAlreadySet {
                location: self.location,
            });
        }
        self.resolution = Some(resolution);
        Ok(())
    }
}
