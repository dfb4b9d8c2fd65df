//! # Gridly Movement
//!
//! Simultaneous movement and collision resolution on [`gridly`] grids.
//!
//! Every entity in a batch proposes one move for the same tick. The engine
//! decides, deterministically, who moves, who stays and who dies, calling
//! client handlers at most once per entity, and only then touches the grid.
//!
//! ## Architecture
//!
//! - **Entities**: one [`Entity`] record per proposal, stored in an
//!   [`EntityArena`] indexed by [`EntityId`]
//! - **Resolver**: classifies entities, follows chains of entities waiting on
//!   each other tip-first, grants rotations and settles group collisions
//! - **Handlers**: client callbacks per [`CollisionType`], with a
//!   [`ResolutionTable`] as the fallback
//! - **Commit**: validates the whole tick, then applies it to the grid
//!
//! ## Usage
//!
//! ```
//! use gridly::{DenseGrid, Dimensions, Direction, Grid, Location};
//! use gridly_movement::{CollisionResolution, CollisionType, MovementEngine};
//!
//! // a b c
//! // . . #
//! let mut grid: DenseGrid<Option<char>> = DenseGrid::new(Dimensions::new(2, 3));
//! grid.set(Location::new(0, 0), Some('a')).unwrap();
//! grid.set(Location::new(0, 1), Some('b')).unwrap();
//! grid.set(Location::new(0, 2), Some('c')).unwrap();
//! grid.set(Location::new(1, 2), Some('#')).unwrap();
//!
//! let mut engine: MovementEngine<DenseGrid<Option<char>>> = MovementEngine::new();
//! engine
//!     .handlers_mut()
//!     .on_type(CollisionType::Solid, |_grid, _entity| Ok(Some(CollisionResolution::Die)));
//!
//! // a -> b's cell, b -> down, c -> into the rock
//! let report = engine
//!     .resolve(
//!         &mut grid,
//!         [
//!             (Location::new(0, 0), Direction::Right),
//!             (Location::new(0, 1), Direction::Down),
//!             (Location::new(0, 2), Direction::Down),
//!         ],
//!     )
//!     .unwrap();
//!
//! // . a .
//! // . b #
//! assert_eq!(grid.as_slice(), &[None, Some('a'), None, None, Some('b'), Some('#')]);
//! assert_eq!(report.moved(), 2);
//! assert_eq!(report.died(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod arena;
pub mod cell;
pub mod engine;
pub mod entity;
pub mod error;
pub mod handler;
pub mod report;

mod resolver;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use arena::EntityArena;
pub use cell::Cell;
pub use engine::{EngineConfig, MovementEngine, MovementPlan};
pub use entity::{
    CollisionResolution, CollisionSet, CollisionType, Entity, EntityId, ResolutionTable,
};
pub use error::{HandlerError, MovementError};
pub use handler::{
    EntityHandler, GroupCollision, GroupHandler, GroupVerdict, HandlerResult, Handlers,
};
pub use report::{MovementRecord, TickReport};
