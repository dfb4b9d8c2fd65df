//! The movement engine facade.
//!
//! [`MovementEngine`] owns the [`Handlers`] and the [`EngineConfig`] and runs
//! one tick at a time:
//!
//! 1. **Plan**: build the entity arena from the batch and resolve every
//!    entity against a shared borrow of the grid
//! 2. **Commit**: validate the plan and apply it to the grid
//!
//! [`MovementEngine::resolve`] does both. [`MovementEngine::plan`] stops after
//! the first step so a caller can inspect the outcome before committing it.
//!
//! # Determinism
//!
//! The engine keeps no state between ticks. Given the same grid, batch and
//! handlers it produces the same grid and the same [`TickReport`], whatever
//! order the batch was submitted in.

use gridly::{Grid, Location, Movement};
use serde::{Deserialize, Serialize};
use tracing::debug_span;

use crate::arena::EntityArena;
use crate::cell::Cell;
use crate::entity::ResolutionTable;
use crate::error::MovementError;
use crate::handler::Handlers;
use crate::report::TickReport;
use crate::resolver::{commit, DependencyResolver};

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Resolution used when no handler decides.
    pub defaults: ResolutionTable,
    /// Whether two entities may trade cells in one tick.
    ///
    /// When disabled, both sides of a swap are classified as entity
    /// collisions. Rotations of three or more entities are unaffected.
    pub allow_swaps: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            defaults: ResolutionTable::DEFAULT,
            allow_swaps: true,
        }
    }
}

impl EngineConfig {
    /// The default configuration with swaps disabled.
    #[must_use]
    pub fn without_swaps() -> Self {
        Self {
            allow_swaps: false,
            ..Default::default()
        }
    }
}

/// Resolves and applies batches of simultaneous moves.
///
/// # Example
///
/// ```
/// use gridly::{DenseGrid, Dimensions, Direction, Grid, Location};
/// use gridly_movement::MovementEngine;
///
/// // a b .
/// let mut grid: DenseGrid<Option<char>> = DenseGrid::new(Dimensions::new(1, 3));
/// grid.set(Location::new(0, 0), Some('a')).unwrap();
/// grid.set(Location::new(0, 1), Some('b')).unwrap();
///
/// let engine = MovementEngine::new();
/// engine
///     .resolve(
///         &mut grid,
///         [(Location::new(0, 0), Direction::Right), (Location::new(0, 1), Direction::Right)],
///     )
///     .unwrap();
///
/// // . a b
/// assert_eq!(grid.as_slice(), &[None, Some('a'), Some('b')]);
/// ```
#[derive(Debug, Clone)]
pub struct MovementEngine<G: Grid> {
    handlers: Handlers<G>,
    config: EngineConfig,
}

impl<G> MovementEngine<G>
where
    G: Grid,
    G::Item: Cell,
{
    /// An engine with no handlers and the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    /// An engine with no handlers.
    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            handlers: Handlers::new(),
            config,
        }
    }

    /// An engine with the given handlers and configuration.
    #[must_use]
    pub fn with_handlers(handlers: Handlers<G>, config: EngineConfig) -> Self {
        Self { handlers, config }
    }

    /// The registered handlers.
    #[must_use]
    pub fn handlers(&self) -> &Handlers<G> {
        &self.handlers
    }

    /// Mutable access to the handlers, for registration.
    pub fn handlers_mut(&mut self) -> &mut Handlers<G> {
        &mut self.handlers
    }

    /// The configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Resolve a batch without touching the grid.
    ///
    /// Every handler runs during planning, so each entity's handlers are
    /// invoked at most once per call.
    ///
    /// # Errors
    ///
    /// Input errors ([`MovementError::DuplicateLocation`],
    /// [`MovementError::OutOfBounds`]) before any handler runs; policy
    /// violations and handler failures during resolution.
    pub fn plan<I, M>(&self, grid: &G, batch: I) -> Result<MovementPlan<G::Item>, MovementError>
    where
        I: IntoIterator<Item = (Location, M)>,
        M: Into<Movement>,
    {
        let arena = EntityArena::from_batch(grid, batch)?;
        let span = debug_span!("plan", entities = arena.len());
        let _guard = span.enter();

        let arena = DependencyResolver::new(grid, arena, &self.handlers, &self.config).resolve_all()?;
        Ok(MovementPlan { arena })
    }

    /// Resolve a batch and apply it to the grid.
    ///
    /// # Errors
    ///
    /// Any error from [`plan`](Self::plan) or [`MovementPlan::commit`]. The
    /// grid is unchanged when an error is returned.
    pub fn resolve<I, M>(&self, grid: &mut G, batch: I) -> Result<TickReport, MovementError>
    where
        I: IntoIterator<Item = (Location, M)>,
        M: Into<Movement>,
    {
        let plan = self.plan(grid, batch)?;
        plan.commit(grid)
    }
}

impl<G> Default for MovementEngine<G>
where
    G: Grid,
    G::Item: Cell,
{
    fn default() -> Self {
        Self::new()
    }
}

/// A fully resolved tick that has not been applied yet.
#[derive(Debug, Clone)]
pub struct MovementPlan<T> {
    arena: EntityArena<T>,
}

impl<T: Cell> MovementPlan<T> {
    /// The resolved entities.
    #[must_use]
    pub fn entities(&self) -> &EntityArena<T> {
        &self.arena
    }

    /// The outcome the plan will produce, without applying it.
    #[must_use]
    pub fn report(&self) -> TickReport {
        TickReport::from_arena(&self.arena)
    }

    /// Apply the plan to the grid it was made for.
    ///
    /// # Errors
    ///
    /// [`MovementError::ResolutionConflict`] if a destination is occupied
    /// when the plan is applied, for example because the grid changed since
    /// planning. The grid is unchanged when an error is returned.
    pub fn commit<G>(self, grid: &mut G) -> Result<TickReport, MovementError>
    where
        G: Grid<Item = T>,
    {
        let span = debug_span!("commit", entities = self.arena.len());
        let _guard = span.enter();
        commit(grid, &self.arena)
    }
}
