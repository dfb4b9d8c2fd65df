//! Client decision points.
//!
//! [`Handlers`] is a registry of callbacks the engine consults once an
//! entity's collision type is final. Callbacks borrow the grid immutably and
//! return `Ok(Some(resolution))` to decide, `Ok(None)` to defer to the next,
//! less specific callback, or an error to abort the tick.
//!
//! # Dispatch order
//!
//! 1. The handler registered for the entity's collision type
//! 2. The generic collision handler, for `wall`, `solid` and `entity` only
//! 3. The generic movement handler, for every type
//! 4. The engine's [`ResolutionTable`]
//!
//! Group collisions have their own callback, see [`Handlers::on_group`].
//!
//! # Example
//!
//! ```
//! use gridly::DenseGrid;
//! use gridly_movement::{CollisionResolution, CollisionType, Handlers};
//!
//! let mut handlers: Handlers<DenseGrid<Option<char>>> = Handlers::new();
//! handlers
//!     .on_type(CollisionType::Wall, |_grid, _entity| Ok(Some(CollisionResolution::Die)))
//!     .on_movement(|_grid, entity| {
//!         // Ghosts never move.
//!         Ok((entity.underlying() == &Some('g')).then_some(CollisionResolution::Stay))
//!     });
//!
//! assert!(handlers.has_type_handler(CollisionType::Wall));
//! assert!(!handlers.has_type_handler(CollisionType::Solid));
//! ```

use std::fmt;
use std::sync::Arc;

use gridly::{Grid, Location};

use crate::entity::{
    CollisionResolution, CollisionSet, CollisionType, Entity, EntityId, ResolutionTable,
};
use crate::error::{HandlerError, MovementError};

/// What an entity handler returns.
pub type HandlerResult = Result<Option<CollisionResolution>, HandlerError>;

/// Callback deciding one entity's resolution.
pub type EntityHandler<G> =
    Arc<dyn Fn(&G, &Entity<<G as Grid>::Item>) -> HandlerResult + Send + Sync>;

/// Callback deciding a group collision.
pub type GroupHandler<G> = Arc<
    dyn Fn(&G, &GroupCollision<'_, <G as Grid>::Item>) -> Result<GroupVerdict, HandlerError>
        + Send
        + Sync,
>;

// =============================================================================
// Group collisions
// =============================================================================

/// Two or more entities want to enter the same cell.
#[derive(Debug)]
pub struct GroupCollision<'a, T> {
    /// The contested cell.
    pub destination: Location,
    /// The unresolved contenders, in ascending row-major order of their
    /// starting cells.
    pub contenders: Vec<&'a Entity<T>>,
    /// The batch entity starting at the destination, if any. It has already
    /// been resolved and leaves the cell.
    pub occupant: Option<&'a Entity<T>>,
}

/// Decisions returned by a group handler.
///
/// At most one contender may be told to [`Move`](CollisionResolution::Move).
/// Contenders the verdict leaves out are classified `entity` and go through
/// the regular handlers, where moving is not allowed.
///
/// ```
/// use gridly_movement::{CollisionResolution, EntityId, GroupVerdict};
///
/// let verdict = GroupVerdict::winner(EntityId::new(3)).with(EntityId::new(5), CollisionResolution::Die);
/// assert_eq!(verdict.decisions().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupVerdict {
    decisions: Vec<(EntityId, CollisionResolution)>,
}

impl GroupVerdict {
    /// No decisions: every contender stays, or whatever its handlers choose
    /// short of moving.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    /// Let `id` enter the destination.
    #[must_use]
    pub fn winner(id: EntityId) -> Self {
        Self::none().with(id, CollisionResolution::Move)
    }

    /// Add a decision for one contender.
    #[must_use]
    pub fn with(mut self, id: EntityId, resolution: CollisionResolution) -> Self {
        self.decisions.push((id, resolution));
        self
    }

    /// The decisions in the order they were added.
    #[must_use]
    pub fn decisions(&self) -> &[(EntityId, CollisionResolution)] {
        &self.decisions
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Registry of client callbacks.
pub struct Handlers<G: Grid> {
    non_moving: Option<EntityHandler<G>>,
    none: Option<EntityHandler<G>>,
    wall: Option<EntityHandler<G>>,
    solid: Option<EntityHandler<G>>,
    entity: Option<EntityHandler<G>>,
    collision: Option<EntityHandler<G>>,
    movement: Option<EntityHandler<G>>,
    group: Option<GroupHandler<G>>,
}

impl<G: Grid> Handlers<G> {
    /// An empty registry: every decision comes from the resolution table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            non_moving: None,
            none: None,
            wall: None,
            solid: None,
            entity: None,
            collision: None,
            movement: None,
            group: None,
        }
    }

    /// Register `handler` for every type in `types`, replacing any handler
    /// already registered for them.
    pub fn on_type<F>(&mut self, types: impl Into<CollisionSet>, handler: F) -> &mut Self
    where
        F: Fn(&G, &Entity<G::Item>) -> HandlerResult + Send + Sync + 'static,
    {
        let handler: EntityHandler<G> = Arc::new(handler);
        for collision in types.into().types() {
            if let Some(slot) = self.slot_mut(collision) {
                *slot = Some(Arc::clone(&handler));
            }
        }
        self
    }

    /// Register the generic collision handler, consulted for `wall`, `solid`
    /// and `entity` collisions after the per-type handler.
    pub fn on_collision<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&G, &Entity<G::Item>) -> HandlerResult + Send + Sync + 'static,
    {
        self.collision = Some(Arc::new(handler));
        self
    }

    /// Register the generic movement handler, consulted for every entity
    /// that no more specific handler decided.
    pub fn on_movement<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&G, &Entity<G::Item>) -> HandlerResult + Send + Sync + 'static,
    {
        self.movement = Some(Arc::new(handler));
        self
    }

    /// Register the group collision handler.
    ///
    /// Without one, no contender of a group collision may move.
    pub fn on_group<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&G, &GroupCollision<'_, G::Item>) -> Result<GroupVerdict, HandlerError>
            + Send
            + Sync
            + 'static,
    {
        self.group = Some(Arc::new(handler));
        self
    }

    /// Returns true if a per-type handler is registered for `collision`.
    #[must_use]
    pub fn has_type_handler(&self, collision: CollisionType) -> bool {
        self.slot(collision).is_some_and(Option::is_some)
    }

    fn slot(&self, collision: CollisionType) -> Option<&Option<EntityHandler<G>>> {
        match collision {
            CollisionType::Unknown | CollisionType::Pending => None,
            CollisionType::NonMoving => Some(&self.non_moving),
            CollisionType::None => Some(&self.none),
            CollisionType::Wall => Some(&self.wall),
            CollisionType::Solid => Some(&self.solid),
            CollisionType::Entity => Some(&self.entity),
        }
    }

    fn slot_mut(&mut self, collision: CollisionType) -> Option<&mut Option<EntityHandler<G>>> {
        match collision {
            CollisionType::Unknown | CollisionType::Pending => None,
            CollisionType::NonMoving => Some(&mut self.non_moving),
            CollisionType::None => Some(&mut self.none),
            CollisionType::Wall => Some(&mut self.wall),
            CollisionType::Solid => Some(&mut self.solid),
            CollisionType::Entity => Some(&mut self.entity),
        }
    }

    /// Decide the resolution of a classified entity.
    ///
    /// # Errors
    ///
    /// - [`MovementError::Unclassified`] if the entity is unknown or pending
    /// - [`MovementError::Handler`] if a callback fails
    /// - [`MovementError::IllegalResolution`] if the answer moves a blocked
    ///   entity
    pub(crate) fn dispatch(
        &self,
        grid: &G,
        entity: &Entity<G::Item>,
        defaults: &ResolutionTable,
    ) -> Result<CollisionResolution, MovementError> {
        let collision = entity.collision();
        let Some(typed) = self.slot(collision) else {
            return Err(MovementError::Unclassified {
                location: entity.location(),
            });
        };
        let collision_handler = if collision.is_collision() {
            self.collision.as_ref()
        } else {
            None
        };

        let mut decided = None;
        for handler in [typed.as_ref(), collision_handler, self.movement.as_ref()]
            .into_iter()
            .flatten()
        {
            decided = handler(grid, entity).map_err(|source| MovementError::Handler {
                location: entity.location(),
                source,
            })?;
            if decided.is_some() {
                break;
            }
        }

        let Some(resolution) = decided.or_else(|| defaults.get(collision)) else {
            return Err(MovementError::Unclassified {
                location: entity.location(),
            });
        };
        if resolution == CollisionResolution::Move && collision.is_collision() {
            return Err(MovementError::IllegalResolution {
                location: entity.location(),
                collision,
                resolution,
            });
        }
        Ok(resolution)
    }

    /// Ask the group handler for a verdict; no handler means no decisions.
    pub(crate) fn decide_group(
        &self,
        grid: &G,
        group: &GroupCollision<'_, G::Item>,
    ) -> Result<GroupVerdict, MovementError> {
        match &self.group {
            Some(handler) => handler(grid, group).map_err(|source| MovementError::Handler {
                location: group.destination,
                source,
            }),
            None => Ok(GroupVerdict::none()),
        }
    }
}

impl<G: Grid> Default for Handlers<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Grid> Clone for Handlers<G> {
    fn clone(&self) -> Self {
        Self {
            non_moving: self.non_moving.clone(),
            none: self.none.clone(),
            wall: self.wall.clone(),
            solid: self.solid.clone(),
            entity: self.entity.clone(),
            collision: self.collision.clone(),
            movement: self.movement.clone(),
            group: self.group.clone(),
        }
    }
}

impl<G: Grid> fmt::Debug for Handlers<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let registered: Vec<_> = CollisionType::TERMINAL
            .into_iter()
            .filter(|collision| self.has_type_handler(*collision))
            .collect();
        f.debug_struct("Handlers")
            .field("types", &registered)
            .field("collision", &self.collision.is_some())
            .field("movement", &self.movement.is_some())
            .field("group", &self.group.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::EntityArena;
    use gridly::{DenseGrid, Dimensions, Direction};
    use std::sync::atomic::{AtomicUsize, Ordering};

    type TestGrid = DenseGrid<Option<char>>;

    fn classified(collision: CollisionType) -> (TestGrid, Entity<Option<char>>) {
        let grid: TestGrid = DenseGrid::new(Dimensions::new(2, 2));
        let arena = EntityArena::from_batch(&grid, [(Location::new(0, 0), Direction::Right)]).unwrap();
        let mut entity = arena[EntityId::new(0)].clone();
        entity.classify(collision).unwrap();
        (grid, entity)
    }

    #[test]
    fn falls_back_to_table() {
        let handlers: Handlers<TestGrid> = Handlers::new();
        for collision in CollisionType::TERMINAL {
            let (grid, entity) = classified(collision);
            let resolution = handlers
                .dispatch(&grid, &entity, &ResolutionTable::DEFAULT)
                .unwrap();
            assert_eq!(Some(resolution), ResolutionTable::DEFAULT.get(collision));
        }
    }

    #[test]
    fn most_specific_handler_wins() {
        let mut handlers: Handlers<TestGrid> = Handlers::new();
        handlers
            .on_type(CollisionType::Solid, |_, _| Ok(Some(CollisionResolution::Die)))
            .on_collision(|_, _| Ok(Some(CollisionResolution::Stay)))
            .on_movement(|_, _| Ok(Some(CollisionResolution::Move)));

        let dispatch = |collision| {
            let (grid, entity) = classified(collision);
            handlers.dispatch(&grid, &entity, &ResolutionTable::DEFAULT)
        };
        assert_eq!(dispatch(CollisionType::Solid).unwrap(), CollisionResolution::Die);
        assert_eq!(dispatch(CollisionType::Wall).unwrap(), CollisionResolution::Stay);
        assert_eq!(dispatch(CollisionType::None).unwrap(), CollisionResolution::Move);
    }

    #[test]
    fn deferring_handlers_are_all_consulted() {
        let calls = Arc::new(AtomicUsize::new(0));
        let mut handlers: Handlers<TestGrid> = Handlers::new();
        let typed = Arc::clone(&calls);
        let generic = Arc::clone(&calls);
        let movement = Arc::clone(&calls);
        handlers
            .on_type(CollisionSet::all(), move |_, _| {
                typed.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            })
            .on_collision(move |_, _| {
                generic.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            })
            .on_movement(move |_, _| {
                movement.fetch_add(1, Ordering::SeqCst);
                Ok(None)
            });

        let (grid, entity) = classified(CollisionType::Entity);
        let resolution = handlers
            .dispatch(&grid, &entity, &ResolutionTable::DEFAULT)
            .unwrap();
        assert_eq!(resolution, CollisionResolution::Stay);
        assert_eq!(calls.load(Ordering::SeqCst), 3);

        // The generic collision handler is skipped for unobstructed moves.
        let (grid, entity) = classified(CollisionType::None);
        handlers
            .dispatch(&grid, &entity, &ResolutionTable::DEFAULT)
            .unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn moving_into_a_collision_is_illegal() {
        let mut handlers: Handlers<TestGrid> = Handlers::new();
        handlers.on_movement(|_, _| Ok(Some(CollisionResolution::Move)));

        let (grid, entity) = classified(CollisionType::Wall);
        let err = handlers
            .dispatch(&grid, &entity, &ResolutionTable::DEFAULT)
            .unwrap_err();
        assert!(matches!(
            err,
            MovementError::IllegalResolution {
                collision: CollisionType::Wall,
                resolution: CollisionResolution::Move,
                ..
            }
        ));
    }

    #[test]
    fn pending_entities_cannot_be_dispatched() {
        let handlers: Handlers<TestGrid> = Handlers::new();
        let (grid, entity) = classified(CollisionType::Pending);
        let err = handlers
            .dispatch(&grid, &entity, &ResolutionTable::DEFAULT)
            .unwrap_err();
        assert!(matches!(err, MovementError::Unclassified { .. }));
    }

    #[test]
    fn handler_errors_are_wrapped() {
        let mut handlers: Handlers<TestGrid> = Handlers::new();
        handlers.on_type(CollisionType::None, |_, _| Err("no fuel".into()));

        let (grid, entity) = classified(CollisionType::None);
        let err = handlers
            .dispatch(&grid, &entity, &ResolutionTable::DEFAULT)
            .unwrap_err();
        match err {
            MovementError::Handler { location, source } => {
                assert_eq!(location, Location::new(0, 0));
                assert_eq!(source.to_string(), "no fuel");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn debug_lists_registered_handlers() {
        let mut handlers: Handlers<TestGrid> = Handlers::new();
        handlers.on_type(CollisionSet::COLLISIONS, |_, _| Ok(None));
        let text = format!("{handlers:?}");
        assert!(text.contains("Wall"));
        assert!(text.contains("movement: false"));
    }
}
