//! Dependency resolution for one tick.
//!
//! The resolver turns an [`EntityArena`] of unresolved proposals into one in
//! which every entity has a final [`CollisionType`] and a
//! [`CollisionResolution`]. It never touches the grid; applying the result is
//! the job of the committer in `commit.rs`.
//!
//! # Dependency graph
//!
//! Entity A depends on entity B when A wants to enter B's starting cell. Every
//! entity wants exactly one cell, so the graph is functional: following the
//! edges from any entity either ends at an entity that can be classified on
//! its own, or loops back into a rotation.
//!
//! # Traversal
//!
//! Roots are visited in id order, which is row-major order of the starting
//! cells. From each unresolved root the resolver walks the edges with an
//! explicit stack:
//!
//! 1. The top entity is classified.
//! 2. If its destination's occupant is unresolved and not on the stack, the
//!    top is marked pending and the occupant is pushed.
//! 3. If the occupant is already on the stack, the stack segment from the
//!    occupant to the top is a rotation and is resolved as a unit.
//! 4. Otherwise the classification is final: the entity is dispatched to the
//!    handlers (or, for a shared destination, the whole group is resolved)
//!    and popped.
//!
//! A waiting entity is only classified again once its occupant is resolved,
//! so every handler runs after everything its entity depends on.
//!
//! # Invariants
//!
//! - Each entity gets exactly one terminal classification
//! - Each entity is dispatched at most once
//! - The resolver never reads or writes the grid mutably

mod classify;
mod commit;
mod group;

pub(crate) use commit::commit;

use gridly::Grid;
use tracing::{debug, trace};

use crate::arena::EntityArena;
use crate::cell::Cell;
use crate::engine::EngineConfig;
use crate::entity::{CollisionResolution, CollisionType, EntityId};
use crate::error::MovementError;
use crate::handler::Handlers;

use classify::{classify, Classification};

/// Resolves every entity of one tick.
pub(crate) struct DependencyResolver<'a, G: Grid> {
    grid: &'a G,
    arena: EntityArena<G::Item>,
    handlers: &'a Handlers<G>,
    config: &'a EngineConfig,
    /// Stack position of each entity currently on the traversal stack.
    on_stack: Vec<Option<usize>>,
}

impl<'a, G> DependencyResolver<'a, G>
where
    G: Grid,
    G::Item: Cell,
{
    pub(crate) fn new(
        grid: &'a G,
        arena: EntityArena<G::Item>,
        handlers: &'a Handlers<G>,
        config: &'a EngineConfig,
    ) -> Self {
        let on_stack = vec![None; arena.len()];
        Self {
            grid,
            arena,
            handlers,
            config,
            on_stack,
        }
    }

    /// Resolve every entity and return the arena.
    pub(crate) fn resolve_all(mut self) -> Result<EntityArena<G::Item>, MovementError> {
        let ids: Vec<EntityId> = self.arena.ids().collect();
        for id in ids {
            if !self.arena[id].is_resolved() {
                self.resolve_from(id)?;
            }
        }
        Ok(self.arena)
    }

    fn resolve_from(&mut self, root: EntityId) -> Result<(), MovementError> {
        let mut stack = vec![root];
        self.on_stack[root.index()] = Some(0);

        while let Some(&top) = stack.last() {
            if self.arena[top].is_resolved() {
                stack.pop();
                self.on_stack[top.index()] = None;
                continue;
            }

            match classify(self.grid, &self.arena, top) {
                Classification::Terminal(collision) => self.settle(top, collision)?,
                Classification::Contested(destination) => self.resolve_group(destination)?,
                Classification::WaitOn(occupant) => {
                    if let Some(position) = self.on_stack[occupant.index()] {
                        let cycle = stack[position..].to_vec();
                        self.resolve_rotation(&cycle)?;
                    } else {
                        trace!(entity = %top, waits_on = %occupant, "pending");
                        self.arena.get_mut(top).classify(CollisionType::Pending)?;
                        self.on_stack[occupant.index()] = Some(stack.len());
                        stack.push(occupant);
                    }
                }
            }
        }
        Ok(())
    }

    /// Record a final classification and dispatch the entity to the handlers.
    fn settle(&mut self, id: EntityId, collision: CollisionType) -> Result<(), MovementError> {
        self.arena.get_mut(id).classify(collision)?;
        let resolution =
            self.handlers
                .dispatch(self.grid, &self.arena[id], &self.config.defaults)?;
        self.apply(id, resolution)
    }

    fn apply(&mut self, id: EntityId, resolution: CollisionResolution) -> Result<(), MovementError> {
        let entity = self.arena.get_mut(id);
        trace!(
            entity = %id,
            location = %entity.location(),
            collision = %entity.collision(),
            %resolution,
            "resolved"
        );
        entity.resolve(resolution)
    }

    /// Resolve a rotation: members in stack order, each wanting the next
    /// member's cell and the last wanting the first member's cell.
    fn resolve_rotation(&mut self, cycle: &[EntityId]) -> Result<(), MovementError> {
        let mut members = cycle.to_vec();
        members.sort_unstable();

        if members.len() == 2 && !self.config.allow_swaps {
            debug!(first = %members[0], second = %members[1], "swap refused");
            for id in members {
                self.settle(id, CollisionType::Entity)?;
            }
            return Ok(());
        }

        debug!(members = members.len(), "rotation");
        for &id in &members {
            self.arena.get_mut(id).classify(CollisionType::None)?;
        }
        for &id in &members {
            let resolution =
                self.handlers
                    .dispatch(self.grid, &self.arena[id], &self.config.defaults)?;
            self.apply(id, resolution)?;
        }

        for &id in &members {
            let member = &self.arena[id];
            let Some(target) = member.target() else {
                continue;
            };
            let next_vacates = self
                .arena
                .at_location(target)
                .is_some_and(|next| next.vacates());
            if !next_vacates {
                return Err(MovementError::BrokenRotation {
                    location: member.location(),
                    blocked_by: target,
                });
            }
        }
        Ok(())
    }
}
