//! Collision classification from grid and batch facts.

use gridly::{Grid, Location};

use crate::arena::EntityArena;
use crate::cell::Cell;
use crate::entity::{CollisionType, EntityId};

/// Outcome of classifying one unresolved entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Classification {
    /// The collision type is final.
    Terminal(CollisionType),
    /// The destination's occupant has no resolution yet.
    WaitOn(EntityId),
    /// Two or more unresolved entities want the same enterable cell.
    Contested(Location),
}

/// Classify entity `id` against the grid and the current resolutions.
///
/// Reads only; the caller records the result. Checks, in order: no move,
/// destination outside the grid, destination held by a batch entity,
/// destination held by other content, destination claimed or contested.
pub(crate) fn classify<G>(grid: &G, arena: &EntityArena<G::Item>, id: EntityId) -> Classification
where
    G: Grid,
    G::Item: Cell,
{
    let entity = &arena[id];
    if !entity.is_moving() {
        return Classification::Terminal(CollisionType::NonMoving);
    }

    let Some(destination) = entity.desired_location() else {
        return Classification::Terminal(CollisionType::Wall);
    };
    let Ok(content) = grid.get(destination) else {
        return Classification::Terminal(CollisionType::Wall);
    };

    let mut vacated = false;
    if let Some(occupant) = arena.id_at(destination) {
        let occupant = &arena[occupant];
        if !occupant.is_resolved() {
            return Classification::WaitOn(occupant.id());
        }
        if !occupant.vacates() {
            return Classification::Terminal(CollisionType::Entity);
        }
        vacated = true;
    }

    if !vacated && !content.is_empty() {
        return Classification::Terminal(CollisionType::Solid);
    }

    let mut unresolved = 0;
    for &other in arena.contenders(destination) {
        let other = &arena[other];
        if other.displaces() {
            return Classification::Terminal(CollisionType::Entity);
        }
        if !other.is_resolved() {
            unresolved += 1;
        }
    }
    if unresolved > 1 {
        Classification::Contested(destination)
    } else {
        Classification::Terminal(CollisionType::None)
    }
}
