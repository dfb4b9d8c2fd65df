//! Applying a resolved tick to the grid.

use std::collections::BTreeSet;

use gridly::Grid;
use tracing::{debug, warn};

use crate::arena::EntityArena;
use crate::cell::Cell;
use crate::error::MovementError;
use crate::report::TickReport;

/// Apply every resolution in `arena` to `grid`.
///
/// The whole tick is validated before the first cell is written, so an error
/// leaves the grid untouched. Mutation happens in two row-major passes: every
/// vacating entity is lifted off its starting cell, then every mover is
/// placed at its destination.
pub(crate) fn commit<G>(grid: &mut G, arena: &EntityArena<G::Item>) -> Result<TickReport, MovementError>
where
    G: Grid,
    G::Item: Cell,
{
    validate(grid, arena)?;

    let mut carried = Vec::new();
    for entity in arena.iter().filter(|entity| entity.vacates()) {
        let content = grid.replace(entity.location(), G::Item::empty())?;
        if let Some(target) = entity.target() {
            carried.push((target, content));
        }
    }
    let moved = carried.len();
    for (destination, content) in carried {
        grid.set(destination, content)?;
    }

    let report = TickReport::from_arena(arena);
    debug!(
        entities = report.len(),
        moved,
        died = report.died(),
        "tick committed"
    );
    Ok(report)
}

fn validate<G>(grid: &G, arena: &EntityArena<G::Item>) -> Result<(), MovementError>
where
    G: Grid,
    G::Item: Cell,
{
    let mut claimed = BTreeSet::new();
    for entity in arena.iter() {
        if !entity.is_resolved() {
            return Err(MovementError::Unresolved {
                location: entity.location(),
            });
        }
        let Some(to) = entity.target() else {
            continue;
        };
        let from = entity.location();
        let free = match arena.at_location(to) {
            Some(occupant) => occupant.vacates(),
            None => grid.get(to).is_ok_and(|cell| cell.is_empty()),
        };
        if !free || !claimed.insert(to) {
            warn!(%from, %to, "commit conflict");
            return Err(MovementError::ResolutionConflict { from, to });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{CollisionResolution, CollisionType, EntityId};
    use gridly::{DenseGrid, Dimensions, Direction, Location};

    type TestGrid = DenseGrid<Option<char>>;

    fn two_in_a_row() -> (TestGrid, EntityArena<Option<char>>) {
        let mut grid: TestGrid = DenseGrid::new(Dimensions::new(1, 3));
        grid.set(Location::new(0, 0), Some('a')).unwrap();
        grid.set(Location::new(0, 1), Some('b')).unwrap();
        let arena = EntityArena::from_batch(
            &grid,
            [
                (Location::new(0, 0), Direction::Right),
                (Location::new(0, 1), Direction::Right),
            ],
        )
        .unwrap();
        (grid, arena)
    }

    fn resolve(arena: &mut EntityArena<Option<char>>, id: u32, resolution: CollisionResolution) {
        let entity = arena.get_mut(EntityId::new(id));
        entity.classify(CollisionType::None).unwrap();
        entity.resolve(resolution).unwrap();
    }

    #[test]
    fn chain_moves_together() {
        let (mut grid, mut arena) = two_in_a_row();
        resolve(&mut arena, 0, CollisionResolution::Move);
        resolve(&mut arena, 1, CollisionResolution::Move);

        let report = commit(&mut grid, &arena).unwrap();
        assert_eq!(grid.as_slice(), &[None, Some('a'), Some('b')]);
        assert_eq!(report.moved(), 2);
    }

    #[test]
    fn moving_into_a_staying_entity_is_rejected() {
        let (mut grid, mut arena) = two_in_a_row();
        resolve(&mut arena, 0, CollisionResolution::Move);
        resolve(&mut arena, 1, CollisionResolution::Stay);

        let before = grid.clone();
        let err = commit(&mut grid, &arena).unwrap_err();
        assert!(matches!(
            err,
            MovementError::ResolutionConflict { from, to }
                if from == Location::new(0, 0) && to == Location::new(0, 1)
        ));
        assert_eq!(grid, before);
    }

    #[test]
    fn dying_clears_the_cell() {
        let (mut grid, mut arena) = two_in_a_row();
        resolve(&mut arena, 0, CollisionResolution::Move);
        resolve(&mut arena, 1, CollisionResolution::Die);

        commit(&mut grid, &arena).unwrap();
        assert_eq!(grid.as_slice(), &[None, Some('a'), None]);
    }

    #[test]
    fn unresolved_entities_are_rejected() {
        let (mut grid, mut arena) = two_in_a_row();
        resolve(&mut arena, 1, CollisionResolution::Move);

        let err = commit(&mut grid, &arena).unwrap_err();
        assert!(matches!(err, MovementError::Unresolved { .. }));
        assert_eq!(grid.as_slice(), &[Some('a'), Some('b'), None]);
    }
}
