//! Group collisions: several entities want the same enterable cell.

use std::collections::BTreeSet;

use gridly::{Grid, Location};
use tracing::debug;

use super::DependencyResolver;
use crate::cell::Cell;
use crate::entity::{CollisionResolution, CollisionType, EntityId};
use crate::error::MovementError;
use crate::handler::{GroupCollision, GroupVerdict};

impl<G> DependencyResolver<'_, G>
where
    G: Grid,
    G::Item: Cell,
{
    /// Resolve every unresolved contender for `destination`.
    ///
    /// The group handler's verdict is validated in full before any contender
    /// is resolved.
    pub(super) fn resolve_group(&mut self, destination: Location) -> Result<(), MovementError> {
        let contenders: Vec<EntityId> = self
            .arena
            .contenders(destination)
            .iter()
            .copied()
            .filter(|&id| !self.arena[id].is_resolved())
            .collect();

        let verdict = {
            let group = GroupCollision {
                destination,
                contenders: contenders.iter().map(|&id| &self.arena[id]).collect(),
                occupant: self.arena.at_location(destination),
            };
            self.handlers.decide_group(self.grid, &group)?
        };
        debug!(
            %destination,
            contenders = contenders.len(),
            decisions = verdict.decisions().len(),
            "group collision"
        );

        self.validate_verdict(destination, &contenders, &verdict)?;

        let mut decided = BTreeSet::new();
        for &(id, resolution) in verdict.decisions() {
            let collision = if resolution == CollisionResolution::Move {
                CollisionType::None
            } else {
                CollisionType::Entity
            };
            self.arena.get_mut(id).classify(collision)?;
            self.apply(id, resolution)?;
            decided.insert(id);
        }

        for id in contenders {
            if !decided.contains(&id) {
                self.settle(id, CollisionType::Entity)?;
            }
        }
        Ok(())
    }

    fn validate_verdict(
        &self,
        destination: Location,
        contenders: &[EntityId],
        verdict: &GroupVerdict,
    ) -> Result<(), MovementError> {
        let mut seen = BTreeSet::new();
        let mut winners = 0;
        for &(id, resolution) in verdict.decisions() {
            if contenders.binary_search(&id).is_err() {
                return Err(MovementError::UnknownContender { destination, id });
            }
            if !seen.insert(id) {
                return Err(MovementError::ResolutionAlreadySet {
                    location: self.arena[id].location(),
                });
            }
            if resolution == CollisionResolution::Move {
                winners += 1;
            }
        }
        if winners > 1 {
            return Err(MovementError::MultipleWinners {
                destination,
                count: winners,
            });
        }
        Ok(())
    }
}
