//! Error types for the movement engine.
//!
//! Every fallible operation returns [`MovementError`]. Errors fall into five
//! groups:
//!
//! - **Configuration errors**: a [`ResolutionTable`](crate::ResolutionTable)
//!   entry that lets a blocked entity move
//! - **Input errors**, raised while the batch is read and before any handler
//!   runs: [`DuplicateLocation`](MovementError::DuplicateLocation),
//!   [`OutOfBounds`](MovementError::OutOfBounds),
//!   [`BatchTooLarge`](MovementError::BatchTooLarge)
//! - **Policy violations**, raised while resolving: a group verdict or handler
//!   result that cannot be committed without two entities sharing a cell
//! - **Handler failures**: an error returned by client code, kept as `source`
//! - **Engine defects**: internal consistency checks that should never fire
//!
//! Any error aborts the tick before the grid is touched.

use gridly::{GridError, Location};

use crate::entity::{CollisionResolution, CollisionType, EntityId};

/// Error type returned by client handlers.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while resolving or committing a tick.
#[derive(Debug, thiserror::Error)]
pub enum MovementError {
    /// Two proposals start from the same cell.
    #[error("more than one proposal starts at {location}")]
    DuplicateLocation {
        /// The shared starting cell.
        location: Location,
    },

    /// A proposal starts outside the grid.
    #[error("proposal starts outside the grid at {location}")]
    OutOfBounds {
        /// The rejected starting cell.
        location: Location,
    },

    /// A resolution table entry lets a blocked entity move.
    #[error("default resolution {resolution} is not allowed for {collision} collisions")]
    IllegalDefault {
        /// The blocking collision type.
        collision: CollisionType,
        /// The rejected resolution.
        resolution: CollisionResolution,
    },

    /// The batch has more proposals than there are entity ids.
    #[error("batch of {len} proposals exceeds the entity id space")]
    BatchTooLarge {
        /// Number of distinct proposals.
        len: usize,
    },

    /// A group verdict let more than one contender move.
    #[error("{count} contenders for {destination} were resolved to move")]
    MultipleWinners {
        /// The contested destination.
        destination: Location,
        /// Number of contenders resolved to move.
        count: usize,
    },

    /// A resolution was assigned twice to the same entity.
    #[error("entity at {location} already has a resolution")]
    ResolutionAlreadySet {
        /// The entity's starting cell.
        location: Location,
    },

    /// A group verdict named an entity that is not contending for the cell.
    #[error("group verdict for {destination} names {id}, which is not a contender")]
    UnknownContender {
        /// The contested destination.
        destination: Location,
        /// The entity named by the verdict.
        id: EntityId,
    },

    /// A handler asked a blocked entity to move.
    #[error("{resolution} is not allowed for a {collision} collision at {location}")]
    IllegalResolution {
        /// The entity's starting cell.
        location: Location,
        /// The entity's collision type.
        collision: CollisionType,
        /// The rejected resolution.
        resolution: CollisionResolution,
    },

    /// A rotation member moves into a cell whose occupant stays.
    #[error("rotation broken: entity at {location} moves into {blocked_by}, which stays occupied")]
    BrokenRotation {
        /// The moving member's starting cell.
        location: Location,
        /// The cell that is not vacated.
        blocked_by: Location,
    },

    /// A client handler returned an error.
    #[error("handler failed for entity at {location}")]
    Handler {
        /// The starting cell of the entity being handled.
        location: Location,
        /// The error returned by the handler.
        #[source]
        source: HandlerError,
    },

    /// A move cannot be committed because its destination is occupied.
    #[error("cannot commit move from {from} to {to}: destination is occupied")]
    ResolutionConflict {
        /// The mover's starting cell.
        from: Location,
        /// The occupied destination.
        to: Location,
    },

    /// A final collision type was overwritten.
    #[error("entity at {location} cannot be reclassified from {from} to {to}")]
    Reclassified {
        /// The entity's starting cell.
        location: Location,
        /// The existing classification.
        from: CollisionType,
        /// The rejected classification.
        to: CollisionType,
    },

    /// An entity reached dispatch without a final collision type.
    #[error("entity at {location} has no final collision type")]
    Unclassified {
        /// The entity's starting cell.
        location: Location,
    },

    /// An entity reached commit without a resolution.
    #[error("entity at {location} has no resolution")]
    Unresolved {
        /// The entity's starting cell.
        location: Location,
    },

    /// Grid access failed.
    #[error(transparent)]
    Grid(#[from] GridError),
}

impl MovementError {
    /// Returns true for errors caused by the submitted batch itself.
    #[must_use]
    pub const fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::DuplicateLocation { .. } | Self::OutOfBounds { .. } | Self::BatchTooLarge { .. }
        )
    }

    /// Returns true for errors raised because a handler or verdict broke a
    /// resolution rule.
    #[must_use]
    pub const fn is_policy_violation(&self) -> bool {
        matches!(
            self,
            Self::MultipleWinners { .. }
                | Self::ResolutionAlreadySet { .. }
                | Self::UnknownContender { .. }
                | Self::IllegalResolution { .. }
                | Self::BrokenRotation { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, thiserror::Error)]
    #[error("out of fuel")]
    struct OutOfFuel;

    #[test]
    fn handler_errors_keep_their_source() {
        let err = MovementError::Handler {
            location: Location::new(1, 1),
            source: Box::new(OutOfFuel),
        };
        let source = std::error::Error::source(&err).unwrap();
        assert!(source.downcast_ref::<OutOfFuel>().is_some());
        assert_eq!(err.to_string(), "handler failed for entity at (1, 1)");
    }

    #[test]
    fn error_groups() {
        let input = MovementError::DuplicateLocation {
            location: Location::zero(),
        };
        assert!(input.is_input_error());
        assert!(!input.is_policy_violation());

        let policy = MovementError::MultipleWinners {
            destination: Location::zero(),
            count: 2,
        };
        assert!(policy.is_policy_violation());
        assert_eq!(
            policy.to_string(),
            "2 contenders for (0, 0) were resolved to move"
        );

        let too_many = MovementError::BatchTooLarge { len: usize::MAX };
        assert!(too_many.is_input_error());

        let config = MovementError::IllegalDefault {
            collision: CollisionType::Entity,
            resolution: CollisionResolution::Move,
        };
        assert!(!config.is_input_error());
        assert!(!config.is_policy_violation());
        assert_eq!(
            config.to_string(),
            "default resolution move is not allowed for entity collisions"
        );
    }
}
