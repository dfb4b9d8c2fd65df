//! Collision classification and resolution types.
//!
//! - [`CollisionType`]: why (or whether) an entity cannot freely move
//! - [`CollisionResolution`]: the final outcome chosen for an entity
//! - [`CollisionSet`]: a set of terminal collision types, used when
//!   registering one handler for several types
//! - [`ResolutionTable`]: the fallback resolution for each terminal type

use std::fmt;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::error::MovementError;

/// Classification of an entity's movement for the current tick.
///
/// Every entity starts as [`Unknown`](Self::Unknown). It may become
/// [`Pending`](Self::Pending) while it waits on the entity occupying its
/// destination, and then moves to exactly one terminal classification. A
/// terminal classification never changes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionType {
    /// Not classified yet.
    #[default]
    Unknown,
    /// Waiting on the entity that occupies the destination.
    Pending,
    /// The entity does not want to move.
    NonMoving,
    /// Nothing blocks the move.
    None,
    /// The destination is outside the grid.
    Wall,
    /// The destination holds content that is not a moving entity.
    Solid,
    /// The destination is held by an entity that stays, or another contender.
    Entity,
}

impl CollisionType {
    /// The five classifications an entity can end the tick with.
    pub const TERMINAL: [Self; 5] = [
        Self::NonMoving,
        Self::None,
        Self::Wall,
        Self::Solid,
        Self::Entity,
    ];

    /// Returns true once the classification can no longer change.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Unknown | Self::Pending)
    }

    /// Returns true for the types that block a move: wall, solid and entity.
    #[must_use]
    pub const fn is_collision(self) -> bool {
        matches!(self, Self::Wall | Self::Solid | Self::Entity)
    }

    /// The flag for this type; empty for non-terminal types.
    #[must_use]
    pub const fn flag(self) -> CollisionSet {
        match self {
            Self::Unknown | Self::Pending => CollisionSet::empty(),
            Self::NonMoving => CollisionSet::NON_MOVING,
            Self::None => CollisionSet::NONE,
            Self::Wall => CollisionSet::WALL,
            Self::Solid => CollisionSet::SOLID,
            Self::Entity => CollisionSet::ENTITY,
        }
    }
}

impl fmt::Display for CollisionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::Pending => "pending",
            Self::NonMoving => "non_moving",
            Self::None => "none",
            Self::Wall => "wall",
            Self::Solid => "solid",
            Self::Entity => "entity",
        };
        f.write_str(name)
    }
}

/// Final outcome of an entity for the tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionResolution {
    /// Keep the current cell.
    Stay,
    /// Enter the desired cell.
    Move,
    /// Leave the grid; the current cell becomes empty.
    Die,
}

impl fmt::Display for CollisionResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stay => write!(f, "stay"),
            Self::Move => write!(f, "move"),
            Self::Die => write!(f, "die"),
        }
    }
}

bitflags! {
    /// A set of terminal collision types.
    ///
    /// ```
    /// use gridly_movement::{CollisionSet, CollisionType};
    ///
    /// let blocked = CollisionSet::COLLISIONS;
    /// assert!(blocked.contains(CollisionType::Wall.into()));
    /// assert!(!blocked.contains(CollisionType::None.into()));
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct CollisionSet: u8 {
        /// [`CollisionType::NonMoving`].
        const NON_MOVING = 1 << 0;
        /// [`CollisionType::None`].
        const NONE = 1 << 1;
        /// [`CollisionType::Wall`].
        const WALL = 1 << 2;
        /// [`CollisionType::Solid`].
        const SOLID = 1 << 3;
        /// [`CollisionType::Entity`].
        const ENTITY = 1 << 4;
        /// Types routed through the generic collision handler.
        const COLLISIONS = Self::WALL.bits() | Self::SOLID.bits() | Self::ENTITY.bits();
        /// Types for which the entity keeps its cell by default.
        const BLOCKED = Self::NON_MOVING.bits() | Self::COLLISIONS.bits();
    }
}

impl CollisionSet {
    /// The terminal types in this set, in declaration order.
    pub fn types(self) -> impl Iterator<Item = CollisionType> {
        CollisionType::TERMINAL
            .into_iter()
            .filter(move |collision| self.contains(collision.flag()))
    }
}

impl From<CollisionType> for CollisionSet {
    fn from(collision: CollisionType) -> Self {
        collision.flag()
    }
}

/// Fallback resolution for each terminal collision type.
///
/// The table is an immutable value: [`ResolutionTable::DEFAULT`] is a
/// constant, and [`with`](Self::with) returns a modified copy. A table never
/// lets a wall, solid or entity collision move; `with` and deserialization
/// both reject such entries.
///
/// # Example
///
/// ```
/// use gridly_movement::{CollisionResolution, CollisionType, ResolutionTable};
///
/// let table = ResolutionTable::DEFAULT
///     .with(CollisionType::Wall, CollisionResolution::Die)
///     .unwrap();
/// assert_eq!(table.get(CollisionType::Wall), Some(CollisionResolution::Die));
/// assert_eq!(table.get(CollisionType::None), Some(CollisionResolution::Move));
/// assert_eq!(table.get(CollisionType::Pending), None);
///
/// assert!(table.with(CollisionType::Solid, CollisionResolution::Move).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "TableEntries")]
pub struct ResolutionTable {
    non_moving: CollisionResolution,
    none: CollisionResolution,
    wall: CollisionResolution,
    solid: CollisionResolution,
    entity: CollisionResolution,
}

impl ResolutionTable {
    /// Stay unless the way is clear.
    pub const DEFAULT: Self = Self {
        non_moving: CollisionResolution::Stay,
        none: CollisionResolution::Move,
        wall: CollisionResolution::Stay,
        solid: CollisionResolution::Stay,
        entity: CollisionResolution::Stay,
    };

    /// The resolution for `collision`, or `None` for non-terminal types.
    #[must_use]
    pub const fn get(&self, collision: CollisionType) -> Option<CollisionResolution> {
        match collision {
            CollisionType::Unknown | CollisionType::Pending => None,
            CollisionType::NonMoving => Some(self.non_moving),
            CollisionType::None => Some(self.none),
            CollisionType::Wall => Some(self.wall),
            CollisionType::Solid => Some(self.solid),
            CollisionType::Entity => Some(self.entity),
        }
    }

    /// A copy of the table with the entry for `collision` replaced.
    ///
    /// Non-terminal types have no entry and leave the table unchanged.
    ///
    /// # Errors
    ///
    /// [`MovementError::IllegalDefault`] if `resolution` is
    /// [`Move`](CollisionResolution::Move) for a blocking collision.
    pub fn with(
        mut self,
        collision: CollisionType,
        resolution: CollisionResolution,
    ) -> Result<Self, MovementError> {
        check_entry(collision, resolution)?;
        match collision {
            CollisionType::Unknown | CollisionType::Pending => {}
            CollisionType::NonMoving => self.non_moving = resolution,
            CollisionType::None => self.none = resolution,
            CollisionType::Wall => self.wall = resolution,
            CollisionType::Solid => self.solid = resolution,
            CollisionType::Entity => self.entity = resolution,
        }
        Ok(self)
    }

    /// Check every entry.
    ///
    /// # Errors
    ///
    /// [`MovementError::IllegalDefault`] for the first blocking collision
    /// type whose entry is [`Move`](CollisionResolution::Move).
    pub fn validate(&self) -> Result<(), MovementError> {
        for collision in CollisionType::TERMINAL {
            if let Some(resolution) = self.get(collision) {
                check_entry(collision, resolution)?;
            }
        }
        Ok(())
    }
}

impl Default for ResolutionTable {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn check_entry(collision: CollisionType, resolution: CollisionResolution) -> Result<(), MovementError> {
    if collision.is_collision() && resolution == CollisionResolution::Move {
        return Err(MovementError::IllegalDefault {
            collision,
            resolution,
        });
    }
    Ok(())
}

/// Serialized form of a [`ResolutionTable`], checked on the way in.
#[derive(Deserialize)]
struct TableEntries {
    non_moving: CollisionResolution,
    none: CollisionResolution,
    wall: CollisionResolution,
    solid: CollisionResolution,
    entity: CollisionResolution,
}

impl TryFrom<TableEntries> for ResolutionTable {
    type Error = MovementError;

    fn try_from(entries: TableEntries) -> Result<Self, MovementError> {
        let table = Self {
            non_moving: entries.non_moving,
            none: entries.none,
            wall: entries.wall,
            solid: entries.solid,
            entity: entries.entity,
        };
        table.validate()?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_only_moves_when_clear() {
        for collision in CollisionType::TERMINAL {
            let expected = if collision == CollisionType::None {
                CollisionResolution::Move
            } else {
                CollisionResolution::Stay
            };
            assert_eq!(ResolutionTable::DEFAULT.get(collision), Some(expected));
        }
    }

    #[test]
    fn with_ignores_non_terminal_types() {
        let table = ResolutionTable::DEFAULT
            .with(CollisionType::Pending, CollisionResolution::Die)
            .unwrap();
        assert_eq!(table, ResolutionTable::DEFAULT);
    }

    #[test]
    fn with_rejects_moving_through_collisions() {
        for collision in [CollisionType::Wall, CollisionType::Solid, CollisionType::Entity] {
            let err = ResolutionTable::DEFAULT
                .with(collision, CollisionResolution::Move)
                .unwrap_err();
            assert!(matches!(
                err,
                MovementError::IllegalDefault { collision: c, resolution: CollisionResolution::Move }
                    if c == collision
            ));
        }
        let table = ResolutionTable::DEFAULT
            .with(CollisionType::NonMoving, CollisionResolution::Move)
            .unwrap();
        assert!(table.validate().is_ok());
    }

    #[test]
    fn deserialized_tables_are_checked() {
        let json = serde_json::to_string(&ResolutionTable::DEFAULT).unwrap();
        let back: ResolutionTable = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ResolutionTable::DEFAULT);

        let bad = r#"{"non_moving":"stay","none":"move","wall":"move","solid":"stay","entity":"stay"}"#;
        let err = serde_json::from_str::<ResolutionTable>(bad).unwrap_err();
        assert!(err.to_string().contains("wall"), "{err}");
    }

    #[test]
    fn terminal_and_collision_types() {
        assert!(!CollisionType::Unknown.is_terminal());
        assert!(!CollisionType::Pending.is_terminal());
        assert!(CollisionType::TERMINAL.iter().all(|c| c.is_terminal()));

        let collisions: Vec<_> = CollisionSet::COLLISIONS.types().collect();
        assert_eq!(
            collisions,
            vec![CollisionType::Wall, CollisionType::Solid, CollisionType::Entity]
        );
        assert!(collisions.iter().all(|c| c.is_collision()));
    }

    #[test]
    fn blocked_set_excludes_none() {
        let blocked: Vec<_> = CollisionSet::BLOCKED.types().collect();
        assert_eq!(blocked.len(), 4);
        assert!(!blocked.contains(&CollisionType::None));
        assert!(CollisionType::Pending.flag().is_empty());
    }

    #[test]
    fn display_uses_snake_case() {
        assert_eq!(CollisionType::NonMoving.to_string(), "non_moving");
        assert_eq!(CollisionResolution::Die.to_string(), "die");

        let json = serde_json::to_string(&CollisionType::NonMoving).unwrap();
        assert_eq!(json, "\"non_moving\"");
    }
}
