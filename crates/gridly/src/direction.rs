//! Directions, displacements and single-step movements.
//!
//! A [`Displacement`] is a relative offset in rows and columns, stored as a
//! [`glam::IVec2`] with `x` holding the column delta and `y` the row delta.
//! A [`Movement`] is what an entity proposes for one tick: stay put, take one
//! step in a [`Direction`], or jump by an arbitrary displacement.

use std::fmt;

use glam::IVec2;
use serde::{Deserialize, Serialize};

/// The four cardinal directions.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Towards row 0
    Up,
    /// Away from row 0
    Down,
    /// Towards column 0
    Left,
    /// Away from column 0
    Right,
}

impl Direction {
    /// All directions, in declaration order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// The unit displacement for one step in this direction.
    #[must_use]
    pub const fn displacement(self) -> Displacement {
        match self {
            Self::Up => Displacement::new(-1, 0),
            Self::Down => Displacement::new(1, 0),
            Self::Left => Displacement::new(0, -1),
            Self::Right => Displacement::new(0, 1),
        }
    }

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Up => write!(f, "up"),
            Self::Down => write!(f, "down"),
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

/// A direction is a path of one step.
impl AsRef<[Direction]> for Direction {
    fn as_ref(&self) -> &[Direction] {
        std::slice::from_ref(self)
    }
}

/// Relative offset between two locations.
///
/// # Example
///
/// ```
/// use gridly::{Direction, Displacement};
///
/// let d = Displacement::new(2, -1);
/// assert_eq!(d.rows(), 2);
/// assert_eq!(d.columns(), -1);
/// assert_eq!(Direction::Up.displacement() + Direction::Up.displacement(), Displacement::new(-2, 0));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Displacement(IVec2);

impl Displacement {
    /// No offset.
    pub const ZERO: Self = Self(IVec2::ZERO);

    /// Create a displacement from a row delta and a column delta.
    #[must_use]
    pub const fn new(rows: i32, columns: i32) -> Self {
        Self(IVec2::new(columns, rows))
    }

    /// Row delta.
    #[must_use]
    pub const fn rows(self) -> i32 {
        self.0.y
    }

    /// Column delta.
    #[must_use]
    pub const fn columns(self) -> i32 {
        self.0.x
    }

    /// Check if this displacement does not move anything.
    #[must_use]
    pub fn is_zero(self) -> bool {
        self.0 == IVec2::ZERO
    }

    /// Manhattan length of the displacement.
    #[must_use]
    pub fn manhattan(self) -> u32 {
        self.0.x.unsigned_abs() + self.0.y.unsigned_abs()
    }

    /// Underlying vector (`x` = columns, `y` = rows).
    #[must_use]
    pub const fn as_ivec2(self) -> IVec2 {
        self.0
    }
}

impl fmt::Debug for Displacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Displacement({}, {})", self.rows(), self.columns())
    }
}

impl std::ops::Add for Displacement {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl std::ops::Neg for Displacement {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl From<Direction> for Displacement {
    fn from(direction: Direction) -> Self {
        direction.displacement()
    }
}

/// A single proposed movement for one tick.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Movement {
    /// Stay on the current cell
    #[default]
    Stay,
    /// One step in a direction
    Step(Direction),
    /// An arbitrary relative jump
    Offset(Displacement),
}

impl Movement {
    /// The displacement this movement applies.
    #[must_use]
    pub const fn displacement(self) -> Displacement {
        match self {
            Self::Stay => Displacement::ZERO,
            Self::Step(direction) => direction.displacement(),
            Self::Offset(offset) => offset,
        }
    }
}

impl From<Direction> for Movement {
    fn from(direction: Direction) -> Self {
        Self::Step(direction)
    }
}

impl From<Displacement> for Movement {
    fn from(offset: Displacement) -> Self {
        Self::Offset(offset)
    }
}

impl From<Option<Direction>> for Movement {
    fn from(direction: Option<Direction>) -> Self {
        direction.map_or(Self::Stay, Self::Step)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_displacements() {
        assert_eq!(Direction::Up.displacement(), Displacement::new(-1, 0));
        assert_eq!(Direction::Down.displacement(), Displacement::new(1, 0));
        assert_eq!(Direction::Left.displacement(), Displacement::new(0, -1));
        assert_eq!(Direction::Right.displacement(), Displacement::new(0, 1));
        for direction in Direction::ALL {
            assert_eq!(direction.displacement().manhattan(), 1);
            assert_eq!(
                direction.displacement() + direction.opposite().displacement(),
                Displacement::ZERO
            );
        }
    }

    #[test]
    fn test_movement_conversions() {
        assert_eq!(Movement::from(Direction::Left), Movement::Step(Direction::Left));
        assert_eq!(Movement::from(None::<Direction>), Movement::Stay);
        assert!(Movement::Stay.displacement().is_zero());
        assert_eq!(
            Movement::from(Displacement::new(3, 4)).displacement().manhattan(),
            7
        );
    }

    #[test]
    fn test_displacement_axes() {
        let d = Displacement::new(5, -2);
        assert_eq!(d.as_ivec2(), IVec2::new(-2, 5));
        assert_eq!(-d, Displacement::new(-5, 2));
    }
}
