//! Row/column locations.
//!
//! A [`Location`] addresses one cell of a grid. `+row` is down and `+column` is
//! right, so [`Location::above`] decreases the row. Locations order row-major
//! (by row, then by column), which is the tie-break order used everywhere a
//! deterministic iteration order over cells is needed.

use std::fmt;
use std::ops::{Add, Sub};

use serde::{Deserialize, Serialize};

use crate::direction::{Direction, Displacement, Movement};

/// A location in a 2D row-column space.
///
/// # Example
///
/// ```
/// use gridly::{Direction, Location};
///
/// let loc = Location::new(2, 3);
/// assert_eq!(loc.above(1), Location::new(1, 3));
/// assert_eq!(loc.relative(Direction::Left, 2), Location::new(2, 1));
/// assert!(Location::new(0, 9) < Location::new(1, 0));
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Location {
    /// Row index (increases downwards)
    pub row: i32,
    /// Column index (increases to the right)
    pub column: i32,
}

impl Location {
    /// Create a location from a row and a column.
    #[must_use]
    pub const fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// The `(0, 0)` location.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0, 0)
    }

    /// The location `distance` rows above this one.
    #[must_use]
    pub const fn above(self, distance: i32) -> Self {
        Self::new(self.row - distance, self.column)
    }

    /// The location `distance` rows below this one.
    #[must_use]
    pub const fn below(self, distance: i32) -> Self {
        Self::new(self.row + distance, self.column)
    }

    /// The location `distance` columns to the left of this one.
    #[must_use]
    pub const fn left(self, distance: i32) -> Self {
        Self::new(self.row, self.column - distance)
    }

    /// The location `distance` columns to the right of this one.
    #[must_use]
    pub const fn right(self, distance: i32) -> Self {
        Self::new(self.row, self.column + distance)
    }

    /// The location in `direction`, at `distance` steps.
    #[must_use]
    pub const fn relative(self, direction: Direction, distance: i32) -> Self {
        match direction {
            Direction::Up => self.above(distance),
            Direction::Down => self.below(distance),
            Direction::Left => self.left(distance),
            Direction::Right => self.right(distance),
        }
    }

    /// Follow each direction in sequence and return the final location.
    ///
    /// ```
    /// use gridly::{Direction, Location};
    ///
    /// let end = Location::zero().path([Direction::Down, Direction::Right, Direction::Down]);
    /// assert_eq!(end, Location::new(2, 1));
    /// ```
    #[must_use]
    pub fn path<I>(self, directions: I) -> Self
    where
        I: IntoIterator<Item = Direction>,
    {
        directions
            .into_iter()
            .fold(self, |loc, direction| loc.relative(direction, 1))
    }

    /// Apply a single movement (a direction or an arbitrary displacement).
    ///
    /// Returns `None` if the result does not fit in `i32` coordinates.
    ///
    /// ```
    /// use gridly::{Direction, Displacement, Location, Movement};
    ///
    /// let loc = Location::new(1, 1);
    /// assert_eq!(loc.apply(Direction::Up.into()), Some(Location::new(0, 1)));
    /// assert_eq!(loc.apply(Movement::Offset(Displacement::new(0, i32::MAX))), None);
    /// ```
    #[must_use]
    pub fn apply(self, movement: Movement) -> Option<Self> {
        self.checked_add(movement.displacement())
    }

    /// `self + displacement`, or `None` on overflow.
    #[must_use]
    pub fn checked_add(self, displacement: Displacement) -> Option<Self> {
        Some(Self::new(
            self.row.checked_add(displacement.rows())?,
            self.column.checked_add(displacement.columns())?,
        ))
    }

    /// The location at the end of each path, in order.
    ///
    /// A path is a sequence of directions; a single [`Direction`] is a path
    /// of one step.
    ///
    /// ```
    /// use gridly::{Direction, Location};
    ///
    /// let loc = Location::new(1, 1);
    /// let ends: Vec<_> = loc
    ///     .each_at([&[Direction::Up][..], &[Direction::Left], &[Direction::Right, Direction::Down]])
    ///     .collect();
    /// assert_eq!(ends, [Location::new(0, 1), Location::new(1, 0), Location::new(2, 2)]);
    ///
    /// assert_eq!(loc.each_at(Direction::ALL).count(), 4);
    /// ```
    pub fn each_at<I>(self, paths: I) -> impl Iterator<Item = Self>
    where
        I: IntoIterator,
        I::Item: AsRef<[Direction]>,
    {
        paths
            .into_iter()
            .map(move |path| self.path(path.as_ref().iter().copied()))
    }

    /// The 4 orthogonally adjacent locations, in [`Direction::ALL`] order.
    #[must_use]
    pub fn adjacent(self) -> [Self; 4] {
        Direction::ALL.map(|direction| self.relative(direction, 1))
    }

    /// The 4 diagonally adjacent locations, row-major.
    #[must_use]
    pub fn diagonals(self) -> [Self; 4] {
        [
            self.above(1).left(1),
            self.above(1).right(1),
            self.below(1).left(1),
            self.below(1).right(1),
        ]
    }

    /// The 8 surrounding locations: adjacent first, then diagonals.
    pub fn surrounding(self) -> impl Iterator<Item = Self> {
        self.adjacent().into_iter().chain(self.diagonals())
    }

    /// Displacement from `other` to `self`.
    #[must_use]
    pub fn displacement_from(self, other: Self) -> Displacement {
        Displacement::new(self.row - other.row, self.column - other.column)
    }
}

impl fmt::Debug for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Location({}, {})", self.row, self.column)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

impl From<(i32, i32)> for Location {
    fn from((row, column): (i32, i32)) -> Self {
        Self::new(row, column)
    }
}

impl Add for Location {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.row + rhs.row, self.column + rhs.column)
    }
}

impl Sub for Location {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.row - rhs.row, self.column - rhs.column)
    }
}

impl Add<Displacement> for Location {
    type Output = Self;

    fn add(self, rhs: Displacement) -> Self {
        Self::new(self.row + rhs.rows(), self.column + rhs.columns())
    }
}

impl Add<Direction> for Location {
    type Output = Self;

    fn add(self, rhs: Direction) -> Self {
        self.relative(rhs, 1)
    }
}
