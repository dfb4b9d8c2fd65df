//! Cell contract consumed by the engine.

/// Content of a grid cell as seen by the movement engine.
///
/// The engine needs to know whether a destination holds anything, and it
/// needs an empty value to leave behind when an occupant moves away or dies.
///
/// # Example
///
/// ```
/// use gridly_movement::Cell;
///
/// let rock: Option<char> = Some('#');
/// assert!(!rock.is_empty());
/// assert!(Option::<char>::empty().is_empty());
/// ```
pub trait Cell: Clone {
    /// Returns true if nothing occupies the cell.
    fn is_empty(&self) -> bool;

    /// The value left behind in a vacated cell.
    #[must_use]
    fn empty() -> Self;
}

impl<T: Clone> Cell for Option<T> {
    fn is_empty(&self) -> bool {
        self.is_none()
    }

    fn empty() -> Self {
        None
    }
}
