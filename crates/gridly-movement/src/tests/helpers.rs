//! Test helpers for building grids and batches.
//!
//! Hand-drawn grids use one character per cell: `.` is empty, anything else
//! is content. Random scenarios use numbered cells so every entity's content
//! is unique and can be tracked through a tick.

use gridly::{DenseGrid, Dimensions, Direction, Displacement, Grid, Location, Movement};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Grid of glyphs, `None` for empty cells.
pub type CharGrid = DenseGrid<Option<char>>;

/// Grid of numbered content, `None` for empty cells.
pub type NumberGrid = DenseGrid<Option<u32>>;

/// Content used for immovable rocks in random scenarios.
pub const ROCK: u32 = u32::MAX;

// =============================================================================
// Hand-drawn grids
// =============================================================================

/// Shorthand for `Location::new`.
pub fn loc(row: i32, column: i32) -> Location {
    Location::new(row, column)
}

/// Build a grid from rows of glyphs.
///
/// # Panics
///
/// Panics if the rows have different lengths.
pub fn grid_from(rows: &[&str]) -> CharGrid {
    let columns = rows.first().map_or(0, |row| row.chars().count());
    assert!(
        rows.iter().all(|row| row.chars().count() == columns),
        "ragged grid: {rows:?}"
    );
    let content = rows
        .iter()
        .flat_map(|row| row.chars())
        .map(|glyph| (glyph != '.').then_some(glyph))
        .collect();
    let dims = Dimensions::new(
        u32::try_from(rows.len()).unwrap(),
        u32::try_from(columns).unwrap(),
    );
    DenseGrid::from_vec(dims, content).unwrap()
}

/// Render a grid back into rows of glyphs.
pub fn render(grid: &CharGrid) -> Vec<String> {
    (0..grid.num_rows())
        .map(|row| {
            grid.row(i32::try_from(row).unwrap())
                .unwrap()
                .map(|cell| cell.unwrap_or('.'))
                .collect()
        })
        .collect()
}

/// The location of the only cell holding `glyph`.
///
/// # Panics
///
/// Panics if the glyph is missing.
pub fn find(grid: &CharGrid, glyph: char) -> Location {
    grid.cells()
        .find(|(_, cell)| **cell == Some(glyph))
        .map(|(location, _)| location)
        .unwrap_or_else(|| panic!("glyph {glyph:?} not in grid"))
}

/// A one-step move from the cell holding `glyph`.
pub fn step(grid: &CharGrid, glyph: char, direction: Direction) -> (Location, Movement) {
    (find(grid, glyph), Movement::Step(direction))
}

/// A relative jump from the cell holding `glyph`.
pub fn jump(grid: &CharGrid, glyph: char, rows: i32, columns: i32) -> (Location, Movement) {
    (
        find(grid, glyph),
        Movement::Offset(Displacement::new(rows, columns)),
    )
}

// =============================================================================
// Random scenarios
// =============================================================================

/// A grid and a batch that moves every numbered entity on it.
#[derive(Debug, Clone)]
pub struct Scenario {
    /// Starting grid.
    pub grid: NumberGrid,
    /// One proposal per entity, in row-major order.
    pub batch: Vec<(Location, Movement)>,
}

/// Build a random scenario from a seed.
///
/// Roughly 40% of cells hold entities and 10% hold rocks. Entities stay,
/// step in a random direction, or occasionally jump diagonally so that
/// rotations of three appear.
pub fn random_scenario(seed: u64, dims: Dimensions) -> Scenario {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut grid: NumberGrid = DenseGrid::new(dims);
    let mut batch = Vec::new();
    let mut next_id = 1;

    for location in dims.locations() {
        let roll: f64 = rng.gen();
        if roll < 0.4 {
            grid.set(location, Some(next_id)).unwrap();
            next_id += 1;
            batch.push((location, random_movement(&mut rng)));
        } else if roll < 0.5 {
            grid.set(location, Some(ROCK)).unwrap();
        }
    }

    Scenario { grid, batch }
}

fn random_movement(rng: &mut ChaCha8Rng) -> Movement {
    match rng.gen_range(0..10) {
        0 => Movement::Stay,
        1 => Movement::Offset(Displacement::new(
            if rng.gen() { 1 } else { -1 },
            if rng.gen() { 1 } else { -1 },
        )),
        _ => Movement::Step(Direction::ALL[rng.gen_range(0..4)]),
    }
}

// =============================================================================
// Logging
// =============================================================================

/// Route `tracing` output to the test harness; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
}
