//! Scenario tests for the movement engine.
//!
//! - `integration.rs`: end-to-end ticks on small hand-drawn grids
//! - `determinism.rs`: seeded random ticks replayed and compared
//! - `properties.rs`: proptest invariants over random ticks
//! - `helpers.rs`: grid builders, random scenarios and tracing setup

mod determinism;
mod helpers;

pub use helpers::*;
