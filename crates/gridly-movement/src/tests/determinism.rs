//! Determinism verification tests.
//!
//! A tick must depend only on the starting grid, the set of proposals and
//! the handlers. These tests replay seeded random scenarios and compare the
//! resulting grids by hash and the reports by their serialized form.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use gridly::{hash_grid, Dimensions, Location};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::engine::MovementEngine;
use crate::entity::CollisionResolution;
use crate::handler::{GroupCollision, GroupVerdict};
use crate::report::TickReport;

use super::helpers::{init_tracing, random_scenario, NumberGrid, Scenario};

const SEEDS: [u64; 6] = [0, 1, 7, 42, 1234, 0xDEAD_BEEF];

fn run(engine: &MovementEngine<NumberGrid>, scenario: &Scenario) -> (u64, TickReport) {
    let mut grid = scenario.grid.clone();
    let report = engine
        .resolve(&mut grid, scenario.batch.iter().copied())
        .unwrap_or_else(|e| panic!("tick failed: {e}"));
    (hash_grid(&grid), report)
}

/// An engine with a group handler that picks the lowest content and kills
/// even-numbered losers, so group outcomes vary.
fn busy_engine() -> MovementEngine<NumberGrid> {
    let mut engine: MovementEngine<NumberGrid> = MovementEngine::new();
    engine.handlers_mut().on_group(|_, group: &GroupCollision<'_, Option<u32>>| {
        let Some(winner) = group
            .contenders
            .iter()
            .min_by_key(|entity| entity.underlying().unwrap_or(u32::MAX))
        else {
            return Ok(GroupVerdict::none());
        };
        let mut verdict = GroupVerdict::winner(winner.id());
        for loser in group.contenders.iter().filter(|entity| entity.id() != winner.id()) {
            if loser.underlying().is_some_and(|n| n % 2 == 0) {
                verdict = verdict.with(loser.id(), CollisionResolution::Die);
            }
        }
        Ok(verdict)
    });
    engine
}

#[test]
fn same_scenario_same_result() {
    init_tracing();
    let engine = busy_engine();
    for seed in SEEDS {
        let scenario = random_scenario(seed, Dimensions::new(12, 12));
        let (hash_a, report_a) = run(&engine, &scenario);
        let (hash_b, report_b) = run(&engine, &scenario);

        assert_eq!(hash_a, hash_b, "grid differs for seed {seed}");
        assert_eq!(
            serde_json::to_string(&report_a).unwrap(),
            serde_json::to_string(&report_b).unwrap(),
            "report differs for seed {seed}"
        );
    }
}

#[test]
fn submission_order_does_not_matter() {
    let engine = busy_engine();
    for seed in SEEDS {
        let scenario = random_scenario(seed, Dimensions::new(10, 14));
        let (expected_hash, expected_report) = run(&engine, &scenario);

        let mut shuffled = scenario.clone();
        shuffled
            .batch
            .shuffle(&mut ChaCha8Rng::seed_from_u64(seed.wrapping_add(1)));
        let (hash, report) = run(&engine, &shuffled);

        assert_eq!(hash, expected_hash, "grid differs for seed {seed}");
        assert_eq!(report, expected_report, "report differs for seed {seed}");
    }
}

#[test]
fn handlers_run_once_per_entity() {
    for seed in SEEDS {
        let scenario = random_scenario(seed, Dimensions::new(16, 16));
        let calls: Arc<Mutex<BTreeMap<Location, usize>>> = Arc::default();
        let sink = Arc::clone(&calls);

        let mut engine: MovementEngine<NumberGrid> = MovementEngine::new();
        engine.handlers_mut().on_movement(move |_, entity| {
            *sink.lock().unwrap().entry(entity.location()).or_default() += 1;
            Ok(None)
        });
        let (_, report) = run(&engine, &scenario);

        let calls = calls.lock().unwrap();
        assert_eq!(calls.len(), report.len(), "seed {seed}");
        assert!(calls.values().all(|&count| count == 1), "seed {seed}");
    }
}

#[test]
fn different_scenarios_diverge() {
    let engine = busy_engine();
    let a = random_scenario(3, Dimensions::new(12, 12));
    let b = random_scenario(4, Dimensions::new(12, 12));
    assert_ne!(run(&engine, &a).0, run(&engine, &b).0);
}
