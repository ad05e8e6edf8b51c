//! End-to-end scenarios against the bundled default catalog and policy.
//!
//! Each test seeds a deterministic RNG and runs a full `plan` at
//! `iterations = 100_000`, the volume under which the statistical claims
//! below are expected to hold.

use rand::rngs::StdRng;
use rand::SeedableRng;
use wh_config::{default_catalog, Policy};
use wh_core::{action_results, observe, plan, trip_distribution, Observation};

const ITERATIONS: u64 = 100_000;

fn run(total_min: f64, total_max: f64, mass_used: f64, seed: u64) -> wh_core::Tree {
    let catalog = default_catalog();
    let policy = Policy::default();
    let mut rng = StdRng::seed_from_u64(seed);
    plan(&catalog, &policy, total_min, total_max, mass_used, ITERATIONS, &mut rng).unwrap()
}

#[test]
fn s1_fresh_hole_top_action_is_a_battleship() {
    let catalog = default_catalog();
    let tree = run(1800.0, 2200.0, 0.0, 1);
    let results = action_results(&tree, &catalog);
    let top = results.first().expect("at least one explored action");
    assert!(top.key.starts_with("BS_"), "top key was {}", top.key);
    assert!(top.success_rate > 0.85, "success_rate was {}", top.success_rate);

    let dist = trip_distribution(&tree, 0.01);
    let mode = dist
        .iter()
        .max_by(|a, b| a.pct.partial_cmp(&b.pct).unwrap())
        .expect("non-empty trip distribution");
    assert!((3..=7).contains(&mode.trips), "modal trip count was {}", mode.trips);
}

#[test]
fn s2_bs_cold_hot_avg_steps_on_fresh() {
    let catalog = default_catalog();
    let tree = run(1800.0, 2200.0, 0.0, 2);
    let results = action_results(&tree, &catalog);
    let bs_cold_hot = results
        .iter()
        .find(|r| r.key == "BS_COLD_HOT")
        .expect("BS_COLD_HOT explored at the root");
    assert!(
        (3.0..=7.0).contains(&bs_cold_hot.avg_steps),
        "avg_steps was {}",
        bs_cold_hot.avg_steps
    );
}

#[test]
fn s3_partially_used_top_action_is_a_battleship() {
    let catalog = default_catalog();
    let tree = run(1800.0, 2200.0, 1000.0, 3);
    let results = action_results(&tree, &catalog);
    let top = results.first().expect("at least one explored action");
    assert!(top.key.starts_with("BS_"), "top key was {}", top.key);

    let best_bs = results
        .iter()
        .filter(|r| r.key.starts_with("BS_"))
        .min_by(|a, b| a.avg_steps.partial_cmp(&b.avg_steps).unwrap())
        .expect("a BS_ action explored");
    assert!(
        (1.0..=5.0).contains(&best_bs.avg_steps),
        "avg_steps was {}",
        best_bs.avg_steps
    );
}

#[test]
fn s4_observation_correctness() {
    const SHRINK: f64 = 0.50;
    const CRIT: f64 = 0.10;
    assert_eq!(observe(2000.0, 500.0, SHRINK, CRIT), Observation::Fresh);
    assert_eq!(observe(2000.0, 1200.0, SHRINK, CRIT), Observation::Shrink);
    assert_eq!(observe(2000.0, 1850.0, SHRINK, CRIT), Observation::Crit);
    assert_eq!(observe(2000.0, 2000.0, SHRINK, CRIT), Observation::Collapsed);
    assert_eq!(observe(2000.0, 2100.0, SHRINK, CRIT), Observation::Collapsed);
}

#[test]
fn s5_rollout_risk_visible_for_hic_hot() {
    let catalog = default_catalog();
    let tree = run(100.0, 200.0, 0.0, 5);
    let results = action_results(&tree, &catalog);
    let hic = results
        .iter()
        .find(|r| r.key == "HIC_HOT")
        .expect("HIC_HOT explored at the root");
    assert!(
        hic.success_rate > 0.5 && hic.success_rate < 0.95,
        "success_rate was {}",
        hic.success_rate
    );
}

#[test]
fn s6_narrow_range_bias_correction_for_hic_hot() {
    let catalog = default_catalog();
    let tree = run(200.0, 600.0, 0.0, 6);
    let results = action_results(&tree, &catalog);
    let hic = results
        .iter()
        .find(|r| r.key == "HIC_HOT")
        .expect("HIC_HOT explored at the root");
    assert!(
        hic.avg_steps > 1.3 && hic.avg_steps < 3.0,
        "avg_steps was {}",
        hic.avg_steps
    );
}
