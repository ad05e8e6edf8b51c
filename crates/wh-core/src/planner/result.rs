//! Result extraction: aggregating root children into ranked recommendations.

use serde::{Deserialize, Serialize};
use wh_config::Catalog;

use crate::planner::node::Tree;

/// One action's aggregated statistics and bias-corrected recommendation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub key: String,
    pub label: String,
    pub mass: f64,
    pub visits: u64,
    pub wins: f64,
    pub successes: u64,
    pub success_rate: f64,
    pub strategy_score: f64,
    pub avg_steps: f64,
    pub guaranteed_safe: bool,
}

/// One bucket of the trip-count distribution.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TripBucket {
    pub trips: u32,
    pub pct: f64,
}

/// Fraction of the root remaining-belief interval in which `out` is
/// survivable. See §4.4: degenerate (zero-width) intervals return 1 when
/// `out <= min`.
fn p_safe_outbound(remaining_min: f64, remaining_max: f64, out: f64) -> f64 {
    let width = remaining_max - remaining_min;
    if width <= 0.0 || out <= remaining_min {
        1.0
    } else {
        (remaining_max - out).max(0.0) / width
    }
}

/// Aggregate the root's children into a ranked list of action recommendations.
pub fn action_results(tree: &Tree, catalog: &Catalog) -> Vec<ActionResult> {
    let root = tree.get(tree.root_id());
    let remaining = root.remaining_belief();

    let mut results: Vec<ActionResult> = root
        .explored_action_keys()
        .filter_map(|key| {
            let action = catalog.get(key)?;
            let stats = root.action_stats(tree, key);
            if stats.visits == 0 {
                return None;
            }

            let observed_success_rate = stats.successes as f64 / stats.visits as f64;
            let observed_score = stats.wins / stats.visits as f64;

            let trip_sum = trip_weighted_total(tree, root, key);
            let observed_avg_steps = if stats.successes > 0 {
                trip_sum / stats.successes as f64
            } else {
                0.0
            };

            let p_safe = p_safe_outbound(remaining.min, remaining.max, action.mass_out);
            let success_rate = p_safe * observed_success_rate;
            let strategy_score = p_safe * observed_score;

            let valid_range = remaining.max - action.mass_out;
            let one_trip_range = (remaining.max - action.mass_out).min(action.mass_back);
            let p_one_trip = if valid_range <= 0.0 {
                0.0
            } else {
                one_trip_range / valid_range
            };

            let avg_steps = if p_one_trip < 0.95 && observed_avg_steps < 1.5 {
                1.0 * p_one_trip + 2.0 * (1.0 - p_one_trip)
            } else {
                observed_avg_steps
            };

            let guaranteed_safe = remaining.min > action.mass_out;

            Some(ActionResult {
                key: key.to_string(),
                label: action.label.clone(),
                mass: action.round_trip_mass(),
                visits: stats.visits,
                wins: stats.wins,
                successes: stats.successes,
                success_rate,
                strategy_score,
                avg_steps,
                guaranteed_safe,
            })
        })
        .collect();

    results.sort_by(|a, b| {
        b.strategy_score
            .partial_cmp(&a.strategy_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.avg_steps.partial_cmp(&b.avg_steps).unwrap_or(std::cmp::Ordering::Equal))
            .then_with(|| a.key.cmp(&b.key))
    });

    results
}

fn trip_weighted_total(tree: &Tree, root: &crate::planner::node::Node, key: &str) -> f64 {
    let mut total = 0.0;
    for obs in crate::belief::Observation::ALL {
        if let Some(child_id) = root.get_child(key, obs) {
            let child = tree.get(child_id);
            for (&trips, &count) in &child.terminal_trips {
                total += trips as f64 * count as f64;
            }
        }
    }
    total
}

/// Normalize the root's terminal-trip histogram, dropping low-probability
/// buckets, sorted ascending by trip count.
pub fn trip_distribution(tree: &Tree, min_bucket_probability: f64) -> Vec<TripBucket> {
    let root = tree.get(tree.root_id());
    if root.wins <= 0.0 {
        return Vec::new();
    }

    let mut buckets: Vec<TripBucket> = root
        .terminal_trips
        .iter()
        .map(|(&trips, &count)| TripBucket {
            trips,
            pct: count as f64 / root.wins,
        })
        .filter(|b| b.pct >= min_bucket_probability)
        .collect();

    buckets.sort_by_key(|b| b.trips);
    buckets
}

/// Single top recommendation: the action key with the highest aggregated
/// visit count.
pub fn best_action(tree: &Tree, catalog: &Catalog) -> Option<ActionResult> {
    let results = action_results(tree, catalog);
    results
        .into_iter()
        .max_by_key(|r| r.visits)
}

/// Greedily descend the most-visited child at each level, concatenating
/// action keys, until no children remain.
pub fn sequence(tree: &Tree) -> Vec<String> {
    let mut keys = Vec::new();
    let mut node = tree.get(tree.root_id());

    loop {
        let mut best_key: Option<&str> = None;
        let mut best_visits = 0u64;
        for key in node.explored_action_keys() {
            let stats = node.action_stats(tree, key);
            if stats.visits > best_visits {
                best_visits = stats.visits;
                best_key = Some(key);
            }
        }

        let Some(key) = best_key else { break };

        let mut best_obs = None;
        let mut best_obs_visits = 0u64;
        for obs in crate::belief::Observation::ALL {
            if let Some(child_id) = node.get_child(key, obs) {
                let child = tree.get(child_id);
                if child.visits >= best_obs_visits {
                    best_obs_visits = child.visits;
                    best_obs = Some(child_id);
                }
            }
        }

        keys.push(key.to_string());
        match best_obs {
            Some(child_id) => node = tree.get(child_id),
            None => break,
        }
    }

    keys
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::planner::search::plan;
    use rand::{rngs::StdRng, SeedableRng};
    use wh_config::{default_catalog, Policy};

    #[test]
    fn p_safe_outbound_is_one_when_guaranteed_safe() {
        assert_eq!(p_safe_outbound(100.0, 200.0, 50.0), 1.0);
    }

    #[test]
    fn p_safe_outbound_zero_width_interval() {
        assert_eq!(p_safe_outbound(100.0, 100.0, 50.0), 1.0);
        assert_eq!(p_safe_outbound(100.0, 100.0, 150.0), 1.0);
    }

    #[test]
    fn p_safe_outbound_partial_risk() {
        let p = p_safe_outbound(100.0, 200.0, 134.0);
        assert!(p > 0.0 && p < 1.0);
    }

    #[test]
    fn guaranteed_safe_implies_success_rate_matches_observed() {
        let catalog = default_catalog();
        let policy = Policy::default();
        let mut rng = StdRng::seed_from_u64(123);
        let tree = plan(&catalog, &policy, 1800.0, 2200.0, 0.0, 5000, &mut rng).unwrap();
        let results = action_results(&tree, &catalog);
        for r in &results {
            if r.guaranteed_safe {
                let root = tree.get(tree.root_id());
                let stats = root.action_stats(&tree, &r.key);
                let observed = stats.successes as f64 / stats.visits as f64;
                assert!((r.success_rate - observed).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn ranking_is_descending_strategy_score() {
        let catalog = default_catalog();
        let policy = Policy::default();
        let mut rng = StdRng::seed_from_u64(55);
        let tree = plan(&catalog, &policy, 1800.0, 2200.0, 0.0, 5000, &mut rng).unwrap();
        let results = action_results(&tree, &catalog);
        for pair in results.windows(2) {
            assert!(pair[0].strategy_score >= pair[1].strategy_score - 1e-12);
        }
    }

    #[test]
    fn trip_distribution_sorted_ascending_and_normalized() {
        let catalog = default_catalog();
        let policy = Policy::default();
        let mut rng = StdRng::seed_from_u64(77);
        let tree = plan(&catalog, &policy, 1800.0, 2200.0, 0.0, 20_000, &mut rng).unwrap();
        let dist = trip_distribution(&tree, policy.min_bucket_probability);
        for pair in dist.windows(2) {
            assert!(pair[0].trips < pair[1].trips);
        }
        for bucket in &dist {
            assert!(bucket.pct >= policy.min_bucket_probability);
        }
    }

    #[test]
    fn sequence_is_nonempty_for_a_populated_tree() {
        let catalog = default_catalog();
        let policy = Policy::default();
        let mut rng = StdRng::seed_from_u64(3);
        let tree = plan(&catalog, &policy, 1800.0, 2200.0, 0.0, 5000, &mut rng).unwrap();
        let seq = sequence(&tree);
        assert!(!seq.is_empty());
    }
}
