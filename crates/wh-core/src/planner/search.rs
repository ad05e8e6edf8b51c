//! The POMCTS search loop: sample, select/expand, simulate, backpropagate.

use rand::Rng;
use wh_common::{Error, Result};
use wh_config::{Catalog, Policy};

use crate::belief::{observe, update_total_belief, Belief, Observation};
use crate::planner::node::{NodeId, Tree};

/// Run `iterations` independent POMCTS iterations from a fresh root and
/// return the resulting tree.
///
/// Preconditions (§7): `total_min <= total_max`, both non-negative;
/// `mass_used >= 0`; the catalog must contain at least one action with
/// positive round-trip mass.
pub fn plan(
    catalog: &Catalog,
    policy: &Policy,
    total_min: f64,
    total_max: f64,
    mass_used: f64,
    iterations: u64,
    rng: &mut impl Rng,
) -> Result<Tree> {
    if total_min < 0.0 || total_max < 0.0 || total_min > total_max {
        return Err(Error::InvalidBelief {
            min: total_min,
            max: total_max,
        });
    }
    if mass_used < 0.0 {
        return Err(Error::InvalidMassUsed(mass_used));
    }
    if catalog.usable_actions().next().is_none() {
        return Err(Error::EmptyCatalog);
    }

    let root_belief = Belief::new(total_min, total_max)?;
    let mut tree = Tree::new(root_belief, mass_used);

    for _ in 0..iterations {
        run_iteration(&mut tree, catalog, policy, rng);
    }

    Ok(tree)
}

fn run_iteration(tree: &mut Tree, catalog: &Catalog, policy: &Policy, rng: &mut impl Rng) {
    let root = tree.root_id();
    let root_belief = tree.get(root).total_belief;

    let true_mass = if root_belief.width() <= 0.0 {
        root_belief.min
    } else {
        rng.random_range(root_belief.min..=root_belief.max)
    };

    let mut mass_used = tree.get(root).mass_used;
    let mut remaining = true_mass - mass_used;
    let mut path: Vec<NodeId> = vec![root];
    let mut node = root;
    let mut rolled_out = false;

    // Step B — selection + expansion.
    while !tree.get(node).is_terminal() && !rolled_out {
        let valid = tree.get(node).valid_actions(catalog);
        if valid.is_empty() {
            break;
        }

        let mut chosen: Option<(&str, f64, f64)> = None; // (key, out, back)
        let mut needs_expansion = false;

        for (key, act) in &valid {
            if remaining > act.mass_out {
                let new_used = mass_used + act.mass_out + act.mass_back;
                let obs = observe(true_mass, new_used, policy.shrink_threshold, policy.crit_threshold);
                if !tree.get(node).has_child(key, obs) {
                    chosen = Some((key, act.mass_out, act.mass_back));
                    needs_expansion = true;
                    break;
                }
            }
        }

        if chosen.is_none() {
            let mut best_key: Option<&str> = None;
            let mut best_score = f64::NEG_INFINITY;
            let mut best_out = 0.0;
            let mut best_back = 0.0;
            for (key, act) in &valid {
                if remaining > act.mass_out {
                    let score = tree.get(node).ucb1(tree, key, policy.ucb_constant);
                    if score > best_score {
                        best_score = score;
                        best_key = Some(key);
                        best_out = act.mass_out;
                        best_back = act.mass_back;
                    }
                }
            }
            chosen = best_key.map(|key| (key, best_out, best_back));
        }

        let (key, out, back) = match chosen {
            Some(c) => c,
            None => {
                rolled_out = true;
                break;
            }
        };

        // Belt-and-braces recheck: the outbound leg must still be survivable
        // under the sampled world at the moment it's actually applied.
        if remaining <= out {
            rolled_out = true;
            break;
        }

        let new_used = mass_used + out + back;
        let new_remaining = true_mass - new_used;
        let obs = observe(true_mass, new_used, policy.shrink_threshold, policy.crit_threshold);

        mass_used = new_used;
        remaining = new_remaining;

        let parent_belief = tree.get(node).total_belief;
        let child_belief = update_total_belief(parent_belief, mass_used, obs);
        let depth = tree.get(node).depth + 1;
        let child = tree.get_or_insert_child(node, key, obs, child_belief, mass_used, depth);

        path.push(child);
        node = child;

        if remaining <= 0.0 {
            break;
        }
        if needs_expansion {
            break;
        }
    }

    // Step C — simulation (rollout).
    let mut trips = tree.get(node).depth;
    let mut scratch_belief = tree.get(node).total_belief;
    if !rolled_out {
        while remaining > 0.0 && trips < policy.max_depth {
            let mut best: Option<(&str, f64, f64)> = None;
            for act in catalog.usable_actions() {
                if remaining > act.mass_out {
                    let total = act.mass_out + act.mass_back;
                    let better = match best {
                        None => true,
                        Some((_, bout, bback)) => total > bout + bback,
                    };
                    if better {
                        best = Some((act.key.as_str(), act.mass_out, act.mass_back));
                    }
                }
            }
            match best {
                None => {
                    rolled_out = true;
                    break;
                }
                Some((_, out, back)) => {
                    mass_used += out + back;
                    remaining = true_mass - mass_used;
                    trips += 1;
                    let obs = observe(true_mass, mass_used, policy.shrink_threshold, policy.crit_threshold);
                    scratch_belief = update_total_belief(scratch_belief, mass_used, obs);
                }
            }
        }
    }
    let _ = scratch_belief; // mirrors the rollout inference a real player would do; unused downstream.

    // Step D — scoring and backpropagation.
    let success = !rolled_out && remaining <= 0.0;
    let score = if success { policy.trip_decay.powi(trips as i32) } else { 0.0 };

    for &n in &path {
        let node = tree.get_mut(n);
        node.visits += 1;
        if success {
            node.wins += score;
            node.successes += 1;
            *node.terminal_trips.entry(trips).or_insert(0) += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};
    use wh_config::default_catalog;

    #[test]
    fn plan_rejects_inverted_belief() {
        let catalog = default_catalog();
        let policy = Policy::default();
        let mut rng = StdRng::seed_from_u64(1);
        let result = plan(&catalog, &policy, 200.0, 100.0, 0.0, 10, &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn plan_rejects_negative_mass_used() {
        let catalog = default_catalog();
        let policy = Policy::default();
        let mut rng = StdRng::seed_from_u64(1);
        let result = plan(&catalog, &policy, 100.0, 200.0, -5.0, 10, &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn plan_rejects_empty_catalog() {
        let catalog = wh_config::Catalog {
            schema_version: "1.0.0".to_string(),
            actions: vec![],
        };
        let policy = Policy::default();
        let mut rng = StdRng::seed_from_u64(1);
        let result = plan(&catalog, &policy, 100.0, 200.0, 0.0, 10, &mut rng);
        assert!(result.is_err());
    }

    #[test]
    fn plan_produces_visited_root() {
        let catalog = default_catalog();
        let policy = Policy::default();
        let mut rng = StdRng::seed_from_u64(42);
        let tree = plan(&catalog, &policy, 1800.0, 2200.0, 0.0, 2000, &mut rng).unwrap();
        let root = tree.get(tree.root_id());
        assert_eq!(root.visits, 2000);
        assert!(tree.len() > 1);
    }

    #[test]
    fn invariant_successes_le_visits_and_wins_le_successes() {
        let catalog = default_catalog();
        let policy = Policy::default();
        let mut rng = StdRng::seed_from_u64(7);
        let tree = plan(&catalog, &policy, 1800.0, 2200.0, 0.0, 3000, &mut rng).unwrap();
        for node in tree.iter() {
            assert!(node.successes <= node.visits);
            assert!(node.wins <= node.successes as f64 + 1e-9);
            assert!(node.wins >= 0.0);
        }
    }

    #[test]
    fn invariant_action_stats_visits_le_node_visits() {
        let catalog = default_catalog();
        let policy = Policy::default();
        let mut rng = StdRng::seed_from_u64(9);
        let tree = plan(&catalog, &policy, 1800.0, 2200.0, 0.0, 3000, &mut rng).unwrap();
        let root = tree.get(tree.root_id());
        for key in root.explored_action_keys() {
            let stats = root.action_stats(&tree, key);
            assert!(stats.visits <= root.visits);
        }
    }
}
