//! Property-based tests for the belief-update rules.

use proptest::prelude::*;
use wh_core::{update_total_belief, Belief, Observation};

fn obs_strategy() -> impl Strategy<Value = Observation> {
    prop_oneof![
        Just(Observation::Fresh),
        Just(Observation::Shrink),
        Just(Observation::Crit),
        Just(Observation::Collapsed),
    ]
}

proptest! {
    #[test]
    fn update_total_belief_never_inverts(
        min in 0.0f64..5000.0,
        width in 0.0f64..5000.0,
        mass_used in 0.0f64..10_000.0,
        obs in obs_strategy(),
    ) {
        let belief = Belief::new(min, min + width).unwrap();
        let updated = update_total_belief(belief, mass_used, obs);
        prop_assert!(updated.min <= updated.max);
        prop_assert!(updated.min >= 0.0);
    }

    #[test]
    fn update_total_belief_is_idempotent(
        min in 0.0f64..5000.0,
        width in 0.0f64..5000.0,
        mass_used in 0.0f64..10_000.0,
        obs in obs_strategy(),
    ) {
        let belief = Belief::new(min, min + width).unwrap();
        let once = update_total_belief(belief, mass_used, obs);
        let twice = update_total_belief(once, mass_used, obs);
        prop_assert_eq!(once.min, twice.min);
        prop_assert_eq!(once.max, twice.max);
    }

    #[test]
    fn update_total_belief_never_widens(
        min in 0.0f64..5000.0,
        width in 0.0f64..5000.0,
        mass_used in 0.0f64..10_000.0,
        obs in obs_strategy(),
    ) {
        let belief = Belief::new(min, min + width).unwrap();
        let updated = update_total_belief(belief, mass_used, obs);
        prop_assert!(updated.min >= belief.min - 1e-9);
        prop_assert!(updated.max <= belief.max + 1e-9);
    }
}
