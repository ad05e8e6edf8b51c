//! Belief intervals over a wormhole's total mass, and the qualitative
//! observation model used to narrow them.
//!
//! A [`Belief`] is a closed interval `[min, max]` (millions of mass). The
//! planner tracks one belief over the hole's original total and derives a
//! *remaining* belief from it at every node by subtracting cumulative mass
//! used. [`Observation`] is the four-way discretization of the remaining
//! fraction a player actually sees in space, and [`update_total_belief`] is
//! the Bayesian narrowing step run whenever a new observation is folded in.

use serde::{Deserialize, Serialize};
use wh_common::{Error, Result};

/// A closed interval of possible total masses, in millions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Belief {
    pub min: f64,
    pub max: f64,
}

impl Belief {
    /// Construct a belief, rejecting `min > max` or negative bounds.
    pub fn new(min: f64, max: f64) -> Result<Self> {
        if min < 0.0 || max < 0.0 || min > max {
            return Err(Error::InvalidBelief { min, max });
        }
        Ok(Belief { min, max })
    }

    /// Interval width, `max - min`.
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    /// The remaining-mass belief given cumulative `mass_used`, clamped at 0.
    pub fn remaining(&self, mass_used: f64) -> Belief {
        Belief {
            min: (self.min - mass_used).max(0.0),
            max: (self.max - mass_used).max(0.0),
        }
    }
}

/// Discrete visual observation of a wormhole's remaining mass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Observation {
    Fresh,
    Shrink,
    Crit,
    Collapsed,
}

impl Observation {
    /// All four variants, in the order the two-level child index stores them.
    pub const ALL: [Observation; 4] = [
        Observation::Fresh,
        Observation::Shrink,
        Observation::Crit,
        Observation::Collapsed,
    ];

    /// Stable array index for this observation (used to key child slots).
    pub fn index(self) -> usize {
        match self {
            Observation::Fresh => 0,
            Observation::Shrink => 1,
            Observation::Crit => 2,
            Observation::Collapsed => 3,
        }
    }
}

impl std::fmt::Display for Observation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Observation::Fresh => "fresh",
            Observation::Shrink => "shrink",
            Observation::Crit => "crit",
            Observation::Collapsed => "collapsed",
        };
        write!(f, "{s}")
    }
}

/// Classify the remaining fraction of a sampled true mass at a given
/// cumulative mass-used.
pub fn observe(true_mass: f64, mass_used: f64, shrink_threshold: f64, crit_threshold: f64) -> Observation {
    let remaining = true_mass - mass_used;
    if remaining <= 0.0 {
        return Observation::Collapsed;
    }
    let fraction = remaining / true_mass;
    if fraction <= crit_threshold {
        Observation::Crit
    } else if fraction <= shrink_threshold {
        Observation::Shrink
    } else {
        Observation::Fresh
    }
}

/// Narrow a total-mass belief under the constraint that `obs` would be
/// produced at `mass_used`.
///
/// The `+1` offsets on `fresh`/`shrink` lower bounds are an intentional
/// strict-inequality discretization: `total > 2*mass_used` discretizes to
/// `total >= 2*mass_used + 1` rather than risking an accidental boundary
/// equality. Preserve them exactly; downstream scenario tests depend on it.
pub fn update_total_belief(belief: Belief, mass_used: f64, obs: Observation) -> Belief {
    let Belief { mut min, mut max } = belief;
    match obs {
        Observation::Fresh => {
            min = min.max(2.0 * mass_used + 1.0);
        }
        Observation::Shrink => {
            min = min.max(mass_used / 0.9 + 1.0);
            max = max.min(2.0 * mass_used);
        }
        Observation::Crit => {
            max = max.min(mass_used / 0.9);
        }
        Observation::Collapsed => {}
    }
    if min > max {
        min = max;
    }
    Belief { min, max }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHRINK: f64 = 0.50;
    const CRIT: f64 = 0.10;

    #[test]
    fn belief_rejects_inverted_bounds() {
        assert!(Belief::new(10.0, 5.0).is_err());
    }

    #[test]
    fn belief_rejects_negative_bounds() {
        assert!(Belief::new(-1.0, 5.0).is_err());
    }

    #[test]
    fn remaining_belief_clamps_at_zero() {
        let b = Belief::new(100.0, 200.0).unwrap();
        let r = b.remaining(150.0);
        assert_eq!(r.min, 0.0);
        assert_eq!(r.max, 50.0);
    }

    #[test]
    fn observe_fresh_shrink_crit_collapsed() {
        assert_eq!(observe(2000.0, 500.0, SHRINK, CRIT), Observation::Fresh);
        assert_eq!(observe(2000.0, 1200.0, SHRINK, CRIT), Observation::Shrink);
        assert_eq!(observe(2000.0, 1850.0, SHRINK, CRIT), Observation::Crit);
        assert_eq!(observe(2000.0, 2000.0, SHRINK, CRIT), Observation::Collapsed);
        assert_eq!(observe(2000.0, 2100.0, SHRINK, CRIT), Observation::Collapsed);
    }

    #[test]
    fn update_total_belief_fresh_narrows_min() {
        let b = Belief::new(0.0, 10_000.0).unwrap();
        let updated = update_total_belief(b, 500.0, Observation::Fresh);
        assert_eq!(updated.min, 1001.0);
        assert_eq!(updated.max, 10_000.0);
    }

    #[test]
    fn update_total_belief_shrink_narrows_both() {
        let b = Belief::new(0.0, 10_000.0).unwrap();
        let updated = update_total_belief(b, 900.0, Observation::Shrink);
        assert!((updated.min - (900.0 / 0.9 + 1.0)).abs() < 1e-9);
        assert_eq!(updated.max, 1800.0);
    }

    #[test]
    fn update_total_belief_crit_narrows_max() {
        let b = Belief::new(0.0, 10_000.0).unwrap();
        let updated = update_total_belief(b, 900.0, Observation::Crit);
        assert!((updated.max - 1000.0).abs() < 1e-9);
        assert_eq!(updated.min, 0.0);
    }

    #[test]
    fn update_total_belief_collapsed_is_noop() {
        let b = Belief::new(100.0, 2000.0).unwrap();
        let updated = update_total_belief(b, 900.0, Observation::Collapsed);
        assert_eq!(updated.min, 100.0);
        assert_eq!(updated.max, 2000.0);
    }

    #[test]
    fn update_total_belief_never_produces_inverted_interval() {
        let b = Belief::new(0.0, 100.0).unwrap();
        // A tight observation that would otherwise push min above max is
        // clamped rather than allowed to invert.
        let updated = update_total_belief(b, 10_000.0, Observation::Fresh);
        assert!(updated.min <= updated.max);
    }

    #[test]
    fn update_total_belief_idempotent() {
        let b = Belief::new(0.0, 10_000.0).unwrap();
        let once = update_total_belief(b, 900.0, Observation::Shrink);
        let twice = update_total_belief(once, 900.0, Observation::Shrink);
        assert_eq!(once.min, twice.min);
        assert_eq!(once.max, twice.max);
    }
}
