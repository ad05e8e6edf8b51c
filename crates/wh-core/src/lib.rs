//! Wormhole rolling decision-support core.
//!
//! This library provides:
//! - The belief model and observation rules (`belief`)
//! - The POMCTS planner: arena tree, search loop, result extraction (`planner`)
//! - Exit codes for CLI operations (`exit_codes`)
//! - Structured logging (`logging`)
//!
//! The binary entry point is in `main.rs`.

pub mod belief;
pub mod exit_codes;
pub mod logging;
pub mod planner;

pub use belief::{observe, update_total_belief, Belief, Observation};
pub use planner::{
    action_results, best_action, plan, sequence, trip_distribution, ActionResult, Node, NodeId,
    Tree, TripBucket,
};
