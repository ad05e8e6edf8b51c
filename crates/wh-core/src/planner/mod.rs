//! The POMCTS planner: arena tree, search loop, and result extraction.

pub mod node;
pub mod result;
pub mod search;

pub use node::{Node, NodeId, Tree};
pub use result::{action_results, best_action, sequence, trip_distribution, ActionResult, TripBucket};
pub use search::plan;
