//! Planner policy configuration types.
//!
//! These are the tunable constants the POMCTS planner is built around
//! (`§6 Configuration` of the design): observation thresholds, the UCB1
//! exploration constant, the rollout depth cap, and the trip-count decay
//! used to score successful simulations.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Complete planner policy.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Policy {
    pub schema_version: String,

    #[serde(default)]
    pub policy_id: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    /// Remaining-fraction threshold below which a hole reads "shrink".
    #[serde(default = "default_shrink_threshold")]
    pub shrink_threshold: f64,

    /// Remaining-fraction threshold below which a hole reads "crit".
    #[serde(default = "default_crit_threshold")]
    pub crit_threshold: f64,

    /// UCB1 exploration constant (`C` in `wins/visits + C * sqrt(ln(N)/n)`).
    #[serde(default = "default_ucb_constant")]
    pub ucb_constant: f64,

    /// Maximum round trips a rollout is allowed to play before giving up.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,

    /// Per-trip decay applied to a successful rollout's score (`decay^trips`).
    #[serde(default = "default_trip_decay")]
    pub trip_decay: f64,

    /// Trip-distribution buckets below this probability are dropped.
    #[serde(default = "default_min_bucket_probability")]
    pub min_bucket_probability: f64,

    #[serde(default)]
    pub notes: Option<String>,
}

fn default_shrink_threshold() -> f64 {
    0.50
}

fn default_crit_threshold() -> f64 {
    0.10
}

fn default_ucb_constant() -> f64 {
    std::f64::consts::SQRT_2
}

fn default_max_depth() -> u32 {
    20
}

fn default_trip_decay() -> f64 {
    0.95
}

fn default_min_bucket_probability() -> f64 {
    0.01
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            schema_version: "1.0.0".to_string(),
            policy_id: None,
            description: None,
            shrink_threshold: default_shrink_threshold(),
            crit_threshold: default_crit_threshold(),
            ucb_constant: default_ucb_constant(),
            max_depth: default_max_depth(),
            trip_decay: default_trip_decay(),
            min_bucket_probability: default_min_bucket_probability(),
            notes: None,
        }
    }
}

impl Policy {
    /// Load a policy from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, crate::validate::ValidationError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::validate::ValidationError::IoError(format!(
                "Failed to read {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse_json(&content)
    }

    /// Parse a policy from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, crate::validate::ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| crate::validate::ValidationError::ParseError(format!("Invalid JSON: {e}")))
    }
}
