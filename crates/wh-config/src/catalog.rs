//! Action catalog: the menu of round-trip jump actions the planner can choose between.
//!
//! Each action is a ship (or ship group) sent through the hole and back, with
//! a mass cost for the outbound leg and a (possibly different) mass cost for
//! the return leg. A catalog with no positive-mass action is useless to the
//! planner and is rejected at validation time.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single round-trip jump action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Action {
    /// Stable identifier, e.g. `"INTY_HOT"`.
    pub key: String,

    /// Human-facing label, e.g. `"Interceptor (hot)"`.
    pub label: String,

    /// Mass consumed crossing outbound, in millions of kg.
    pub mass_out: f64,

    /// Mass consumed crossing back, in millions of kg.
    pub mass_back: f64,

    #[serde(default)]
    pub notes: Option<String>,
}

impl Action {
    /// Total mass consumed by one complete round trip.
    pub fn round_trip_mass(&self) -> f64 {
        self.mass_out + self.mass_back
    }
}

/// The full set of actions available to the planner for a given session.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Catalog {
    pub schema_version: String,
    pub actions: Vec<Action>,
}

impl Catalog {
    /// Load a catalog from a JSON file.
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

    /// Parse a catalog from a JSON string.
    pub fn parse_json(json: &str) -> Result<Self, crate::validate::ValidationError> {
        serde_json::from_str(json)
            .map_err(|e| crate::validate::ValidationError::ParseError(format!("Invalid JSON: {e}")))
    }

    /// Look up an action by key.
    pub fn get(&self, key: &str) -> Option<&Action> {
        self.actions.iter().find(|a| a.key == key)
    }

    /// Actions with a strictly positive round-trip mass, the only ones the
    /// planner is allowed to select.
    pub fn usable_actions(&self) -> impl Iterator<Item = &Action> {
        self.actions.iter().filter(|a| a.round_trip_mass() > 0.0)
    }
}

/// The bundled default catalog, modeled on the common wormhole-rolling
/// fleet doctrine: progressively heavier hulls sent hot (undocked, full
/// cargo) or cold (docked/empty) through the hole.
pub fn default_catalog() -> Catalog {
    Catalog {
        schema_version: "1.0.0".to_string(),
        actions: vec![
            Action {
                key: "INTY_HOT".to_string(),
                label: "Interceptor (hot)".to_string(),
                mass_out: 1.3,
                mass_back: 1.3,
                notes: Some("Scouting jump, negligible mass impact.".to_string()),
            },
            Action {
                key: "CRUISER_HOT".to_string(),
                label: "Heavy cruiser (hot)".to_string(),
                mass_out: 13.0,
                mass_back: 13.0,
                notes: None,
            },
            Action {
                key: "DIC_HOT".to_string(),
                label: "Dictor (hot)".to_string(),
                mass_out: 14.0,
                mass_back: 14.0,
                notes: None,
            },
            Action {
                key: "HIC_HOT".to_string(),
                label: "Heavy interdictor (hot)".to_string(),
                mass_out: 134.0,
                mass_back: 40.0,
                notes: Some(
                    "Warp core stabilized hull; light return via the interdiction fit swap."
                        .to_string(),
                ),
            },
            Action {
                key: "BATTLECRUISER_HOT".to_string(),
                label: "Battlecruiser (hot)".to_string(),
                mass_out: 70.0,
                mass_back: 70.0,
                notes: None,
            },
            Action {
                key: "BS_COLD_HOT".to_string(),
                label: "Battleship (cold out, hot back)".to_string(),
                mass_out: 100.0,
                mass_back: 133.0,
                notes: None,
            },
            Action {
                key: "BS_HOT_HOT".to_string(),
                label: "Battleship (hot both ways)".to_string(),
                mass_out: 133.0,
                mass_back: 133.0,
                notes: None,
            },
        ],
    }
}
