//! Error types shared across the wormhole-roller crates.
//!
//! This module provides structured error handling with:
//! - Stable error codes for machine parsing
//! - Category classification for error grouping
//! - Recoverability hints for automation
//! - Remediation suggestions for humans
//!
//! # Human-Facing Output
//!
//! Errors can be formatted for human consumption with headline, reason, and fix:
//! ```text
//! ✗ Invalid Belief
//!   Reason: total_min (2200) is greater than total_max (1800)
//!   Fix: Swap the bounds or widen the interval so min <= max.
//! ```
//!
//! # Agent-Facing Output
//!
//! Errors serialize to structured JSON:
//! ```json
//! {
//!   "code": 20,
//!   "category": "belief",
//!   "message": "total_min (2200) is greater than total_max (1800)",
//!   "recoverable": true,
//!   "context": {}
//! }
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Result type alias for wormhole-roller operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error categories for grouping related errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Configuration file errors (policy, catalog, schema).
    Config,
    /// Malformed or contradictory belief intervals.
    Belief,
    /// Observation sequences inconsistent with the current belief.
    Observation,
    /// Action-catalog errors.
    Catalog,
    /// File I/O and serialization errors.
    Io,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCategory::Config => write!(f, "config"),
            ErrorCategory::Belief => write!(f, "belief"),
            ErrorCategory::Observation => write!(f, "observation"),
            ErrorCategory::Catalog => write!(f, "catalog"),
            ErrorCategory::Io => write!(f, "io"),
        }
    }
}

/// Unified error type for wormhole-roller operations.
#[derive(Error, Debug)]
pub enum Error {
    // Configuration errors (10-19)
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid policy file: {0}")]
    InvalidPolicy(String),

    #[error("schema validation failed: {0}")]
    SchemaValidation(String),

    // Belief errors (20-29)
    #[error("invalid belief: total_min ({min}) is greater than total_max ({max})")]
    InvalidBelief { min: f64, max: f64 },

    #[error("invalid mass_used: {0} is negative")]
    InvalidMassUsed(f64),

    // Observation errors (30-39)
    #[error("observation {observation} is inconsistent with belief [{min}, {max}] at mass_used {mass_used}")]
    InconsistentObservation {
        observation: String,
        min: f64,
        max: f64,
        mass_used: f64,
    },

    // Catalog errors (40-49)
    #[error("action catalog has no action with positive round-trip mass")]
    EmptyCatalog,

    #[error("unknown action key: {0}")]
    UnknownAction(String),

    // I/O errors (60-69)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns the error code for this error type.
    ///
    /// Error codes are stable and grouped by category:
    /// - 10-19: Configuration errors
    /// - 20-29: Belief errors
    /// - 30-39: Observation errors
    /// - 40-49: Catalog errors
    /// - 60-69: I/O errors
    pub fn code(&self) -> u32 {
        match self {
            Error::Config(_) => 10,
            Error::InvalidPolicy(_) => 11,
            Error::SchemaValidation(_) => 12,
            Error::InvalidBelief { .. } => 20,
            Error::InvalidMassUsed(_) => 21,
            Error::InconsistentObservation { .. } => 30,
            Error::EmptyCatalog => 40,
            Error::UnknownAction(_) => 41,
            Error::Io(_) => 60,
            Error::Json(_) => 61,
        }
    }

    /// Returns the error category for grouping and filtering.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Config(_) | Error::InvalidPolicy(_) | Error::SchemaValidation(_) => {
                ErrorCategory::Config
            }
            Error::InvalidBelief { .. } | Error::InvalidMassUsed(_) => ErrorCategory::Belief,
            Error::InconsistentObservation { .. } => ErrorCategory::Observation,
            Error::EmptyCatalog | Error::UnknownAction(_) => ErrorCategory::Catalog,
            Error::Io(_) | Error::Json(_) => ErrorCategory::Io,
        }
    }

    /// Returns whether this error is potentially recoverable by the caller
    /// supplying different inputs.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Error::Io(_))
    }

    /// Returns a human-readable remediation hint.
    pub fn remediation(&self) -> &'static str {
        match self {
            Error::Config(_) => "Check the policy/catalog file syntax and re-run.",
            Error::InvalidPolicy(_) => {
                "Run validation on the policy file, or reset it to the bundled default."
            }
            Error::SchemaValidation(_) => {
                "Ensure the configuration file matches the expected schema version."
            }
            Error::InvalidBelief { .. } => {
                "Supply total_min <= total_max, both non-negative."
            }
            Error::InvalidMassUsed(_) => "Supply a non-negative mass_used.",
            Error::InconsistentObservation { .. } => {
                "The supplied observation cannot be produced by any mass in the current belief; re-check the session history."
            }
            Error::EmptyCatalog => {
                "Configure at least one action whose out + back mass is greater than zero."
            }
            Error::UnknownAction(_) => "Check the action key against the configured catalog.",
            Error::Io(_) => "Check file permissions and that the path exists.",
            Error::Json(_) => "Check the file's JSON syntax.",
        }
    }

    /// Returns a short headline for human-readable output.
    pub fn headline(&self) -> &'static str {
        match self {
            Error::Config(_) => "Configuration Error",
            Error::InvalidPolicy(_) => "Invalid Policy Configuration",
            Error::SchemaValidation(_) => "Schema Validation Failed",
            Error::InvalidBelief { .. } => "Invalid Belief",
            Error::InvalidMassUsed(_) => "Invalid Mass Used",
            Error::InconsistentObservation { .. } => "Inconsistent Observation",
            Error::EmptyCatalog => "Empty Action Catalog",
            Error::UnknownAction(_) => "Unknown Action",
            Error::Io(_) => "I/O Error",
            Error::Json(_) => "JSON Parse Error",
        }
    }
}

/// Structured error response for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct StructuredError {
    pub code: u32,
    pub category: ErrorCategory,
    pub message: String,
    pub recoverable: bool,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub context: HashMap<String, serde_json::Value>,
}

impl From<&Error> for StructuredError {
    fn from(err: &Error) -> Self {
        let mut context = HashMap::new();
        if let Error::InvalidBelief { min, max } = err {
            context.insert("total_min".to_string(), serde_json::json!(min));
            context.insert("total_max".to_string(), serde_json::json!(max));
        }
        StructuredError {
            code: err.code(),
            category: err.category(),
            message: err.to_string(),
            recoverable: err.is_recoverable(),
            context,
        }
    }
}

impl StructuredError {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| {
            format!(r#"{{"code":{},"error":"serialization_failed"}}"#, self.code)
        })
    }
}

/// Format an error for human-readable stderr output.
///
/// ```text
/// ✗ [Headline]
///   Reason: [Error message]
///   Fix: [Remediation hint]
/// ```
pub fn format_error_human(err: &Error, use_color: bool) -> String {
    let (red, cyan, reset) = if use_color {
        ("\x1b[31m", "\x1b[36m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    format!(
        "{red}✗{reset} {headline}\n  Reason: {message}\n  {cyan}Fix:{reset} {remediation}",
        red = red,
        cyan = cyan,
        reset = reset,
        headline = err.headline(),
        message = err,
        remediation = err.remediation()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_code_stable() {
        assert_eq!(
            Error::InvalidBelief { min: 2.0, max: 1.0 }.code(),
            20
        );
        assert_eq!(Error::EmptyCatalog.code(), 40);
    }

    #[test]
    fn error_category_grouping() {
        assert_eq!(
            Error::InvalidMassUsed(-1.0).category(),
            ErrorCategory::Belief
        );
        assert_eq!(Error::UnknownAction("x".into()).category(), ErrorCategory::Catalog);
    }

    #[test]
    fn structured_error_context() {
        let err = Error::InvalidBelief { min: 10.0, max: 5.0 };
        let structured = StructuredError::from(&err);
        assert_eq!(structured.code, 20);
        assert_eq!(structured.context.get("total_min"), Some(&serde_json::json!(10.0)));
    }

    #[test]
    fn format_error_human_contains_headline() {
        let err = Error::EmptyCatalog;
        let formatted = format_error_human(&err, false);
        assert!(formatted.contains("Empty Action Catalog"));
        assert!(formatted.contains("Fix:"));
    }

    #[test]
    fn error_category_display() {
        assert_eq!(ErrorCategory::Belief.to_string(), "belief");
    }
}
