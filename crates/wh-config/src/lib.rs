//! Wormhole roller configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for the planner policy and action catalog
//! - Schema and semantic validation for both
//! - Bundled defaults so the planner runs with no configuration at all

pub mod catalog;
pub mod policy;
pub mod validate;

pub use catalog::{default_catalog, Action, Catalog};
pub use policy::Policy;
pub use validate::{validate_catalog, validate_policy, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
