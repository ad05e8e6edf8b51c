//! Wormhole Roller common types and errors.
//!
//! This crate provides foundational types shared between the configuration
//! layer (`wh-config`) and the planner (`wh-core`):
//! - A unified error type with stable codes and remediation hints.

pub mod error;

pub use error::{Error, ErrorCategory, Result, StructuredError};
