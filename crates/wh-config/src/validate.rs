//! Configuration validation errors and semantic validation.

use thiserror::Error;

/// Validation result type.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Configuration validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Schema validation failed: {0}")]
    SchemaError(String),

    #[error("Semantic validation failed: {0}")]
    SemanticError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    #[error("Version mismatch: expected {expected}, got {actual}")]
    VersionMismatch { expected: String, actual: String },
}

impl ValidationError {
    /// Error code for structured error reporting.
    pub fn code(&self) -> u32 {
        match self {
            ValidationError::IoError(_) => 60,
            ValidationError::ParseError(_) => 61,
            ValidationError::SchemaError(_) => 62,
            ValidationError::SemanticError(_) => 63,
            ValidationError::MissingField(_) => 64,
            ValidationError::InvalidValue { .. } => 65,
            ValidationError::VersionMismatch { .. } => 66,
        }
    }
}

/// Validate policy configuration semantically.
pub fn validate_policy(policy: &crate::policy::Policy) -> ValidationResult<()> {
    if policy.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: policy.schema_version.clone(),
        });
    }

    if policy.shrink_threshold <= 0.0 || policy.shrink_threshold >= 1.0 {
        return Err(ValidationError::InvalidValue {
            field: "shrink_threshold".to_string(),
            message: format!("Must be in (0, 1), got {}", policy.shrink_threshold),
        });
    }

    if policy.crit_threshold <= 0.0 || policy.crit_threshold >= 1.0 {
        return Err(ValidationError::InvalidValue {
            field: "crit_threshold".to_string(),
            message: format!("Must be in (0, 1), got {}", policy.crit_threshold),
        });
    }

    if policy.crit_threshold >= policy.shrink_threshold {
        return Err(ValidationError::SemanticError(format!(
            "crit_threshold ({}) must be strictly less than shrink_threshold ({})",
            policy.crit_threshold, policy.shrink_threshold
        )));
    }

    if policy.ucb_constant < 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "ucb_constant".to_string(),
            message: format!("Must be non-negative, got {}", policy.ucb_constant),
        });
    }

    if policy.max_depth == 0 {
        return Err(ValidationError::InvalidValue {
            field: "max_depth".to_string(),
            message: "Must be at least 1".to_string(),
        });
    }

    if policy.trip_decay <= 0.0 || policy.trip_decay > 1.0 {
        return Err(ValidationError::InvalidValue {
            field: "trip_decay".to_string(),
            message: format!("Must be in (0, 1], got {}", policy.trip_decay),
        });
    }

    if policy.min_bucket_probability < 0.0 || policy.min_bucket_probability >= 1.0 {
        return Err(ValidationError::InvalidValue {
            field: "min_bucket_probability".to_string(),
            message: format!("Must be in [0, 1), got {}", policy.min_bucket_probability),
        });
    }

    Ok(())
}

/// Validate an action catalog semantically.
pub fn validate_catalog(catalog: &crate::catalog::Catalog) -> ValidationResult<()> {
    if catalog.schema_version != crate::CONFIG_SCHEMA_VERSION {
        return Err(ValidationError::VersionMismatch {
            expected: crate::CONFIG_SCHEMA_VERSION.to_string(),
            actual: catalog.schema_version.clone(),
        });
    }

    if catalog.actions.is_empty() {
        return Err(ValidationError::SemanticError(
            "catalog must contain at least one action".to_string(),
        ));
    }

    let mut seen = std::collections::HashSet::new();
    for action in &catalog.actions {
        if !seen.insert(action.key.as_str()) {
            return Err(ValidationError::SemanticError(format!(
                "duplicate action key: {}",
                action.key
            )));
        }
        if action.mass_out < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("actions.{}.mass_out", action.key),
                message: "Must be non-negative".to_string(),
            });
        }
        if action.mass_back < 0.0 {
            return Err(ValidationError::InvalidValue {
                field: format!("actions.{}.mass_back", action.key),
                message: "Must be non-negative".to_string(),
            });
        }
    }

    if catalog.usable_actions().count() == 0 {
        return Err(ValidationError::SemanticError(
            "catalog has no action with positive round-trip mass".to_string(),
        ));
    }

    Ok(())
}
