//! # Error Types
//!
//! Structured error types for bridge_core.
//!
//! User mistakes in a submitted form are *not* errors in this sense: they are
//! returned as data inside [`ValidationResult`](crate::validator::ValidationResult).
//! `EngineError` covers the cases that are not the user's fault:
//!
//! - **Configuration** errors in the field schema (duplicate names, dangling
//!   dependencies, dependency cycles). These halt engine construction.
//! - **Internal** consistency errors, where derivation fails on inputs that
//!   already passed validation.
//! - File errors from saving and loading design files, and settings files
//!   holding values no derivation can use.
//!
//! ## Example
//!
//! ```rust
//! use bridge_core::errors::{EngineError, EngineResult};
//!
//! fn check_unique(name: &str, seen: &[&str]) -> EngineResult<()> {
//!     if seen.contains(&name) {
//!         return Err(EngineError::duplicate_field(name));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_unique("span", &["span"]).unwrap_err().is_configuration());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for bridge_core operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Structured error type for engine operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum EngineError {
    /// Two field specs share a name
    #[error("Schema error: field '{field}' is defined more than once")]
    DuplicateField { field: String },

    /// A field depends on a field that has no spec
    #[error("Schema error: field '{field}' depends on undefined field '{dependency}'")]
    DanglingDependency { field: String, dependency: String },

    /// A cross-field rule references a field that has no spec
    #[error("Schema error: rule '{rule}' references undefined field '{field}'")]
    UnknownRuleField { rule: String, field: String },

    /// A field default is outside the field's own range or choice list
    #[error("Schema error: default for '{field}' is invalid - {reason}")]
    InvalidDefault { field: String, reason: String },

    /// The depends-on graph contains a cycle
    #[error("Schema error: dependency cycle {}", cycle.join(" -> "))]
    DependencyCycle { cycle: Vec<String> },

    /// Validator and derivation disagree (a programming defect)
    #[error("Internal error: {message}")]
    Internal { message: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// File is locked by another user/process
    #[error("File locked: '{path}' is locked by {locked_by} since {locked_at}")]
    FileLocked {
        path: String,
        locked_by: String,
        locked_at: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// A loaded settings value that would make derived loads meaningless
    #[error("Settings error: {setting} = {value} - {reason}")]
    InvalidSetting {
        setting: String,
        value: f64,
        reason: String,
    },

    /// Design file version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

impl EngineError {
    /// Create a DuplicateField error
    pub fn duplicate_field(field: impl Into<String>) -> Self {
        EngineError::DuplicateField {
            field: field.into(),
        }
    }

    /// Create a DanglingDependency error
    pub fn dangling_dependency(field: impl Into<String>, dependency: impl Into<String>) -> Self {
        EngineError::DanglingDependency {
            field: field.into(),
            dependency: dependency.into(),
        }
    }

    /// Create an UnknownRuleField error
    pub fn unknown_rule_field(rule: impl Into<String>, field: impl Into<String>) -> Self {
        EngineError::UnknownRuleField {
            rule: rule.into(),
            field: field.into(),
        }
    }

    /// Create an InvalidDefault error
    pub fn invalid_default(field: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InvalidDefault {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Create an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        EngineError::Internal {
            message: message.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(
        operation: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        EngineError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a FileLocked error
    pub fn file_locked(
        path: impl Into<String>,
        locked_by: impl Into<String>,
        locked_at: impl Into<String>,
    ) -> Self {
        EngineError::FileLocked {
            path: path.into(),
            locked_by: locked_by.into(),
            locked_at: locked_at.into(),
        }
    }

    /// True for schema defects that must stop engine start-up
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            EngineError::DuplicateField { .. }
                | EngineError::DanglingDependency { .. }
                | EngineError::UnknownRuleField { .. }
                | EngineError::InvalidDefault { .. }
                | EngineError::DependencyCycle { .. }
        )
    }

    /// Create an InvalidSetting error
    pub fn invalid_setting(
        setting: impl Into<String>,
        value: f64,
        reason: impl Into<String>,
    ) -> Self {
        EngineError::InvalidSetting {
            setting: setting.into(),
            value,
            reason: reason.into(),
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            EngineError::DuplicateField { .. } => "DUPLICATE_FIELD",
            EngineError::DanglingDependency { .. } => "DANGLING_DEPENDENCY",
            EngineError::UnknownRuleField { .. } => "UNKNOWN_RULE_FIELD",
            EngineError::InvalidDefault { .. } => "INVALID_DEFAULT",
            EngineError::DependencyCycle { .. } => "DEPENDENCY_CYCLE",
            EngineError::Internal { .. } => "INTERNAL_ERROR",
            EngineError::FileError { .. } => "FILE_ERROR",
            EngineError::FileLocked { .. } => "FILE_LOCKED",
            EngineError::SerializationError { .. } => "SERIALIZATION_ERROR",
            EngineError::InvalidSetting { .. } => "INVALID_SETTING",
            EngineError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = EngineError::DependencyCycle {
            cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"type\":\"DependencyCycle\""));
        let roundtrip: EngineError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_cycle_message() {
        let error = EngineError::DependencyCycle {
            cycle: vec!["a".to_string(), "b".to_string(), "a".to_string()],
        };
        assert_eq!(error.to_string(), "Schema error: dependency cycle a -> b -> a");
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(EngineError::duplicate_field("span").error_code(), "DUPLICATE_FIELD");
        assert_eq!(EngineError::internal("oops").error_code(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_configuration_classification() {
        assert!(EngineError::duplicate_field("span").is_configuration());
        assert!(EngineError::dangling_dependency("a", "b").is_configuration());
        assert!(!EngineError::internal("oops").is_configuration());
        assert!(!EngineError::file_error("open", "x.bdf", "missing").is_configuration());
    }
}
