//! # Error Types
//!
//! Structured error types for laminate_core. Every failure names the rule that
//! was violated and, where a single ply is at fault, the stacking index of that
//! ply, so a caller can point the user at the offending row of the stack.
//!
//! ## Example
//!
//! ```rust
//! use laminate_core::errors::{LaminateError, LaminateResult};
//!
//! fn validate_thickness(index: usize, thickness: f64) -> LaminateResult<()> {
//!     if thickness <= 0.0 {
//!         return Err(LaminateError::configuration_at(
//!             index,
//!             format!("thickness must be positive (got {})", thickness),
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! let err = validate_thickness(2, 0.0).unwrap_err();
//! assert_eq!(err.ply_index(), Some(2));
//! assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for laminate_core operations
pub type LaminateResult<T> = Result<T, LaminateError>;

/// Structured error type for laminate operations.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "details")]
pub enum LaminateError {
    /// Malformed laminate definition (mismatched lists, empty stack, bad thickness)
    #[error("Configuration error{}: {rule}", ply_suffix(.ply_index))]
    Configuration {
        ply_index: Option<usize>,
        rule: String,
    },

    /// Physically inconsistent material constants
    #[error("Domain error{}: {rule}", ply_suffix(.ply_index))]
    Domain {
        ply_index: Option<usize>,
        rule: String,
    },

    /// The normalized extensional matrix cannot be inverted
    #[error("Singular matrix: {reason}")]
    SingularMatrix { reason: String },

    /// File I/O error
    #[error("File error: {operation} on '{path}' - {reason}")]
    FileError {
        operation: String,
        path: String,
        reason: String,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {reason}")]
    SerializationError { reason: String },

    /// Schema version mismatch
    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: String,
        expected_version: String,
    },
}

fn ply_suffix(index: &Option<usize>) -> String {
    match index {
        Some(i) => format!(" at ply {}", i),
        None => String::new(),
    }
}

impl LaminateError {
    /// Create a Configuration error not tied to a single ply
    pub fn configuration(rule: impl Into<String>) -> Self {
        LaminateError::Configuration {
            ply_index: None,
            rule: rule.into(),
        }
    }

    /// Create a Configuration error for the ply at `index`
    pub fn configuration_at(index: usize, rule: impl Into<String>) -> Self {
        LaminateError::Configuration {
            ply_index: Some(index),
            rule: rule.into(),
        }
    }

    /// Create a Domain error not (yet) tied to a ply
    pub fn domain(rule: impl Into<String>) -> Self {
        LaminateError::Domain {
            ply_index: None,
            rule: rule.into(),
        }
    }

    /// Create a SingularMatrix error
    pub fn singular_matrix(reason: impl Into<String>) -> Self {
        LaminateError::SingularMatrix {
            reason: reason.into(),
        }
    }

    /// Create a FileError
    pub fn file_error(operation: impl Into<String>, path: impl Into<String>, reason: impl Into<String>) -> Self {
        LaminateError::FileError {
            operation: operation.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Attach a ply index to a per-ply error.
    ///
    /// Errors that already carry an index, and errors that are not about a
    /// single ply, are returned unchanged.
    pub fn at_ply(self, index: usize) -> Self {
        match self {
            LaminateError::Configuration { ply_index: None, rule } => LaminateError::Configuration {
                ply_index: Some(index),
                rule,
            },
            LaminateError::Domain { ply_index: None, rule } => LaminateError::Domain {
                ply_index: Some(index),
                rule,
            },
            other => other,
        }
    }

    /// Stacking index of the offending ply, if the error concerns one ply
    pub fn ply_index(&self) -> Option<usize> {
        match self {
            LaminateError::Configuration { ply_index, .. } | LaminateError::Domain { ply_index, .. } => *ply_index,
            _ => None,
        }
    }

    /// Get a short error code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            LaminateError::Configuration { .. } => "CONFIGURATION_ERROR",
            LaminateError::Domain { .. } => "DOMAIN_ERROR",
            LaminateError::SingularMatrix { .. } => "SINGULAR_MATRIX",
            LaminateError::FileError { .. } => "FILE_ERROR",
            LaminateError::SerializationError { .. } => "SERIALIZATION_ERROR",
            LaminateError::VersionMismatch { .. } => "VERSION_MISMATCH",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_serialization() {
        let error = LaminateError::domain("nu_lt * nu_tl must be < 1").at_ply(3);
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"Domain\""));
        let roundtrip: LaminateError = serde_json::from_str(&json).unwrap();
        assert_eq!(error, roundtrip);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(LaminateError::configuration("empty").error_code(), "CONFIGURATION_ERROR");
        assert_eq!(LaminateError::singular_matrix("det = 0").error_code(), "SINGULAR_MATRIX");
    }

    #[test]
    fn test_at_ply_keeps_existing_index() {
        let err = LaminateError::configuration_at(1, "thickness must be positive").at_ply(7);
        assert_eq!(err.ply_index(), Some(1));

        let err = LaminateError::singular_matrix("x").at_ply(7);
        assert_eq!(err.ply_index(), None);
    }

    #[test]
    fn test_display_mentions_ply() {
        let err = LaminateError::configuration_at(4, "thickness must be positive");
        assert_eq!(err.to_string(), "Configuration error at ply 4: thickness must be positive");

        let err = LaminateError::configuration("ply list is empty");
        assert_eq!(err.to_string(), "Configuration error: ply list is empty");
    }
}
