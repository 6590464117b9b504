//! Error types for lexeme operations
//!
//! One enum covers the whole crate. Variants fall into two groups:
//!
//! - **User-correctable:** malformed ids, conflicts, missing sub-entities,
//!   unset fields, commands aimed at the wrong kind of target and
//!   minimum-content violations. These reach the caller for translation into
//!   a user-facing message.
//! - **Logic errors:** invariant violations, closed-handle misuse and
//!   malformed patches. These indicate a bug in the caller and abort the
//!   operation.

use thiserror::Error;

/// Result type alias for lexeme operations
pub type Result<T> = std::result::Result<T, LexemeError>;

/// Errors that can occur while building, diffing or patching a lexeme
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LexemeError {
    /// An identifier did not match its pattern or exceeded the numeric range
    #[error("invalid {kind} id '{value}': {reason}")]
    InvalidFormat {
        kind: &'static str,
        value: String,
        reason: &'static str,
    },

    /// `add` was called with an id that is already present
    #[error("conflict: an entry with id '{id}' already exists")]
    Conflict { id: String },

    /// A lookup that requires the entry to exist came back empty
    #[error("not found: '{id}'")]
    NotFound { id: String },

    /// A required single-valued field has not been set yet
    #[error("field '{field}' is not set")]
    UnsetField { field: &'static str },

    /// Counters, ids or sets are inconsistent with each other
    #[error("invariant violation: {0}")]
    InvariantViolation(String),

    /// A patch access handle was used after it was closed
    #[error("patch access handle is closed")]
    ClosedHandle,

    /// A diff entry had a shape the patcher cannot apply
    #[error("unexpected patch shape: {0}")]
    PatchShape(String),

    /// A form or sense was left without representations or glosses
    #[error("{entity} must have at least one {field}")]
    MinimumContent {
        entity: &'static str,
        field: &'static str,
    },

    /// A change op was applied to a target of the wrong kind
    #[error("{op} can only be applied to a {expected}")]
    WrongTarget {
        op: &'static str,
        expected: &'static str,
    },

    /// Persisted data could not be encoded or decoded
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl LexemeError {
    /// Whether the error is expected user input rather than a programming bug
    pub fn is_user_correctable(&self) -> bool {
        !matches!(
            self,
            LexemeError::InvariantViolation(_)
                | LexemeError::ClosedHandle
                | LexemeError::PatchShape(_)
        )
    }

    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!(target: "lexeme_core", %message, "invariant violation");
        LexemeError::InvariantViolation(message)
    }

    pub(crate) fn patch_shape(message: impl Into<String>) -> Self {
        let message = message.into();
        tracing::error!(target: "lexeme_core", %message, "unexpected patch shape");
        LexemeError::PatchShape(message)
    }
}

impl From<serde_json::Error> for LexemeError {
    fn from(e: serde_json::Error) -> Self {
        LexemeError::Serialization(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        assert!(LexemeError::Conflict { id: "L1-F1".into() }.is_user_correctable());
        assert!(LexemeError::MinimumContent {
            entity: "form",
            field: "representation"
        }
        .is_user_correctable());
        assert!(!LexemeError::ClosedHandle.is_user_correctable());
        assert!(!LexemeError::InvariantViolation("x".into()).is_user_correctable());
        assert!(!LexemeError::PatchShape("x".into()).is_user_correctable());
    }

    #[test]
    fn test_display() {
        let err = LexemeError::MinimumContent {
            entity: "form",
            field: "representation",
        };
        assert_eq!(err.to_string(), "form must have at least one representation");
    }
}
