//! Error types for status accounting.
//!
//! All errors that can occur while registering definitions or mutating
//! status collections are represented by the `StatusError` enum.

use crate::entity::EntityKind;
use crate::status_id::StatusId;
use thiserror::Error;

/// Errors that can occur during status accounting.
///
/// Rejections by the capability gate (`Unsupported`, `DefinitionNotFound`)
/// are turned into `Ok(false)` by the mutating calls on
/// [`StatusCollection`](crate::StatusCollection); the remaining variants are
/// surfaced to the caller.
///
/// # Examples
///
/// ```rust
/// use zzstatus::{StatusError, StatusId};
///
/// let err = StatusError::DefinitionNotFound(StatusId::from_str("Poison"));
/// assert_eq!(err.to_string(), "Status definition not found: Poison");
/// ```
#[derive(Debug, Error, Clone, PartialEq)]
pub enum StatusError {
    /// No definition is registered for the status.
    #[error("Status definition not found: {0}")]
    DefinitionNotFound(StatusId),

    /// The status is banned for, or not supported by, the entity kind.
    #[error("Status {status} is not supported for entity kind {kind}")]
    Unsupported { status: StatusId, kind: EntityKind },

    /// A payload or context value does not match what the status expects.
    ///
    /// This is a programmer error, for example a percentage delta sent to
    /// a status without a percentage facet.
    #[error("Type mismatch for {subject}: expected {expected}, found {found}")]
    TypeMismatch {
        subject: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A level delta could not be converted to fixed-point.
    #[error("Invalid level delta for status {0}: {1}")]
    InvalidDelta(StatusId, String),

    /// A definition failed validation at registration.
    #[error("Invalid definition for status {0}: {1}")]
    InvalidDefinition(StatusId, String),

    /// Configuration could not be parsed.
    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl StatusError {
    /// Whether this error is a capability-gate rejection rather than a
    /// failure the caller has to handle.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            StatusError::DefinitionNotFound(_) | StatusError::Unsupported { .. }
        )
    }
}

impl From<serde_json::Error> for StatusError {
    fn from(err: serde_json::Error) -> Self {
        StatusError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StatusError::Unsupported {
            status: StatusId::from_str("Burn"),
            kind: EntityKind::from_str("Golem"),
        };
        let display = err.to_string();
        assert!(display.contains("Burn"));
        assert!(display.contains("Golem"));
    }

    #[test]
    fn test_type_mismatch_display() {
        let err = StatusError::TypeMismatch {
            subject: "status Poison".into(),
            expected: "stack delta",
            found: "percentage delta",
        };
        assert_eq!(
            err.to_string(),
            "Type mismatch for status Poison: expected stack delta, found percentage delta"
        );
    }

    #[test]
    fn test_rejection_classification() {
        assert!(StatusError::DefinitionNotFound(StatusId::from_str("X")).is_rejection());
        assert!(!StatusError::Parse("eof".into()).is_rejection());
    }

    #[test]
    fn test_from_json_error() {
        let err: StatusError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, StatusError::Parse(_)));
    }
}
