//! Error types for leadmatch.
//!
//! All errors are strongly typed using thiserror. A non-match from the
//! pairwise matcher and a missing lead on merge are *not* errors; both are
//! expressed as `None` so callers can pattern-match on the real failures.

use thiserror::Error;

use crate::lead::LeadId;
use crate::storage::StorageError;

/// Validation errors that occur before any store mutation.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Institution name cannot be empty")]
    EmptyInstitutionName,

    #[error("State cannot be empty")]
    EmptyState,

    #[error("Cannot merge lead {id} with itself")]
    SameLead {
        id: LeadId,
    },

    #[error("Threshold '{field}' is out of range [0, 100]: {value}")]
    ThresholdOutOfRange {
        field: &'static str,
        value: u8,
    },

    #[error("Threshold '{lower}' must not exceed '{upper}'")]
    ThresholdOrder {
        lower: &'static str,
        upper: &'static str,
    },

    #[error("Invalid matcher configuration: {reason}")]
    InvalidConfig {
        reason: String,
    },
}

/// Top-level error type for leadmatch.
///
/// Store failures propagate through unmodified; the engine performs no
/// retries and swallows nothing.
#[derive(Debug, Error)]
pub enum DedupError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl DedupError {
    /// Returns true if this is a validation error.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Returns true if this is a storage error.
    #[must_use]
    pub const fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

/// Result type alias for leadmatch operations.
pub type DedupResult<T> = Result<T, DedupError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_same_lead() {
        let err = ValidationError::SameLead { id: LeadId::new(5) };
        let msg = format!("{err}");
        assert!(msg.contains('5'));
        assert!(msg.contains("itself"));
    }

    #[test]
    fn test_threshold_error_display() {
        let err = ValidationError::ThresholdOutOfRange {
            field: "min_average",
            value: 140,
        };
        let msg = format!("{err}");
        assert!(msg.contains("min_average"));
        assert!(msg.contains("140"));
    }

    #[test]
    fn test_dedup_error_from_validation() {
        let err: DedupError = ValidationError::EmptyState.into();
        assert!(err.is_validation());
        assert!(!err.is_storage());
    }

    #[test]
    fn test_dedup_error_from_storage() {
        let err: DedupError = StorageError::Backend("connection refused".to_string()).into();
        assert!(err.is_storage());
        assert!(format!("{err}").contains("connection refused"));
    }
}
