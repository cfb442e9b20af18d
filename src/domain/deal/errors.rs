//! Deal-specific error types.

use thiserror::Error;

use super::DealStatus;
use crate::domain::foundation::{DealId, DomainError, ErrorCode, ValidationError};

/// Errors surfaced by deal operations.
///
/// Every variant except `Infrastructure` is an expected business-rule
/// rejection; none of them is retried by the system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DealError {
    #[error("Deal not found: {0}")]
    NotFound(DealId),

    #[error("Permission denied")]
    Forbidden,

    #[error("Cannot transition deal from {from} to {to}")]
    InvalidTransition { from: DealStatus, to: DealStatus },

    #[error("Validation failed for '{field}': {message}")]
    ValidationFailed { field: String, message: String },

    #[error("Deal {0} was modified by another request")]
    ConcurrentModification(DealId),

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl DealError {
    pub fn invalid_transition(from: DealStatus, to: DealStatus) -> Self {
        DealError::InvalidTransition { from, to }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        DealError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Maps a port error raised while working on a specific deal.
    pub fn for_deal(id: DealId) -> impl Fn(DomainError) -> DealError {
        move |err| match err.code {
            ErrorCode::DealNotFound => DealError::NotFound(id),
            ErrorCode::ConcurrencyConflict | ErrorCode::TermsAlreadyLocked => {
                DealError::ConcurrentModification(id)
            }
            _ => DealError::from(err),
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            DealError::NotFound(_) => ErrorCode::DealNotFound,
            DealError::Forbidden => ErrorCode::Forbidden,
            DealError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            DealError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            DealError::ConcurrentModification(_) => ErrorCode::ConcurrencyConflict,
            DealError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }
}

impl From<ValidationError> for DealError {
    fn from(err: ValidationError) -> Self {
        DealError::ValidationFailed {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for DealError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden => DealError::Forbidden,
            ErrorCode::ValidationFailed => DealError::ValidationFailed {
                field: err
                    .details
                    .get("field")
                    .cloned()
                    .unwrap_or_else(|| "unknown".to_string()),
                message: err.message,
            },
            _ => DealError::Infrastructure(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_transition_names_both_statuses() {
        let err = DealError::invalid_transition(DealStatus::Paid, DealStatus::Declined);
        assert_eq!(err.to_string(), "Cannot transition deal from PAID to DECLINED");
        assert_eq!(err.code(), ErrorCode::InvalidStateTransition);
    }

    #[test]
    fn validation_error_keeps_field() {
        let err: DealError = ValidationError::empty_field("title").into();
        assert!(matches!(
            err,
            DealError::ValidationFailed { ref field, .. } if field == "title"
        ));
    }

    #[test]
    fn for_deal_maps_conflicts_and_missing_rows() {
        let id = DealId::new();
        let map = DealError::for_deal(id);

        assert_eq!(
            map(DomainError::new(ErrorCode::ConcurrencyConflict, "stale")),
            DealError::ConcurrentModification(id)
        );
        assert_eq!(
            map(DomainError::new(ErrorCode::DealNotFound, "gone")),
            DealError::NotFound(id)
        );
        assert!(matches!(
            map(DomainError::new(ErrorCode::DatabaseError, "boom")),
            DealError::Infrastructure(_)
        ));
    }
}
