//! Shared result types for synchronizer ports.
//!
//! "Already processed" is a success value, not an error. A synchronizer
//! that has seen its idempotency key before returns
//! `Ok(SyncOutcome::AlreadyProcessed)`, so no amount of error wrapping can
//! turn a duplicate into a failure.

use thiserror::Error;

/// Successful result of a synchronizer call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome<T> {
    /// A new state change was applied.
    Applied(T),
    /// The operation for this key had already completed; nothing changed.
    AlreadyProcessed,
}

impl<T> SyncOutcome<T> {
    /// Returns true if this call produced a new side effect.
    pub fn is_applied(&self) -> bool {
        matches!(self, SyncOutcome::Applied(_))
    }

    /// Discards the payload.
    pub fn map_unit(self) -> SyncOutcome<()> {
        match self {
            SyncOutcome::Applied(_) => SyncOutcome::Applied(()),
            SyncOutcome::AlreadyProcessed => SyncOutcome::AlreadyProcessed,
        }
    }
}

/// A synchronizer failure other than duplication.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The referenced provider object is not known locally.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The requested transition is not valid for the local record.
    #[error("Invalid state transition: {0}")]
    InvalidTransition(String),

    /// Persistence failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// The provider API call made during synchronization failed.
    #[error("Provider error: {0}")]
    Provider(String),

    /// The synchronization task stopped before completing.
    #[error("Synchronization aborted: {0}")]
    Aborted(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn applied_is_applied() {
        assert!(SyncOutcome::Applied(1).is_applied());
        assert!(!SyncOutcome::<i32>::AlreadyProcessed.is_applied());
    }

    #[test]
    fn map_unit_preserves_variant() {
        assert_eq!(SyncOutcome::Applied("order").map_unit(), SyncOutcome::Applied(()));
        assert_eq!(
            SyncOutcome::<&str>::AlreadyProcessed.map_unit(),
            SyncOutcome::AlreadyProcessed
        );
    }

    #[test]
    fn storage_error_displays_reason() {
        let err = SyncError::Storage("connection refused".to_string());
        assert_eq!(format!("{}", err), "Storage error: connection refused");
    }
}
