//! Outcome classification for a single webhook request.
//!
//! Every request ends in exactly one [`OutcomeClass`]. The class, not the
//! success of downstream work, decides the HTTP response.

use std::fmt;

use serde::Serialize;

/// Computed category of an inbound webhook request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeClass {
    /// Signature present but invalid.
    AuthRejected,
    /// Bad method, missing signature, or undecodable payload.
    Malformed,
    /// Authentic event addressed to another tenant (or to none).
    TenantMismatch,
    /// Authentic event with no mutation to perform.
    Unhandled,
    /// Synchronizer applied a new state change.
    ProcessedNew,
    /// Synchronizer reported the change had already been applied.
    ProcessedDuplicate,
    /// Synchronizer failed; acknowledged anyway and reported out of band.
    ProcessedWithInternalError,
}

impl OutcomeClass {
    /// Returns true if the sender gets `200 {"received": true}`.
    ///
    /// Only pre-routing failures are rejected. Once an event is authenticated
    /// and decoded, every class is acknowledged.
    pub fn is_acknowledged(&self) -> bool {
        !matches!(self, OutcomeClass::AuthRejected | OutcomeClass::Malformed)
    }

    /// Returns true if a synchronizer was invoked for this request.
    pub fn invoked_synchronizer(&self) -> bool {
        matches!(
            self,
            OutcomeClass::ProcessedNew
                | OutcomeClass::ProcessedDuplicate
                | OutcomeClass::ProcessedWithInternalError
        )
    }

    /// Stable label used in logs and reports.
    pub fn as_str(&self) -> &'static str {
        match self {
            OutcomeClass::AuthRejected => "auth_rejected",
            OutcomeClass::Malformed => "malformed",
            OutcomeClass::TenantMismatch => "tenant_mismatch",
            OutcomeClass::Unhandled => "unhandled",
            OutcomeClass::ProcessedNew => "processed_new",
            OutcomeClass::ProcessedDuplicate => "processed_duplicate",
            OutcomeClass::ProcessedWithInternalError => "processed_with_internal_error",
        }
    }
}

impl fmt::Display for OutcomeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [OutcomeClass; 7] = [
        OutcomeClass::AuthRejected,
        OutcomeClass::Malformed,
        OutcomeClass::TenantMismatch,
        OutcomeClass::Unhandled,
        OutcomeClass::ProcessedNew,
        OutcomeClass::ProcessedDuplicate,
        OutcomeClass::ProcessedWithInternalError,
    ];

    #[test]
    fn only_pre_routing_failures_are_rejected() {
        let rejected: Vec<_> = ALL.iter().filter(|c| !c.is_acknowledged()).collect();
        assert_eq!(
            rejected,
            vec![&OutcomeClass::AuthRejected, &OutcomeClass::Malformed]
        );
    }

    #[test]
    fn internal_error_is_still_acknowledged() {
        assert!(OutcomeClass::ProcessedWithInternalError.is_acknowledged());
    }

    #[test]
    fn duplicate_is_acknowledged() {
        assert!(OutcomeClass::ProcessedDuplicate.is_acknowledged());
    }

    #[test]
    fn tenant_mismatch_never_counts_as_synchronizer_call() {
        assert!(!OutcomeClass::TenantMismatch.invoked_synchronizer());
        assert!(!OutcomeClass::Unhandled.invoked_synchronizer());
    }

    #[test]
    fn display_matches_serialized_label() {
        for class in ALL {
            let json = serde_json::to_string(&class).unwrap();
            assert_eq!(json, format!("\"{}\"", class));
        }
    }
}
