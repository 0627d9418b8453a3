//! Tenant isolation for a shared webhook endpoint.
//!
//! The signature proves *who sent* an event, not *which tenant* it is for.
//! The tenant id embedded in event metadata is untrusted intent and must
//! match the endpoint's configured tenant before any synchronizer runs.

use tracing::{debug, info, warn};

use super::endpoint::EndpointConfig;
use super::event::EventEnvelope;

/// Result of checking an event against the endpoint tenant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TenantDecision {
    /// Event is addressed to this endpoint's tenant.
    Allowed { tenant_id: String },
    /// Event names a different tenant.
    Mismatch { event_tenant_id: String },
    /// Event carries no tenant metadata.
    Missing,
}

impl TenantDecision {
    /// Returns true only when synchronization may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, TenantDecision::Allowed { .. })
    }
}

/// Guards synchronizers against cross-tenant events.
pub struct TenantGuard;

impl TenantGuard {
    /// Compares the event tenant to the endpoint tenant.
    ///
    /// Mismatches are logged at `warn` in production and `debug` in test
    /// mode, where tooling routinely sends events without tenant metadata.
    /// The decision itself is identical in both modes.
    pub fn authorize(envelope: &EventEnvelope, config: &EndpointConfig) -> TenantDecision {
        let expected = config.tenant_id();
        let decision = Self::decide(envelope.tenant_id(), expected);

        match &decision {
            TenantDecision::Allowed { .. } => {}
            TenantDecision::Mismatch { event_tenant_id } => {
                if config.is_test_mode() {
                    debug!(
                        event_id = %envelope.id,
                        event_type = %envelope.event_type,
                        event_tenant_id = %event_tenant_id,
                        endpoint_tenant_id = %expected,
                        "Skipping webhook for another tenant (test mode)"
                    );
                } else {
                    warn!(
                        event_id = %envelope.id,
                        event_type = %envelope.event_type,
                        event_tenant_id = %event_tenant_id,
                        endpoint_tenant_id = %expected,
                        "Webhook tenant mismatch, skipping synchronization"
                    );
                }
            }
            TenantDecision::Missing => {
                if config.is_test_mode() {
                    debug!(
                        event_id = %envelope.id,
                        event_type = %envelope.event_type,
                        endpoint_tenant_id = %expected,
                        "Webhook has no tenant metadata (test mode)"
                    );
                } else {
                    info!(
                        event_id = %envelope.id,
                        event_type = %envelope.event_type,
                        endpoint_tenant_id = %expected,
                        "Webhook has no tenant metadata, skipping synchronization"
                    );
                }
            }
        }

        decision
    }

    /// Pure comparison, separated from logging for property tests.
    pub fn decide(event_tenant_id: Option<&str>, endpoint_tenant_id: &str) -> TenantDecision {
        match event_tenant_id {
            None => TenantDecision::Missing,
            // An unconfigured endpoint tenant never authorizes anything
            Some(_) if endpoint_tenant_id.is_empty() => TenantDecision::Missing,
            Some(tenant) if tenant == endpoint_tenant_id => TenantDecision::Allowed {
                tenant_id: tenant.to_string(),
            },
            Some(tenant) => TenantDecision::Mismatch {
                event_tenant_id: tenant.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::webhook::event::EventEnvelopeBuilder;
    use proptest::prelude::*;
    use serde_json::json;

    fn envelope_for(tenant: serde_json::Value) -> EventEnvelope {
        EventEnvelopeBuilder::new()
            .object(json!({"id": "pi_1", "metadata": {"tenant_id": tenant}}))
            .build()
    }

    #[test]
    fn matching_tenant_is_allowed() {
        let config = EndpointConfig::new("whsec_x", "tenant_a", false);
        let decision = TenantGuard::authorize(&envelope_for(json!("tenant_a")), &config);
        assert_eq!(
            decision,
            TenantDecision::Allowed {
                tenant_id: "tenant_a".to_string()
            }
        );
    }

    #[test]
    fn other_tenant_is_mismatch_in_production() {
        let config = EndpointConfig::new("whsec_x", "tenant_a", false);
        let decision = TenantGuard::authorize(&envelope_for(json!("tenant_b")), &config);
        assert_eq!(
            decision,
            TenantDecision::Mismatch {
                event_tenant_id: "tenant_b".to_string()
            }
        );
    }

    #[test]
    fn other_tenant_is_mismatch_in_test_mode() {
        let config = EndpointConfig::new("whsec_x", "tenant_a", true);
        let decision = TenantGuard::authorize(&envelope_for(json!("tenant_b")), &config);
        assert!(!decision.is_allowed());
    }

    #[test]
    fn missing_metadata_is_not_allowed() {
        let config = EndpointConfig::new("whsec_x", "tenant_a", true);
        let envelope = EventEnvelopeBuilder::new().object(json!({"id": "pi_1"})).build();
        assert_eq!(TenantGuard::authorize(&envelope, &config), TenantDecision::Missing);
    }

    #[test]
    fn non_string_tenant_is_not_allowed() {
        let config = EndpointConfig::new("whsec_x", "tenant_a", false);
        let decision = TenantGuard::authorize(&envelope_for(json!(["tenant_a"])), &config);
        assert!(!decision.is_allowed());
    }

    #[test]
    fn comparison_is_exact() {
        assert!(!TenantGuard::decide(Some("Tenant_A"), "tenant_a").is_allowed());
        assert!(!TenantGuard::decide(Some("tenant_a "), "tenant_a").is_allowed());
    }

    #[test]
    fn empty_endpoint_tenant_never_allows() {
        assert!(!TenantGuard::decide(Some(""), "").is_allowed());
    }

    proptest! {
        #[test]
        fn differing_tenants_are_never_allowed(event in ".*", endpoint in ".*") {
            prop_assume!(event != endpoint);
            prop_assert!(!TenantGuard::decide(Some(&event), &endpoint).is_allowed());
        }

        #[test]
        fn allowed_tenant_always_equals_endpoint(event in "[a-z_]{0,12}", endpoint in "[a-z_]{0,12}") {
            if let TenantDecision::Allowed { tenant_id } = TenantGuard::decide(Some(&event), &endpoint) {
                prop_assert_eq!(tenant_id, endpoint);
            }
        }
    }
}
