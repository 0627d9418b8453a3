//! WebhookReporter port - Out-of-band visibility for webhook requests.
//!
//! Every request produces exactly one [`WebhookReport`]. Reports are for
//! operators (dashboards, alerting, idempotency audits); they never feed
//! back into control flow or the HTTP response.

use serde::Serialize;

use crate::domain::webhook::OutcomeClass;

/// Summary of one webhook request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WebhookReport {
    /// Classification that selected the response.
    pub outcome: OutcomeClass,
    /// Provider path segment the request arrived on.
    pub provider: String,
    /// Tenant the endpoint serves.
    pub tenant_id: String,
    /// Whether the endpoint runs against the provider's test environment.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub test_mode: bool,
    /// Provider event id, once authenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_id: Option<String>,
    /// Provider event type, once authenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    /// Tenant id declared by the event, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_tenant_id: Option<String>,
    /// Provider object the synchronizer was keyed on.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    /// Failure detail for rejected requests and downstream failures.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl WebhookReport {
    /// Creates a report with only the classification and endpoint context.
    pub fn new(outcome: OutcomeClass, provider: impl Into<String>, tenant_id: impl Into<String>) -> Self {
        Self {
            outcome,
            provider: provider.into(),
            tenant_id: tenant_id.into(),
            test_mode: false,
            event_id: None,
            event_type: None,
            event_tenant_id: None,
            resource_id: None,
            error: None,
        }
    }

    pub fn with_test_mode(mut self, test_mode: bool) -> Self {
        self.test_mode = test_mode;
        self
    }

    pub fn with_event(mut self, event_id: impl Into<String>, event_type: impl Into<String>) -> Self {
        self.event_id = Some(event_id.into());
        self.event_type = Some(event_type.into());
        self
    }

    pub fn with_event_tenant(mut self, event_tenant_id: Option<String>) -> Self {
        self.event_tenant_id = event_tenant_id;
        self
    }

    pub fn with_resource(mut self, resource_id: Option<String>) -> Self {
        self.resource_id = resource_id;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Port for recording webhook classifications.
pub trait WebhookReporter: Send + Sync {
    /// Records one request. Must not block or fail the request.
    fn record(&self, report: &WebhookReport);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_builder_sets_fields() {
        let report = WebhookReport::new(OutcomeClass::ProcessedWithInternalError, "stripe", "tenant_a")
            .with_event("evt_1", "payment_intent.succeeded")
            .with_resource(Some("pi_1".to_string()))
            .with_error("Storage error: timeout");

        assert_eq!(report.event_id.as_deref(), Some("evt_1"));
        assert_eq!(report.resource_id.as_deref(), Some("pi_1"));
        assert_eq!(report.error.as_deref(), Some("Storage error: timeout"));
    }

    #[test]
    fn report_serializes_without_empty_fields() {
        let report = WebhookReport::new(OutcomeClass::Malformed, "stripe", "tenant_a");
        let json = serde_json::to_string(&report).unwrap();
        assert!(!json.contains("event_id"));
        assert!(json.contains("\"outcome\":\"malformed\""));
        assert!(!json.contains("test_mode"));
    }

    #[test]
    fn report_carries_test_mode() {
        let report = WebhookReport::new(OutcomeClass::TenantMismatch, "stripe", "tenant_a")
            .with_test_mode(true);

        assert!(report.test_mode);
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"test_mode\":true"));
    }
}
