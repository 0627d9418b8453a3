//! `WebhookReporter` backed by structured tracing events.
//!
//! Every report becomes one event on the `webhook_report` target, so a log
//! pipeline can alert on `processed_with_internal_error` without parsing
//! messages.

use tracing::{debug, error, info, warn};

use crate::domain::webhook::OutcomeClass;
use crate::ports::{WebhookReport, WebhookReporter};

/// Emits each report as a tracing event.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl WebhookReporter for TracingReporter {
    fn record(&self, report: &WebhookReport) {
        let event_id = report.event_id.as_deref().unwrap_or_default();
        let event_type = report.event_type.as_deref().unwrap_or_default();
        let resource_id = report.resource_id.as_deref().unwrap_or_default();
        let detail = report.error.as_deref().unwrap_or_default();

        match report.outcome {
            OutcomeClass::ProcessedWithInternalError => error!(
                target: "webhook_report",
                outcome = %report.outcome,
                provider = %report.provider,
                tenant_id = %report.tenant_id,
                event_id,
                event_type,
                resource_id,
                error = detail,
                "webhook report"
            ),
            OutcomeClass::TenantMismatch if report.test_mode => debug!(
                target: "webhook_report",
                outcome = %report.outcome,
                provider = %report.provider,
                tenant_id = %report.tenant_id,
                event_tenant_id = report.event_tenant_id.as_deref().unwrap_or_default(),
                event_id,
                event_type,
                test_mode = true,
                "webhook report"
            ),
            OutcomeClass::AuthRejected | OutcomeClass::TenantMismatch => warn!(
                target: "webhook_report",
                outcome = %report.outcome,
                provider = %report.provider,
                tenant_id = %report.tenant_id,
                event_tenant_id = report.event_tenant_id.as_deref().unwrap_or_default(),
                event_id,
                event_type,
                error = detail,
                "webhook report"
            ),
            _ => info!(
                target: "webhook_report",
                outcome = %report.outcome,
                provider = %report.provider,
                tenant_id = %report.tenant_id,
                event_id,
                event_type,
                resource_id,
                "webhook report"
            ),
        }
    }
}
