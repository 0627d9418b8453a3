//! ProcessWebhookHandler - Command handler for one inbound webhook request.
//!
//! Pipeline: verify → decode → route → tenant guard → synchronize → classify.
//! Pre-routing failures come back as `Err(WebhookError)`; everything after
//! a successful decode is an `Ok` classification, including synchronizer
//! failures.

use std::sync::Arc;

use axum::body::Bytes;
use tracing::{debug, error, info, warn};

use crate::domain::webhook::{
    EndpointConfig, EventEnvelope, InboundEvent, OutcomeClass, SignatureVerifier, TenantDecision,
    TenantGuard, WebhookError,
};
use crate::ports::{
    OrderDetail, OrderSynchronizer, SubscriptionInvoiceSynchronizer,
    SubscriptionLifecycleSynchronizer, SyncError, SyncOutcome, WebhookReport, WebhookReporter,
};

use super::router::{plan, Plan, Route, SyncCall, WebhookRouter};

/// Command to process a webhook request.
#[derive(Debug, Clone)]
pub struct ProcessWebhookCommand {
    /// Raw request body, byte-exact as received.
    pub payload: Bytes,
    /// Signature header value, if the request carried one.
    pub signature: Option<String>,
}

/// Result of processing an authenticated event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessWebhookResult {
    pub outcome: OutcomeClass,
    pub event_id: String,
    pub event_type: String,
    /// Order created by this request, for order-producing events.
    pub order: Option<OrderDetail>,
}

/// Synchronizers driven by the webhook handler.
#[derive(Clone)]
pub struct Synchronizers {
    pub orders: Arc<dyn OrderSynchronizer>,
    pub invoices: Arc<dyn SubscriptionInvoiceSynchronizer>,
    pub subscriptions: Arc<dyn SubscriptionLifecycleSynchronizer>,
}

/// Handler for one mounted webhook endpoint.
pub struct ProcessWebhookHandler {
    provider: String,
    endpoint: Arc<EndpointConfig>,
    verifier: SignatureVerifier,
    router: WebhookRouter,
    synchronizers: Synchronizers,
    reporter: Arc<dyn WebhookReporter>,
}

impl ProcessWebhookHandler {
    pub fn new(
        provider: impl Into<String>,
        endpoint: Arc<EndpointConfig>,
        synchronizers: Synchronizers,
        reporter: Arc<dyn WebhookReporter>,
    ) -> Self {
        let verifier = SignatureVerifier::new(endpoint.signing_secret());
        Self {
            provider: provider.into(),
            endpoint,
            verifier,
            router: WebhookRouter::standard(),
            synchronizers,
            reporter,
        }
    }

    /// Overrides the signature tolerance window.
    pub fn with_tolerance(mut self, tolerance_secs: i64) -> Self {
        self.verifier = self.verifier.with_tolerance(tolerance_secs);
        self
    }

    pub fn provider(&self) -> &str {
        &self.provider
    }

    pub fn endpoint(&self) -> &EndpointConfig {
        &self.endpoint
    }

    /// Records and returns a request rejected before it reached the
    /// verifier (wrong method).
    pub fn reject(&self, err: WebhookError) -> WebhookError {
        self.report_rejection(&err);
        err
    }

    pub async fn handle(
        &self,
        cmd: ProcessWebhookCommand,
    ) -> Result<ProcessWebhookResult, WebhookError> {
        // 1. Authenticate, then decode
        let event = match self.authenticate(&cmd) {
            Ok(event) => event,
            Err(err) => {
                self.report_rejection(&err);
                return Err(err);
            }
        };
        let envelope = match EventEnvelope::decode(&event) {
            Ok(envelope) => envelope,
            Err(err) => {
                self.report_rejection(&err);
                return Err(err);
            }
        };

        // 2. Route
        let mut report = WebhookReport::new(
            OutcomeClass::Unhandled,
            &self.provider,
            self.endpoint.tenant_id(),
        )
        .with_test_mode(self.endpoint.is_test_mode())
        .with_event(&envelope.id, &envelope.event_type)
        .with_event_tenant(envelope.tenant_id().map(str::to_string));

        let Some(route) = self.router.route(&envelope.parsed_type()) else {
            debug!(
                event_id = %envelope.id,
                event_type = %envelope.event_type,
                "Unhandled webhook event type"
            );
            return Ok(self.finish(report, &envelope, None));
        };

        if route == Route::PaymentIntentFailed {
            warn!(
                event_id = %envelope.id,
                payment_intent_id = envelope.object_id().unwrap_or_default(),
                failure_message = envelope
                    .data
                    .object
                    .get("last_payment_error")
                    .and_then(|e| e.get("message"))
                    .and_then(|m| m.as_str())
                    .unwrap_or_default(),
                "Payment intent failed"
            );
        }
        if !route.mutates() {
            return Ok(self.finish(report, &envelope, None));
        }

        // 3. Tenant guard, before any synchronizer
        let tenant_id = match TenantGuard::authorize(&envelope, &self.endpoint) {
            TenantDecision::Allowed { tenant_id } => tenant_id,
            TenantDecision::Mismatch { .. } | TenantDecision::Missing => {
                report.outcome = OutcomeClass::TenantMismatch;
                return Ok(self.finish(report, &envelope, None));
            }
        };

        // 4. Build and run the synchronizer call
        let call = match plan(route, &envelope, &tenant_id) {
            Plan::Sync(call) => call,
            Plan::Skip(reason) => {
                info!(
                    event_id = %envelope.id,
                    event_type = %envelope.event_type,
                    reason,
                    "Webhook acknowledged without synchronization"
                );
                return Ok(self.finish(report, &envelope, None));
            }
        };
        report = report.with_resource(Some(call.resource_id().to_string()));

        let (outcome, order) = match self.synchronize(call).await {
            Ok(SyncOutcome::Applied(order)) => (OutcomeClass::ProcessedNew, order),
            Ok(SyncOutcome::AlreadyProcessed) => (OutcomeClass::ProcessedDuplicate, None),
            Err(err) => {
                error!(
                    event_id = %envelope.id,
                    event_type = %envelope.event_type,
                    resource_id = report.resource_id.as_deref().unwrap_or_default(),
                    error = %err,
                    "Webhook synchronization failed"
                );
                report = report.with_error(err.to_string());
                (OutcomeClass::ProcessedWithInternalError, None)
            }
        };
        report.outcome = outcome;

        Ok(self.finish(report, &envelope, order))
    }

    fn authenticate(&self, cmd: &ProcessWebhookCommand) -> Result<InboundEvent, WebhookError> {
        self.verifier
            .verify(&cmd.payload, cmd.signature.as_deref())
    }

    /// Runs the synchronizer on its own task so a dropped request cannot
    /// cancel a half-applied change.
    async fn synchronize(
        &self,
        call: SyncCall,
    ) -> Result<SyncOutcome<Option<OrderDetail>>, SyncError> {
        let synchronizers = self.synchronizers.clone();
        let task = tokio::spawn(async move {
            match call {
                SyncCall::OrderFromPaymentIntent { payment_intent_id } => synchronizers
                    .orders
                    .create_order_from_payment_intent(&payment_intent_id)
                    .await
                    .map(with_order),
                SyncCall::OrderFromSubscriptionInvoice {
                    invoice_id,
                    tenant_id,
                } => synchronizers
                    .invoices
                    .create_order_from_subscription_invoice(&invoice_id, &tenant_id)
                    .await
                    .map(with_order),
                SyncCall::Subscription(params) => synchronizers
                    .subscriptions
                    .sync_subscription_from_webhook(params)
                    .await
                    .map(|outcome| match outcome {
                        SyncOutcome::Applied(()) => SyncOutcome::Applied(None),
                        SyncOutcome::AlreadyProcessed => SyncOutcome::AlreadyProcessed,
                    }),
            }
        });

        task.await
            .map_err(|e| SyncError::Aborted(e.to_string()))?
    }

    fn finish(
        &self,
        report: WebhookReport,
        envelope: &EventEnvelope,
        order: Option<OrderDetail>,
    ) -> ProcessWebhookResult {
        match report.outcome {
            OutcomeClass::ProcessedNew => info!(
                event_id = %envelope.id,
                event_type = %envelope.event_type,
                order_id = order.as_ref().map(|o| o.order_id.as_str()).unwrap_or_default(),
                "Webhook processed"
            ),
            OutcomeClass::ProcessedDuplicate => info!(
                event_id = %envelope.id,
                event_type = %envelope.event_type,
                "Webhook already processed"
            ),
            _ => {}
        }

        self.reporter.record(&report);
        ProcessWebhookResult {
            outcome: report.outcome,
            event_id: envelope.id.clone(),
            event_type: envelope.event_type.clone(),
            order,
        }
    }

    fn report_rejection(&self, err: &WebhookError) {
        warn!(
            provider = %self.provider,
            error = %err,
            outcome = %err.outcome(),
            "Webhook rejected"
        );
        let report = WebhookReport::new(err.outcome(), &self.provider, self.endpoint.tenant_id())
            .with_test_mode(self.endpoint.is_test_mode())
            .with_error(err.to_string());
        self.reporter.record(&report);
    }
}

fn with_order(outcome: SyncOutcome<OrderDetail>) -> SyncOutcome<Option<OrderDetail>> {
    match outcome {
        SyncOutcome::Applied(order) => SyncOutcome::Applied(Some(order)),
        SyncOutcome::AlreadyProcessed => SyncOutcome::AlreadyProcessed,
    }
}
