//! Type router - maps billing event types to synchronization plans.
//!
//! The table is static. A type with no entry is not an error: the event is
//! acknowledged without mutation so the sender stops retrying event types
//! this system deliberately ignores.

use std::collections::HashMap;

use crate::domain::webhook::{EventEnvelope, WebhookEventType};
use crate::ports::SubscriptionSyncParams;

/// Handler selected for an event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// `checkout.session.completed`
    CheckoutCompleted,
    /// `invoice.paid` / `invoice.payment_succeeded`
    InvoicePaid,
    /// `invoice.payment_failed`
    InvoicePaymentFailed,
    /// `customer.subscription.updated` / `customer.subscription.deleted`
    SubscriptionChanged,
    /// `payment_intent.succeeded`
    PaymentIntentSucceeded,
    /// `payment_intent.payment_failed` - logged, no mutation
    PaymentIntentFailed,
    /// Recognized type that is intentionally a no-op success.
    Acknowledge,
}

impl Route {
    /// Returns true if this route may invoke a synchronizer and therefore
    /// needs the tenant guard.
    pub fn mutates(&self) -> bool {
        !matches!(self, Route::PaymentIntentFailed | Route::Acknowledge)
    }
}

/// Synchronizer call derived from an authorized event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncCall {
    /// `OrderSynchronizer::create_order_from_payment_intent`
    OrderFromPaymentIntent { payment_intent_id: String },
    /// `SubscriptionInvoiceSynchronizer::create_order_from_subscription_invoice`
    OrderFromSubscriptionInvoice { invoice_id: String, tenant_id: String },
    /// `SubscriptionLifecycleSynchronizer::sync_subscription_from_webhook`
    Subscription(SubscriptionSyncParams),
}

impl SyncCall {
    /// Provider resource id the call is keyed on.
    pub fn resource_id(&self) -> &str {
        match self {
            SyncCall::OrderFromPaymentIntent { payment_intent_id } => payment_intent_id,
            SyncCall::OrderFromSubscriptionInvoice { invoice_id, .. } => invoice_id,
            SyncCall::Subscription(params) => &params.provider_subscription_id,
        }
    }
}

/// What to do with an authorized event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Invoke a synchronizer.
    Sync(SyncCall),
    /// Acknowledge without mutation.
    Skip(&'static str),
}

/// Static event-type → route table.
pub struct WebhookRouter {
    routes: HashMap<WebhookEventType, Route>,
}

impl WebhookRouter {
    /// The routing table for billing events.
    pub fn standard() -> Self {
        let routes = HashMap::from([
            (WebhookEventType::CheckoutSessionCompleted, Route::CheckoutCompleted),
            (WebhookEventType::InvoicePaid, Route::InvoicePaid),
            (WebhookEventType::InvoicePaymentFailed, Route::InvoicePaymentFailed),
            (WebhookEventType::SubscriptionUpdated, Route::SubscriptionChanged),
            (WebhookEventType::SubscriptionDeleted, Route::SubscriptionChanged),
            (WebhookEventType::PaymentIntentSucceeded, Route::PaymentIntentSucceeded),
            (WebhookEventType::PaymentIntentFailed, Route::PaymentIntentFailed),
            (WebhookEventType::PaymentIntentCreated, Route::Acknowledge),
        ]);
        Self { routes }
    }

    /// Finds the route for an event type, if any.
    pub fn route(&self, event_type: &WebhookEventType) -> Option<Route> {
        self.routes.get(event_type).copied()
    }
}

impl Default for WebhookRouter {
    fn default() -> Self {
        Self::standard()
    }
}

/// Builds the synchronizer call for an event that passed the tenant guard.
pub fn plan(route: Route, envelope: &EventEnvelope, tenant_id: &str) -> Plan {
    match route {
        Route::CheckoutCompleted => plan_checkout(envelope, tenant_id),
        Route::InvoicePaid => plan_invoice_paid(envelope, tenant_id),
        Route::InvoicePaymentFailed => match invoice_subscription(envelope) {
            Some(subscription_id) => Plan::Sync(SyncCall::Subscription(SubscriptionSyncParams {
                provider_subscription_id: subscription_id.to_string(),
                status: Some("past_due".to_string()),
                customer_id: envelope.object_ref("customer").map(str::to_string),
                current_period_end: None,
                cancel_at_period_end: None,
                ..subscription_params_base(envelope, tenant_id)
            })),
            None => Plan::Skip("invoice is not for a subscription"),
        },
        Route::SubscriptionChanged => match envelope.object_id() {
            Some(subscription_id) => Plan::Sync(SyncCall::Subscription(SubscriptionSyncParams {
                provider_subscription_id: subscription_id.to_string(),
                status: envelope.object_str("status").map(str::to_string),
                customer_id: envelope.object_ref("customer").map(str::to_string),
                current_period_end: envelope
                    .data
                    .object
                    .get("current_period_end")
                    .and_then(|v| v.as_i64()),
                cancel_at_period_end: envelope
                    .data
                    .object
                    .get("cancel_at_period_end")
                    .and_then(|v| v.as_bool()),
                ..subscription_params_base(envelope, tenant_id)
            })),
            None => Plan::Skip("subscription event has no subscription id"),
        },
        Route::PaymentIntentSucceeded => {
            // Subscription payments are synchronized through invoice.paid
            if envelope.object_ref("invoice").is_some() {
                return Plan::Skip("payment intent belongs to an invoice");
            }
            match envelope.object_id() {
                Some(id) => Plan::Sync(SyncCall::OrderFromPaymentIntent {
                    payment_intent_id: id.to_string(),
                }),
                None => Plan::Skip("payment intent has no id"),
            }
        }
        Route::PaymentIntentFailed => Plan::Skip("payment failure is informational"),
        Route::Acknowledge => Plan::Skip("event type is acknowledged without action"),
    }
}

fn plan_checkout(envelope: &EventEnvelope, tenant_id: &str) -> Plan {
    if let Some(subscription_id) = envelope.object_ref("subscription") {
        return Plan::Sync(SyncCall::Subscription(SubscriptionSyncParams {
            provider_subscription_id: subscription_id.to_string(),
            status: None,
            customer_id: envelope.object_ref("customer").map(str::to_string),
            current_period_end: None,
            cancel_at_period_end: None,
            ..subscription_params_base(envelope, tenant_id)
        }));
    }

    let Some(payment_intent_id) = envelope.object_ref("payment_intent") else {
        return Plan::Skip("checkout session has neither subscription nor payment intent");
    };

    // Delayed payment methods settle later via payment_intent.succeeded
    if matches!(envelope.object_str("payment_status"), Some(status) if status != "paid") {
        return Plan::Skip("checkout payment not settled yet");
    }

    Plan::Sync(SyncCall::OrderFromPaymentIntent {
        payment_intent_id: payment_intent_id.to_string(),
    })
}

fn plan_invoice_paid(envelope: &EventEnvelope, tenant_id: &str) -> Plan {
    if invoice_subscription(envelope).is_none() {
        return Plan::Skip("invoice is not for a subscription");
    }
    match envelope.object_id() {
        Some(invoice_id) => Plan::Sync(SyncCall::OrderFromSubscriptionInvoice {
            invoice_id: invoice_id.to_string(),
            tenant_id: tenant_id.to_string(),
        }),
        None => Plan::Skip("invoice has no id"),
    }
}

/// Subscription an invoice belongs to, in either the classic or the
/// `parent.subscription_details` layout.
fn invoice_subscription(envelope: &EventEnvelope) -> Option<&str> {
    envelope.object_ref("subscription").or_else(|| {
        envelope
            .data
            .object
            .get("parent")
            .and_then(|p| p.get("subscription_details"))
            .and_then(|d| d.get("subscription"))
            .and_then(|s| s.as_str())
    })
}

fn subscription_params_base(envelope: &EventEnvelope, tenant_id: &str) -> SubscriptionSyncParams {
    SubscriptionSyncParams {
        provider_subscription_id: String::new(),
        event_type: envelope.event_type.clone(),
        event_id: envelope.id.clone(),
        tenant_id: tenant_id.to_string(),
        status: None,
        customer_id: None,
        current_period_end: None,
        cancel_at_period_end: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::webhook::EventEnvelopeBuilder;
    use serde_json::json;

    fn envelope(event_type: &str, object: serde_json::Value) -> EventEnvelope {
        EventEnvelopeBuilder::new()
            .id("evt_1")
            .event_type(event_type)
            .object(object)
            .build()
    }

    // ══════════════════════════════════════════════════════════════
    // Routing Table Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn unknown_type_has_no_route() {
        let router = WebhookRouter::standard();
        assert_eq!(
            router.route(&WebhookEventType::parse("account.updated")),
            None
        );
    }

    #[test]
    fn payment_intent_created_is_acknowledged() {
        let router = WebhookRouter::standard();
        let route = router
            .route(&WebhookEventType::PaymentIntentCreated)
            .unwrap();
        assert_eq!(route, Route::Acknowledge);
        assert!(!route.mutates());
    }

    #[test]
    fn every_known_type_is_routed() {
        let router = WebhookRouter::standard();
        for t in [
            "checkout.session.completed",
            "invoice.paid",
            "invoice.payment_succeeded",
            "invoice.payment_failed",
            "customer.subscription.updated",
            "customer.subscription.deleted",
            "payment_intent.succeeded",
            "payment_intent.payment_failed",
            "payment_intent.created",
        ] {
            assert!(router.route(&WebhookEventType::parse(t)).is_some(), "{}", t);
        }
    }

    // ══════════════════════════════════════════════════════════════
    // Plan Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn payment_intent_succeeded_creates_order() {
        let env = envelope("payment_intent.succeeded", json!({"id": "pi_1"}));
        assert_eq!(
            plan(Route::PaymentIntentSucceeded, &env, "tenant_a"),
            Plan::Sync(SyncCall::OrderFromPaymentIntent {
                payment_intent_id: "pi_1".to_string()
            })
        );
    }

    #[test]
    fn invoice_backed_payment_intent_is_skipped() {
        let env = envelope(
            "payment_intent.succeeded",
            json!({"id": "pi_1", "invoice": "in_1"}),
        );
        assert!(matches!(
            plan(Route::PaymentIntentSucceeded, &env, "tenant_a"),
            Plan::Skip(_)
        ));
    }

    #[test]
    fn invoice_paid_creates_order_with_tenant() {
        let env = envelope("invoice.paid", json!({"id": "in_1", "subscription": "sub_1"}));
        assert_eq!(
            plan(Route::InvoicePaid, &env, "tenant_a"),
            Plan::Sync(SyncCall::OrderFromSubscriptionInvoice {
                invoice_id: "in_1".to_string(),
                tenant_id: "tenant_a".to_string(),
            })
        );
    }

    #[test]
    fn invoice_paid_reads_parent_subscription_layout() {
        let env = envelope(
            "invoice.paid",
            json!({"id": "in_2", "parent": {"subscription_details": {"subscription": "sub_2"}}}),
        );
        assert!(matches!(
            plan(Route::InvoicePaid, &env, "tenant_a"),
            Plan::Sync(SyncCall::OrderFromSubscriptionInvoice { .. })
        ));
    }

    #[test]
    fn one_off_invoice_is_skipped() {
        let env = envelope("invoice.paid", json!({"id": "in_1", "subscription": null}));
        assert_eq!(
            plan(Route::InvoicePaid, &env, "tenant_a"),
            Plan::Skip("invoice is not for a subscription")
        );
    }

    #[test]
    fn checkout_with_subscription_syncs_subscription() {
        let env = envelope(
            "checkout.session.completed",
            json!({"id": "cs_1", "subscription": "sub_1", "customer": "cus_1", "payment_status": "paid"}),
        );
        match plan(Route::CheckoutCompleted, &env, "tenant_a") {
            Plan::Sync(SyncCall::Subscription(params)) => {
                assert_eq!(params.provider_subscription_id, "sub_1");
                assert_eq!(params.customer_id.as_deref(), Some("cus_1"));
                assert_eq!(params.event_type, "checkout.session.completed");
                assert_eq!(params.event_id, "evt_1");
                assert_eq!(params.tenant_id, "tenant_a");
            }
            other => panic!("unexpected plan: {:?}", other),
        }
    }

    #[test]
    fn checkout_with_payment_intent_creates_order() {
        let env = envelope(
            "checkout.session.completed",
            json!({"id": "cs_1", "payment_intent": "pi_9", "payment_status": "paid"}),
        );
        assert_eq!(
            plan(Route::CheckoutCompleted, &env, "tenant_a"),
            Plan::Sync(SyncCall::OrderFromPaymentIntent {
                payment_intent_id: "pi_9".to_string()
            })
        );
    }

    #[test]
    fn unpaid_checkout_is_skipped() {
        let env = envelope(
            "checkout.session.completed",
            json!({"id": "cs_1", "payment_intent": "pi_9", "payment_status": "unpaid"}),
        );
        assert_eq!(
            plan(Route::CheckoutCompleted, &env, "tenant_a"),
            Plan::Skip("checkout payment not settled yet")
        );
    }

    #[test]
    fn subscription_update_carries_status_fields() {
        let env = envelope(
            "customer.subscription.updated",
            json!({
                "id": "sub_1",
                "status": "active",
                "customer": "cus_1",
                "current_period_end": 1706745600,
                "cancel_at_period_end": true
            }),
        );
        match plan(Route::SubscriptionChanged, &env, "tenant_a") {
            Plan::Sync(SyncCall::Subscription(params)) => {
                assert_eq!(params.status.as_deref(), Some("active"));
                assert_eq!(params.current_period_end, Some(1706745600));
                assert_eq!(params.cancel_at_period_end, Some(true));
            }
            other => panic!("unexpected plan: {:?}", other),
        }
    }

    #[test]
    fn invoice_payment_failed_marks_subscription_past_due() {
        let env = envelope(
            "invoice.payment_failed",
            json!({"id": "in_1", "subscription": "sub_1"}),
        );
        match plan(Route::InvoicePaymentFailed, &env, "tenant_a") {
            Plan::Sync(SyncCall::Subscription(params)) => {
                assert_eq!(params.provider_subscription_id, "sub_1");
                assert_eq!(params.status.as_deref(), Some("past_due"));
            }
            other => panic!("unexpected plan: {:?}", other),
        }
    }

    #[test]
    fn resource_id_matches_key() {
        let call = SyncCall::OrderFromSubscriptionInvoice {
            invoice_id: "in_7".to_string(),
            tenant_id: "tenant_a".to_string(),
        };
        assert_eq!(call.resource_id(), "in_7");
    }
}
