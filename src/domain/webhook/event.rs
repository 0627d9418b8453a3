//! Inbound billing events and their minimal structural view.
//!
//! Only the fields needed for routing are modelled. Everything else in the
//! provider payload is ignored so new upstream fields never break decoding.

use axum::body::Bytes;
use serde::{Deserialize, Serialize};

use super::errors::WebhookError;

/// Metadata key under which the sender records the owning tenant.
pub const TENANT_METADATA_KEY: &str = "tenant_id";

/// An authenticated webhook delivery.
///
/// Only the signature verifier constructs one, so holding an
/// `InboundEvent` means the bytes were signed by the endpoint secret.
#[derive(Debug, Clone)]
pub struct InboundEvent {
    id: String,
    event_type: String,
    raw_payload: Bytes,
}

/// Just enough of the payload to identify the event.
#[derive(Deserialize)]
struct EventHead {
    id: String,
    #[serde(rename = "type")]
    event_type: String,
}

impl InboundEvent {
    /// Builds an event from bytes whose signature has already been checked.
    pub(super) fn from_verified(raw_payload: Bytes) -> Result<Self, WebhookError> {
        let value: serde_json::Value = serde_json::from_slice(&raw_payload)
            .map_err(|e| WebhookError::MalformedPayload(e.to_string()))?;
        if value.get("id").is_none() {
            return Err(WebhookError::MissingField("id"));
        }
        if value.get("type").is_none() {
            return Err(WebhookError::MissingField("type"));
        }
        let head: EventHead = serde_json::from_value(value)
            .map_err(|e| WebhookError::MalformedPayload(e.to_string()))?;

        Ok(Self {
            id: head.id,
            event_type: head.event_type,
            raw_payload,
        })
    }

    /// Provider event id (e.g. `evt_...`).
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Provider event type string (e.g. `invoice.paid`).
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    /// The exact bytes that were verified.
    pub fn raw_payload(&self) -> &Bytes {
        &self.raw_payload
    }
}

/// Typed view of a verified event envelope.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventEnvelope {
    /// Unique identifier for the event.
    pub id: String,

    /// Type of event (e.g., "checkout.session.completed").
    #[serde(rename = "type")]
    pub event_type: String,

    /// Time at which the event was created (Unix timestamp).
    #[serde(default)]
    pub created: Option<i64>,

    /// Whether this is a live mode event.
    #[serde(default)]
    pub livemode: bool,

    /// Object containing event-specific data.
    pub data: EventData,
}

/// Container for event-specific data.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EventData {
    /// The object that triggered the event (polymorphic based on event type).
    pub object: serde_json::Value,

    /// Previous values for updated attributes (only for update events).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_attributes: Option<serde_json::Value>,
}

impl EventEnvelope {
    /// Decodes the envelope of an authenticated event.
    ///
    /// # Errors
    ///
    /// - `MalformedPayload` if the body is not a JSON object of the expected shape
    /// - `MissingField("data")` if there is no `data.object`
    pub fn decode(event: &InboundEvent) -> Result<Self, WebhookError> {
        let value: serde_json::Value = serde_json::from_slice(event.raw_payload())
            .map_err(|e| WebhookError::MalformedPayload(e.to_string()))?;
        match value.get("data") {
            Some(data) if data.get("object").is_some() => {}
            _ => return Err(WebhookError::MissingField("data")),
        }
        serde_json::from_value(value).map_err(|e| WebhookError::MalformedPayload(e.to_string()))
    }

    /// Parse the event type into a known enum variant.
    pub fn parsed_type(&self) -> WebhookEventType {
        WebhookEventType::parse(&self.event_type)
    }

    /// Id of the object that triggered the event.
    pub fn object_id(&self) -> Option<&str> {
        self.object_str("id")
    }

    /// A string field of the data object.
    pub fn object_str(&self, key: &str) -> Option<&str> {
        self.data.object.get(key).and_then(|v| v.as_str())
    }

    /// A reference to another provider object, either as a bare id or as an
    /// expanded object carrying an `id`.
    pub fn object_ref(&self, key: &str) -> Option<&str> {
        match self.data.object.get(key)? {
            serde_json::Value::String(id) => Some(id.as_str()),
            serde_json::Value::Object(expanded) => expanded.get("id").and_then(|v| v.as_str()),
            _ => None,
        }
    }

    /// Tenant id the sender embedded in the event metadata.
    ///
    /// Looks at the object's own metadata first, then at the subscription
    /// metadata that invoices carry. Non-string values count as absent.
    pub fn tenant_id(&self) -> Option<&str> {
        let object = &self.data.object;
        let candidates = [
            object.get("metadata"),
            object
                .get("subscription_details")
                .and_then(|d| d.get("metadata")),
            object
                .get("parent")
                .and_then(|p| p.get("subscription_details"))
                .and_then(|d| d.get("metadata")),
        ];

        candidates
            .into_iter()
            .flatten()
            .find_map(|metadata| metadata.get(TENANT_METADATA_KEY).and_then(|v| v.as_str()))
    }
}

/// Billing event types this subsystem knows about.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum WebhookEventType {
    /// Checkout session completed successfully.
    CheckoutSessionCompleted,
    /// Invoice paid (including the legacy `invoice.payment_succeeded`).
    InvoicePaid,
    /// Invoice payment failed.
    InvoicePaymentFailed,
    /// Subscription was updated.
    SubscriptionUpdated,
    /// Subscription was deleted.
    SubscriptionDeleted,
    /// Payment intent succeeded.
    PaymentIntentSucceeded,
    /// Payment intent failed.
    PaymentIntentFailed,
    /// Payment intent created.
    PaymentIntentCreated,
    /// Anything else.
    Other(String),
}

impl WebhookEventType {
    /// Parse event type from string.
    pub fn parse(s: &str) -> Self {
        match s {
            "checkout.session.completed" => Self::CheckoutSessionCompleted,
            "invoice.paid" | "invoice.payment_succeeded" => Self::InvoicePaid,
            "invoice.payment_failed" => Self::InvoicePaymentFailed,
            "customer.subscription.updated" => Self::SubscriptionUpdated,
            "customer.subscription.deleted" => Self::SubscriptionDeleted,
            "payment_intent.succeeded" => Self::PaymentIntentSucceeded,
            "payment_intent.payment_failed" => Self::PaymentIntentFailed,
            "payment_intent.created" => Self::PaymentIntentCreated,
            other => Self::Other(other.to_string()),
        }
    }

    /// Canonical event type string.
    pub fn as_str(&self) -> &str {
        match self {
            Self::CheckoutSessionCompleted => "checkout.session.completed",
            Self::InvoicePaid => "invoice.paid",
            Self::InvoicePaymentFailed => "invoice.payment_failed",
            Self::SubscriptionUpdated => "customer.subscription.updated",
            Self::SubscriptionDeleted => "customer.subscription.deleted",
            Self::PaymentIntentSucceeded => "payment_intent.succeeded",
            Self::PaymentIntentFailed => "payment_intent.payment_failed",
            Self::PaymentIntentCreated => "payment_intent.created",
            Self::Other(s) => s.as_str(),
        }
    }
}

/// Builder for creating test envelopes.
#[cfg(test)]
pub struct EventEnvelopeBuilder {
    id: String,
    event_type: String,
    object: serde_json::Value,
    livemode: bool,
}

#[cfg(test)]
impl Default for EventEnvelopeBuilder {
    fn default() -> Self {
        Self {
            id: "evt_test_123".to_string(),
            event_type: "payment_intent.succeeded".to_string(),
            object: serde_json::json!({}),
            livemode: false,
        }
    }
}

#[cfg(test)]
impl EventEnvelopeBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn event_type(mut self, event_type: impl Into<String>) -> Self {
        self.event_type = event_type.into();
        self
    }

    pub fn object(mut self, object: serde_json::Value) -> Self {
        self.object = object;
        self
    }

    pub fn livemode(mut self, livemode: bool) -> Self {
        self.livemode = livemode;
        self
    }

    pub fn build(self) -> EventEnvelope {
        EventEnvelope {
            id: self.id,
            event_type: self.event_type,
            created: Some(1_704_067_200),
            livemode: self.livemode,
            data: EventData {
                object: self.object,
                previous_attributes: None,
            },
        }
    }
}
