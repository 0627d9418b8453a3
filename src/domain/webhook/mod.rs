//! Webhook domain module.
//!
//! Authentication, decoding, tenant isolation and response classification
//! for billing-provider webhooks.
//!
//! # Module Structure
//!
//! - `verifier` - HMAC-SHA256 signature verification
//! - `event` - Inbound event, envelope decoder, event types
//! - `tenant` - Tenant guard
//! - `outcome` - Request classification
//! - `response_policy` - Classification to HTTP status/body
//! - `errors` - Pre-routing failures
//! - `endpoint` - Per-route configuration

mod endpoint;
mod errors;
mod event;
mod outcome;
mod response_policy;
mod tenant;
mod verifier;

pub use endpoint::EndpointConfig;
pub use errors::WebhookError;
pub use event::{EventData, EventEnvelope, InboundEvent, WebhookEventType, TENANT_METADATA_KEY};
pub use outcome::OutcomeClass;
pub use response_policy::{ResponseBody, ResponsePolicy, WebhookResponse};
pub use tenant::{TenantDecision, TenantGuard};
pub use verifier::{
    compute_signature, signature_header, SignatureHeader, SignatureVerifier,
    DEFAULT_TOLERANCE_SECS,
};

#[cfg(test)]
pub(crate) use event::EventEnvelopeBuilder;
