//! HTTP adapter for webhook endpoints.
//!
//! - `ANY /webhooks/:provider` - Receive a provider webhook
//! - `GET /health` - Liveness probe

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::{ErrorResponse, HealthResponse, ReceivedResponse};
pub use handlers::{WebhookAppState, SIGNATURE_HEADER};
pub use routes::webhook_router;
