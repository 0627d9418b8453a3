//! Axum router configuration for webhook endpoints.

use axum::{
    routing::{any, get},
    Router,
};

use super::handlers::{health, receive_webhook, WebhookAppState};

/// Create the webhook router.
///
/// # Routes
/// - `ANY /webhooks/:provider` - Receive a provider webhook (only POST is accepted)
/// - `GET /health` - Liveness probe
///
/// No timeout layer is applied: a synchronizer call must not be cut off
/// mid-flight by the transport.
pub fn webhook_router() -> Router<WebhookAppState> {
    Router::new()
        .route("/webhooks/:provider", any(receive_webhook))
        .route("/health", get(health))
}
