//! HTTP adapters - REST API implementations.

pub mod webhook;

use axum::Router;
use tower_http::trace::TraceLayer;

pub use webhook::{webhook_router, WebhookAppState};

/// Builds the complete application router.
pub fn app_router(state: WebhookAppState) -> Router {
    webhook_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
