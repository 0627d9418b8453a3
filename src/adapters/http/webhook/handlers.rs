//! HTTP handlers for webhook endpoints.
//!
//! The handler extracts the raw body and signature header, hands them to the
//! endpoint's [`ProcessWebhookHandler`] and renders the response policy's
//! decision. Signature verification needs the bytes exactly as sent, so the
//! body is never parsed as JSON here.

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::debug;

use crate::application::handlers::webhook::{ProcessWebhookCommand, ProcessWebhookHandler};
use crate::domain::webhook::{ResponseBody, ResponsePolicy, WebhookError, WebhookResponse};

use super::dto::{ErrorResponse, HealthResponse, ReceivedResponse};

/// Header carrying the provider signature.
pub const SIGNATURE_HEADER: &str = "Stripe-Signature";

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Mounted webhook endpoints, keyed by provider path segment.
///
/// Each endpoint carries its own secret and tenant, so several tenants can be
/// served from one process.
#[derive(Clone, Default)]
pub struct WebhookAppState {
    endpoints: Arc<HashMap<String, Arc<ProcessWebhookHandler>>>,
}

impl WebhookAppState {
    pub fn new(handlers: impl IntoIterator<Item = ProcessWebhookHandler>) -> Self {
        let endpoints = handlers
            .into_iter()
            .map(|h| (h.provider().to_string(), Arc::new(h)))
            .collect();
        Self {
            endpoints: Arc::new(endpoints),
        }
    }

    pub fn endpoint(&self, provider: &str) -> Option<&Arc<ProcessWebhookHandler>> {
        self.endpoints.get(provider)
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// ANY /webhooks/:provider - Receive a provider webhook.
pub async fn receive_webhook(
    State(state): State<WebhookAppState>,
    Path(provider): Path<String>,
    method: Method,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let handler = state.endpoint(&provider);

    if method != Method::POST {
        let err = match handler {
            Some(handler) => handler.reject(WebhookError::MethodNotAllowed),
            None => WebhookError::MethodNotAllowed,
        };
        return render(ResponsePolicy::for_error(&err));
    }

    let Some(handler) = handler else {
        debug!(provider = %provider, "No webhook endpoint mounted for provider");
        let error = ErrorResponse::new("NOT_FOUND", "Unknown webhook endpoint");
        return (StatusCode::NOT_FOUND, Json(error)).into_response();
    };

    // A non-UTF-8 header is present but unusable; let the verifier reject it
    let signature = headers
        .get(SIGNATURE_HEADER)
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned());

    let cmd = ProcessWebhookCommand {
        payload: body,
        signature,
    };

    let response = match handler.handle(cmd).await {
        Ok(result) => ResponsePolicy::for_outcome(result.outcome),
        Err(err) => ResponsePolicy::for_error(&err),
    };
    render(response)
}

/// GET /health - Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse { status: "ok" })
}

fn render(response: WebhookResponse) -> Response {
    match response.body {
        ResponseBody::Received => (response.status, Json(ReceivedResponse::new())).into_response(),
        ResponseBody::Error {
            error_code,
            message,
        } => (response.status, Json(ErrorResponse::new(error_code, message))).into_response(),
    }
}
