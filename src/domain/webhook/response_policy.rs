//! Response policy: maps a request's classification to what the sender sees.
//!
//! | Classification | Status | Body |
//! |----------------|--------|------|
//! | bad method / missing signature / malformed payload | 400 | error |
//! | invalid signature | 401 | error |
//! | unhandled, tenant mismatch, new, duplicate, internal error | 200 | `{"received": true}` |
//!
//! Authentication failures are fixable by the sender and are rejected.
//! Business-logic failures are not: a retry of the same event fails the same
//! way and only adds load, so they are acknowledged and surfaced through
//! logs and the [`WebhookReporter`](crate::ports::WebhookReporter) instead.

use axum::http::StatusCode;

use super::errors::WebhookError;
use super::outcome::OutcomeClass;

/// Body the sender receives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseBody {
    /// `{"received": true}`
    Received,
    /// Fixed error code and message; never contains internal detail.
    Error {
        error_code: &'static str,
        message: &'static str,
    },
}

/// HTTP-level decision for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WebhookResponse {
    pub status: StatusCode,
    pub body: ResponseBody,
}

/// Chooses responses purely from classification.
pub struct ResponsePolicy;

impl ResponsePolicy {
    /// Response for an event that was authenticated and decoded.
    ///
    /// Always 200, whatever the synchronizer did.
    pub fn for_outcome(outcome: OutcomeClass) -> WebhookResponse {
        debug_assert!(outcome.is_acknowledged());
        WebhookResponse {
            status: StatusCode::OK,
            body: ResponseBody::Received,
        }
    }

    /// Response for a request rejected before routing.
    pub fn for_error(error: &WebhookError) -> WebhookResponse {
        WebhookResponse {
            status: error.status_code(),
            body: ResponseBody::Error {
                error_code: error.error_code(),
                message: error.public_message(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn processed_outcomes_return_received() {
        for outcome in [
            OutcomeClass::Unhandled,
            OutcomeClass::TenantMismatch,
            OutcomeClass::ProcessedNew,
            OutcomeClass::ProcessedDuplicate,
            OutcomeClass::ProcessedWithInternalError,
        ] {
            let response = ResponsePolicy::for_outcome(outcome);
            assert_eq!(response.status, StatusCode::OK, "{}", outcome);
            assert_eq!(response.body, ResponseBody::Received);
        }
    }

    #[test]
    fn missing_signature_is_bad_request() {
        let response = ResponsePolicy::for_error(&WebhookError::MissingSignature);
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_signature_is_unauthorized() {
        let response = ResponsePolicy::for_error(&WebhookError::InvalidSignature);
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.body,
            ResponseBody::Error {
                error_code: "INVALID_SIGNATURE",
                message: "Webhook signature verification failed",
            }
        );
    }

    #[test]
    fn malformed_body_is_bad_request_without_detail() {
        let response = ResponsePolicy::for_error(&WebhookError::MalformedPayload(
            "key must be a string at line 1 column 2".to_string(),
        ));
        assert_eq!(response.status, StatusCode::BAD_REQUEST);
        match response.body {
            ResponseBody::Error { message, .. } => assert!(!message.contains("line 1")),
            ResponseBody::Received => panic!("expected error body"),
        }
    }
}
