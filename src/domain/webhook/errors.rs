//! Webhook error types for inbound billing events.
//!
//! These are the failures that stop a request *before* it is routed:
//! authentication and format problems. They are the only errors that ever
//! reach the HTTP layer as a non-2xx status. Anything that goes wrong after
//! an event has been authenticated and decoded is classified instead (see
//! [`OutcomeClass`]) and acknowledged with 200.

use axum::http::StatusCode;
use thiserror::Error;

use super::outcome::OutcomeClass;

/// Errors that occur while authenticating or decoding a webhook request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WebhookError {
    /// Request used a method other than POST.
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Signature header was absent or empty.
    #[error("Missing signature header")]
    MissingSignature,

    /// Signature header was present but could not be parsed.
    #[error("Malformed signature header: {0}")]
    SignatureHeader(String),

    /// No signature in the header matched the payload.
    #[error("Invalid signature")]
    InvalidSignature,

    /// Signature timestamp is older than the tolerance window.
    #[error("Timestamp out of range")]
    TimestampOutOfRange,

    /// Signature timestamp is in the future beyond clock skew tolerance.
    #[error("Invalid timestamp")]
    InvalidTimestamp,

    /// Body is not valid JSON or is not an event envelope.
    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    /// Required envelope field missing from the payload.
    #[error("Missing field: {0}")]
    MissingField(&'static str),
}

impl WebhookError {
    /// Classifies the error for reporting and response selection.
    ///
    /// A missing header is treated as an integration bug rather than an
    /// attack, so it is `Malformed`; a present-but-wrong signature is
    /// `AuthRejected`.
    pub fn outcome(&self) -> OutcomeClass {
        match self {
            WebhookError::SignatureHeader(_)
            | WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange
            | WebhookError::InvalidTimestamp => OutcomeClass::AuthRejected,

            WebhookError::MethodNotAllowed
            | WebhookError::MissingSignature
            | WebhookError::MalformedPayload(_)
            | WebhookError::MissingField(_) => OutcomeClass::Malformed,
        }
    }

    /// Maps the error to an HTTP status code.
    ///
    /// The sender retries only on 5xx, so none of these are retried: the
    /// caller has to fix the request.
    pub fn status_code(&self) -> StatusCode {
        match self.outcome() {
            OutcomeClass::AuthRejected => StatusCode::UNAUTHORIZED,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Stable machine-readable code returned to the caller.
    pub fn error_code(&self) -> &'static str {
        match self {
            WebhookError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            WebhookError::MissingSignature => "MISSING_SIGNATURE",
            WebhookError::SignatureHeader(_)
            | WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange
            | WebhookError::InvalidTimestamp => "INVALID_SIGNATURE",
            WebhookError::MalformedPayload(_) | WebhookError::MissingField(_) => {
                "MALFORMED_PAYLOAD"
            }
        }
    }

    /// Message safe to send back to the caller.
    ///
    /// Never includes parser output or identifiers; the full error goes to
    /// the logs via `Display`.
    pub fn public_message(&self) -> &'static str {
        match self {
            WebhookError::MethodNotAllowed => "Webhook endpoint only accepts POST",
            WebhookError::MissingSignature => "Signature header is required",
            WebhookError::SignatureHeader(_)
            | WebhookError::InvalidSignature
            | WebhookError::TimestampOutOfRange
            | WebhookError::InvalidTimestamp => "Webhook signature verification failed",
            WebhookError::MalformedPayload(_) | WebhookError::MissingField(_) => {
                "Webhook payload could not be decoded"
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ══════════════════════════════════════════════════════════════
    // Display Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn invalid_signature_displays_correctly() {
        let err = WebhookError::InvalidSignature;
        assert_eq!(format!("{}", err), "Invalid signature");
    }

    #[test]
    fn malformed_payload_displays_detail() {
        let err = WebhookError::MalformedPayload("EOF while parsing".to_string());
        assert_eq!(format!("{}", err), "Malformed payload: EOF while parsing");
    }

    #[test]
    fn missing_field_displays_field_name() {
        let err = WebhookError::MissingField("data");
        assert_eq!(format!("{}", err), "Missing field: data");
    }

    // ══════════════════════════════════════════════════════════════
    // Classification Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn missing_signature_is_malformed_not_auth() {
        assert_eq!(WebhookError::MissingSignature.outcome(), OutcomeClass::Malformed);
    }

    #[test]
    fn bad_signatures_are_auth_rejected() {
        for err in [
            WebhookError::InvalidSignature,
            WebhookError::TimestampOutOfRange,
            WebhookError::InvalidTimestamp,
            WebhookError::SignatureHeader("missing timestamp".to_string()),
        ] {
            assert_eq!(err.outcome(), OutcomeClass::AuthRejected, "{:?}", err);
        }
    }

    #[test]
    fn method_not_allowed_is_malformed() {
        assert_eq!(WebhookError::MethodNotAllowed.outcome(), OutcomeClass::Malformed);
    }

    // ══════════════════════════════════════════════════════════════
    // Status Code Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn missing_signature_returns_bad_request() {
        assert_eq!(
            WebhookError::MissingSignature.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn invalid_signature_returns_unauthorized() {
        assert_eq!(
            WebhookError::InvalidSignature.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn stale_timestamp_returns_unauthorized() {
        assert_eq!(
            WebhookError::TimestampOutOfRange.status_code(),
            StatusCode::UNAUTHORIZED
        );
    }

    #[test]
    fn malformed_payload_returns_bad_request() {
        let err = WebhookError::MalformedPayload("bad".to_string());
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn method_not_allowed_returns_bad_request() {
        assert_eq!(
            WebhookError::MethodNotAllowed.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    // ══════════════════════════════════════════════════════════════
    // Public Message Tests
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn public_message_hides_parser_detail() {
        let err = WebhookError::MalformedPayload("expected `:` at line 1 column 15".to_string());
        assert!(!err.public_message().contains("line 1"));
    }

    #[test]
    fn header_parse_errors_share_invalid_signature_code() {
        let err = WebhookError::SignatureHeader("invalid v1 signature hex".to_string());
        assert_eq!(err.error_code(), "INVALID_SIGNATURE");
        assert_eq!(err.public_message(), "Webhook signature verification failed");
    }
}
