//! Webhook signature verification.
//!
//! Authenticates the raw request body against the endpoint's shared secret
//! using HMAC-SHA256 over `"{timestamp}.{body}"`, with a timestamp window to
//! reject replays. The body is hashed byte-for-byte as received; nothing is
//! re-serialized before verification.

use axum::body::Bytes;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use super::event::InboundEvent;
use super::errors::WebhookError;

/// Default maximum age for a signature (5 minutes).
pub const DEFAULT_TOLERANCE_SECS: i64 = 300;

/// Maximum allowed clock skew for future timestamps (1 minute).
const MAX_CLOCK_SKEW_SECS: i64 = 60;

type HmacSha256 = Hmac<Sha256>;

/// Parsed components of the signature header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureHeader {
    /// Unix timestamp when the signature was generated.
    pub timestamp: i64,
    /// v1 signatures (HMAC-SHA256). More than one is sent while the
    /// sender is rolling its secret.
    pub v1_signatures: Vec<Vec<u8>>,
    /// Optional v0 legacy signature. Parsed but never trusted.
    pub v0_signature: Option<Vec<u8>>,
}

impl SignatureHeader {
    /// Parses a signature header string.
    ///
    /// Format: `t=<timestamp>,v1=<signature>[,v1=<signature>...][,v0=<legacy>]`
    ///
    /// # Errors
    ///
    /// Returns `WebhookError::SignatureHeader` if the header format is invalid.
    pub fn parse(header: &str) -> Result<Self, WebhookError> {
        let mut timestamp: Option<i64> = None;
        let mut v1_signatures: Vec<Vec<u8>> = Vec::new();
        let mut v0_signature: Option<Vec<u8>> = None;

        for part in header.split(',') {
            let (key, value) = part.trim().split_once('=').ok_or_else(|| {
                WebhookError::SignatureHeader("invalid header format".to_string())
            })?;

            match key {
                "t" => {
                    timestamp = Some(value.parse().map_err(|_| {
                        WebhookError::SignatureHeader("invalid timestamp".to_string())
                    })?);
                }
                "v1" => {
                    v1_signatures.push(hex::decode(value).map_err(|_| {
                        WebhookError::SignatureHeader("invalid v1 signature hex".to_string())
                    })?);
                }
                "v0" => {
                    v0_signature = Some(hex::decode(value).map_err(|_| {
                        WebhookError::SignatureHeader("invalid v0 signature hex".to_string())
                    })?);
                }
                _ => {
                    // Unknown schemes are ignored for forward compatibility
                }
            }
        }

        let timestamp = timestamp
            .ok_or_else(|| WebhookError::SignatureHeader("missing timestamp".to_string()))?;
        if v1_signatures.is_empty() {
            return Err(WebhookError::SignatureHeader(
                "missing v1 signature".to_string(),
            ));
        }

        Ok(SignatureHeader {
            timestamp,
            v1_signatures,
            v0_signature,
        })
    }
}

/// Verifier for inbound webhook signatures.
pub struct SignatureVerifier {
    secret: SecretString,
    tolerance_secs: i64,
}

impl SignatureVerifier {
    /// Creates a verifier with the given signing secret and the default
    /// 5 minute tolerance.
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Secret::new(secret.into()),
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        }
    }

    /// Overrides the maximum signature age.
    pub fn with_tolerance(mut self, tolerance_secs: i64) -> Self {
        self.tolerance_secs = tolerance_secs;
        self
    }

    /// Verifies the signature against the current time and returns the
    /// authenticated event.
    ///
    /// # Errors
    ///
    /// - `MissingSignature` - header absent or blank
    /// - `SignatureHeader` - header present but unparsable
    /// - `TimestampOutOfRange` / `InvalidTimestamp` - outside the window
    /// - `InvalidSignature` - no v1 signature matches
    /// - `MalformedPayload` / `MissingField` - authentic bytes, not an event
    pub fn verify(
        &self,
        payload: &Bytes,
        signature_header: Option<&str>,
    ) -> Result<InboundEvent, WebhookError> {
        self.verify_at(payload, signature_header, chrono::Utc::now().timestamp())
    }

    /// Same as [`verify`](Self::verify) with an explicit clock.
    pub fn verify_at(
        &self,
        payload: &Bytes,
        signature_header: Option<&str>,
        now: i64,
    ) -> Result<InboundEvent, WebhookError> {
        // 1. Header must be present
        let signature_header = signature_header
            .map(str::trim)
            .filter(|h| !h.is_empty())
            .ok_or(WebhookError::MissingSignature)?;

        // 2. Parse it
        let header = SignatureHeader::parse(signature_header)?;

        // 3. Validate timestamp
        self.validate_timestamp(header.timestamp, now)?;

        // 4. Compare against every v1 signature (constant-time)
        let expected = self.compute_signature(header.timestamp, payload)?;
        let matched = header
            .v1_signatures
            .iter()
            .any(|candidate| constant_time_compare(&expected, candidate));
        if !matched {
            return Err(WebhookError::InvalidSignature);
        }

        // 5. Only authenticated bytes become an event
        InboundEvent::from_verified(payload.clone())
    }

    /// Validates that the timestamp is within acceptable bounds.
    fn validate_timestamp(&self, timestamp: i64, now: i64) -> Result<(), WebhookError> {
        let Some(age) = now.checked_sub(timestamp) else {
            return Err(WebhookError::TimestampOutOfRange);
        };

        if age > self.tolerance_secs {
            return Err(WebhookError::TimestampOutOfRange);
        }

        if age < -MAX_CLOCK_SKEW_SECS {
            return Err(WebhookError::InvalidTimestamp);
        }

        Ok(())
    }

    fn compute_signature(&self, timestamp: i64, payload: &[u8]) -> Result<Vec<u8>, WebhookError> {
        let mut mac = HmacSha256::new_from_slice(self.secret.expose_secret().as_bytes())
            .map_err(|_| WebhookError::InvalidSignature)?;
        mac.update(timestamp.to_string().as_bytes());
        mac.update(b".");
        mac.update(payload);
        Ok(mac.finalize().into_bytes().to_vec())
    }
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}

/// Computes the hex HMAC-SHA256 signature the sender would produce.
///
/// Used by test fixtures and local replay tooling.
pub fn compute_signature(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    let verifier = SignatureVerifier::new(secret);
    match verifier.compute_signature(timestamp, payload) {
        Ok(bytes) => hex::encode(bytes),
        Err(_) => String::new(),
    }
}

/// Builds a complete `t=...,v1=...` header for `payload`.
pub fn signature_header(secret: &str, timestamp: i64, payload: &[u8]) -> String {
    format!(
        "t={},v1={}",
        timestamp,
        compute_signature(secret, timestamp, payload)
    )
}
