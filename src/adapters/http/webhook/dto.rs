//! HTTP DTOs for webhook endpoints.
//!
//! Response bodies are fixed shapes. Nothing internal (synchronizer errors,
//! tenant ids, event ids) ever reaches the sender.

use serde::Serialize;

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// `{"received": true}` - acknowledgement for every authenticated event.
#[derive(Debug, Clone, Serialize)]
pub struct ReceivedResponse {
    pub received: bool,
}

impl ReceivedResponse {
    pub fn new() -> Self {
        Self { received: true }
    }
}

impl Default for ReceivedResponse {
    fn default() -> Self {
        Self::new()
    }
}

/// Error response for rejected requests.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

/// `GET /health` response.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}
