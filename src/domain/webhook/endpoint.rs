//! Per-route webhook endpoint configuration.

use secrecy::{ExposeSecret, Secret, SecretString};

/// Immutable configuration for one mounted webhook route.
///
/// Fixes which signing secret authenticates requests and which tenant the
/// endpoint may mutate. Built once at startup and shared behind an `Arc`;
/// several can coexist in one process.
#[derive(Debug)]
pub struct EndpointConfig {
    signing_secret: SecretString,
    tenant_id: String,
    test_mode: bool,
}

impl EndpointConfig {
    /// Creates a new endpoint configuration.
    pub fn new(
        signing_secret: impl Into<String>,
        tenant_id: impl Into<String>,
        test_mode: bool,
    ) -> Self {
        Self {
            signing_secret: Secret::new(signing_secret.into()),
            tenant_id: tenant_id.into(),
            test_mode,
        }
    }

    /// The shared secret used to verify request signatures.
    pub fn signing_secret(&self) -> &str {
        self.signing_secret.expose_secret()
    }

    /// The only tenant this endpoint is authorized to mutate.
    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    /// Test mode lowers the severity of tenant-mismatch logs.
    ///
    /// It never relaxes signature verification.
    pub fn is_test_mode(&self) -> bool {
        self.test_mode
    }
}
