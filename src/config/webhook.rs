//! Webhook endpoint configuration

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::webhook::{EndpointConfig, DEFAULT_TOLERANCE_SECS};

/// Webhook endpoint settings (one mounted provider route)
#[derive(Debug, Deserialize)]
pub struct WebhookSettings {
    /// Provider path segment (`/webhooks/{provider}`)
    #[serde(default = "default_provider")]
    pub provider: String,

    /// Signing secret shared with the provider
    pub signing_secret: SecretString,

    /// The only tenant this endpoint may mutate
    #[serde(default)]
    pub tenant_id: String,

    /// Lowers tenant-mismatch log severity; never relaxes verification
    #[serde(default)]
    pub test_mode: bool,

    /// Maximum signature age in seconds
    #[serde(default = "default_tolerance")]
    pub tolerance_secs: i64,
}

impl WebhookSettings {
    /// Build the immutable endpoint configuration
    pub fn endpoint_config(&self) -> EndpointConfig {
        EndpointConfig::new(
            self.signing_secret.expose_secret().as_str(),
            self.tenant_id.trim(),
            self.test_mode,
        )
    }

    /// Validate webhook configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        let secret = self.signing_secret.expose_secret();
        if secret.is_empty() {
            return Err(ValidationError::MissingRequired("WEBHOOK__SIGNING_SECRET"));
        }
        if self.tenant_id.trim().is_empty() {
            return Err(ValidationError::MissingRequired("WEBHOOK__TENANT_ID"));
        }

        // Verify secret prefix for safety
        if !secret.starts_with("whsec_") {
            return Err(ValidationError::InvalidWebhookSecret);
        }

        let provider_ok = !self.provider.is_empty()
            && self
                .provider
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '_');
        if !provider_ok {
            return Err(ValidationError::InvalidProvider(self.provider.clone()));
        }

        if !(1..=3600).contains(&self.tolerance_secs) {
            return Err(ValidationError::InvalidTolerance);
        }

        Ok(())
    }
}

fn default_provider() -> String {
    "stripe".to_string()
}

fn default_tolerance() -> i64 {
    DEFAULT_TOLERANCE_SECS
}
