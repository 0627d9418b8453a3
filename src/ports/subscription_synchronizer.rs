//! SubscriptionLifecycleSynchronizer port - Keeps local subscription records
//! in step with provider subscription events.

use async_trait::async_trait;

use super::sync_outcome::{SyncError, SyncOutcome};

/// Parameters for a subscription sync, extracted from the event payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionSyncParams {
    /// Provider subscription id (idempotency key together with `event_id`).
    pub provider_subscription_id: String,
    /// Provider event type that triggered the sync.
    pub event_type: String,
    /// Provider event id.
    pub event_id: String,
    /// Tenant that passed the tenant guard.
    pub tenant_id: String,
    /// Subscription status reported by the provider, when present.
    pub status: Option<String>,
    /// Provider customer id, when present.
    pub customer_id: Option<String>,
    /// End of the current billing period (Unix timestamp), when present.
    pub current_period_end: Option<i64>,
    /// Whether the subscription is set to cancel at period end.
    pub cancel_at_period_end: Option<bool>,
}

/// Port for applying subscription lifecycle changes.
///
/// Implementations typically upsert by `provider_subscription_id` and may
/// return `Applied` on every call; returning `AlreadyProcessed` for a
/// replayed event is also valid.
#[async_trait]
pub trait SubscriptionLifecycleSynchronizer: Send + Sync {
    async fn sync_subscription_from_webhook(
        &self,
        params: SubscriptionSyncParams,
    ) -> Result<SyncOutcome<()>, SyncError>;
}
