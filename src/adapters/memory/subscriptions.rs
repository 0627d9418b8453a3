//! In-memory subscription lifecycle synchronizer.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::ports::{
    SubscriptionLifecycleSynchronizer, SubscriptionSyncParams, SyncError, SyncOutcome,
};

/// Local view of a provider subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionRecord {
    pub provider_subscription_id: String,
    pub tenant_id: String,
    pub status: String,
    pub customer_id: Option<String>,
    pub current_period_end: Option<i64>,
    pub cancel_at_period_end: bool,
    pub last_event_id: String,
}

#[derive(Default)]
struct State {
    records: HashMap<String, SubscriptionRecord>,
    applied_events: HashSet<String>,
}

/// Upserts subscription records by provider subscription id.
///
/// A replayed event id is reported as `AlreadyProcessed`. A record owned by
/// another tenant is never overwritten.
#[derive(Default)]
pub struct InMemorySubscriptionSynchronizer {
    state: RwLock<State>,
}

impl InMemorySubscriptionSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, provider_subscription_id: &str) -> Option<SubscriptionRecord> {
        self.state
            .read()
            .await
            .records
            .get(provider_subscription_id)
            .cloned()
    }
}

#[async_trait]
impl SubscriptionLifecycleSynchronizer for InMemorySubscriptionSynchronizer {
    async fn sync_subscription_from_webhook(
        &self,
        params: SubscriptionSyncParams,
    ) -> Result<SyncOutcome<()>, SyncError> {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let event_key = format!("{}:{}", params.provider_subscription_id, params.event_id);
        if state.applied_events.contains(&event_key) {
            return Ok(SyncOutcome::AlreadyProcessed);
        }

        let status = if params.event_type == "customer.subscription.deleted" {
            Some("canceled".to_string())
        } else {
            params.status.clone()
        };

        match state.records.get_mut(&params.provider_subscription_id) {
            Some(record) => {
                if record.tenant_id != params.tenant_id {
                    return Err(SyncError::InvalidTransition(format!(
                        "subscription {} belongs to another tenant",
                        params.provider_subscription_id
                    )));
                }
                if let Some(status) = status {
                    record.status = status;
                }
                if params.customer_id.is_some() {
                    record.customer_id = params.customer_id.clone();
                }
                if params.current_period_end.is_some() {
                    record.current_period_end = params.current_period_end;
                }
                if let Some(cancel) = params.cancel_at_period_end {
                    record.cancel_at_period_end = cancel;
                }
                record.last_event_id = params.event_id.clone();
            }
            None => {
                let record = SubscriptionRecord {
                    provider_subscription_id: params.provider_subscription_id.clone(),
                    tenant_id: params.tenant_id.clone(),
                    status: status.unwrap_or_else(|| "active".to_string()),
                    customer_id: params.customer_id.clone(),
                    current_period_end: params.current_period_end,
                    cancel_at_period_end: params.cancel_at_period_end.unwrap_or(false),
                    last_event_id: params.event_id.clone(),
                };
                state
                    .records
                    .insert(params.provider_subscription_id.clone(), record);
            }
        }

        state.applied_events.insert(event_key);
        Ok(SyncOutcome::Applied(()))
    }
}
