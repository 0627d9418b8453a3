//! Order synchronizer ports - Interfaces for turning payments into orders.
//!
//! Both operations are idempotent with respect to their key: the second call
//! for the same payment intent or invoice returns
//! `SyncOutcome::AlreadyProcessed` (or is a natural upsert). The key's
//! uniqueness is enforced by the shared persistent store, never in-process,
//! so concurrent duplicate deliveries across instances stay safe.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::sync_outcome::{SyncError, SyncOutcome};

/// Order produced from a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetail {
    /// Local order id.
    pub order_id: String,
    /// Tenant that owns the order.
    pub tenant_id: String,
    /// Provider object the order was created from (payment intent or invoice id).
    pub source_id: String,
    /// Order status after synchronization (e.g. "paid").
    pub status: String,
}

/// Port for creating orders from one-off payments.
#[async_trait]
pub trait OrderSynchronizer: Send + Sync {
    /// Creates the order for a succeeded payment intent.
    ///
    /// Keyed by `payment_intent_id`.
    async fn create_order_from_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<SyncOutcome<OrderDetail>, SyncError>;
}

/// Port for creating orders from paid subscription invoices.
#[async_trait]
pub trait SubscriptionInvoiceSynchronizer: Send + Sync {
    /// Creates the order for a paid subscription invoice.
    ///
    /// Keyed by `invoice_id`; `tenant_id` is the endpoint tenant that passed
    /// the tenant guard.
    async fn create_order_from_subscription_invoice(
        &self,
        invoice_id: &str,
        tenant_id: &str,
    ) -> Result<SyncOutcome<OrderDetail>, SyncError>;
}
