//! In-memory order synchronizers.
//!
//! Keyed by provider resource id. The key check and insert happen under one
//! write lock, so concurrent duplicates resolve to exactly one `Applied`.
//! State is per-process: a multi-instance deployment needs a shared store
//! with a unique constraint on the key instead.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::ports::{
    OrderDetail, OrderSynchronizer, SubscriptionInvoiceSynchronizer, SyncError, SyncOutcome,
};

/// Order status assigned to orders created from settled payments.
const PAID: &str = "paid";

/// Orders keyed by source id.
#[derive(Default)]
struct OrderBook {
    orders: RwLock<HashMap<String, OrderDetail>>,
}

impl OrderBook {
    async fn create_once(
        &self,
        source_id: &str,
        tenant_id: &str,
    ) -> Result<SyncOutcome<OrderDetail>, SyncError> {
        if source_id.is_empty() {
            return Err(SyncError::NotFound("empty source id".to_string()));
        }

        let mut orders = self.orders.write().await;
        if orders.contains_key(source_id) {
            return Ok(SyncOutcome::AlreadyProcessed);
        }

        let order = OrderDetail {
            order_id: format!("ord_{}", Uuid::new_v4().simple()),
            tenant_id: tenant_id.to_string(),
            source_id: source_id.to_string(),
            status: PAID.to_string(),
        };
        orders.insert(source_id.to_string(), order.clone());
        Ok(SyncOutcome::Applied(order))
    }

    async fn get(&self, source_id: &str) -> Option<OrderDetail> {
        self.orders.read().await.get(source_id).cloned()
    }

    async fn len(&self) -> usize {
        self.orders.read().await.len()
    }
}

/// Creates one order per payment intent.
///
/// The payment-intent port carries no tenant, so the owning tenant is fixed
/// at construction, matching the endpoint this adapter is mounted behind.
pub struct InMemoryOrderSynchronizer {
    tenant_id: String,
    book: OrderBook,
}

impl InMemoryOrderSynchronizer {
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            book: OrderBook::default(),
        }
    }

    /// Order created from a payment intent, if any.
    pub async fn order_for(&self, payment_intent_id: &str) -> Option<OrderDetail> {
        self.book.get(payment_intent_id).await
    }

    pub async fn order_count(&self) -> usize {
        self.book.len().await
    }
}

#[async_trait]
impl OrderSynchronizer for InMemoryOrderSynchronizer {
    async fn create_order_from_payment_intent(
        &self,
        payment_intent_id: &str,
    ) -> Result<SyncOutcome<OrderDetail>, SyncError> {
        self.book.create_once(payment_intent_id, &self.tenant_id).await
    }
}

/// Creates one order per paid subscription invoice.
#[derive(Default)]
pub struct InMemorySubscriptionInvoiceSynchronizer {
    book: OrderBook,
}

impl InMemorySubscriptionInvoiceSynchronizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Order created from an invoice, if any.
    pub async fn order_for(&self, invoice_id: &str) -> Option<OrderDetail> {
        self.book.get(invoice_id).await
    }

    pub async fn order_count(&self) -> usize {
        self.book.len().await
    }
}

#[async_trait]
impl SubscriptionInvoiceSynchronizer for InMemorySubscriptionInvoiceSynchronizer {
    async fn create_order_from_subscription_invoice(
        &self,
        invoice_id: &str,
        tenant_id: &str,
    ) -> Result<SyncOutcome<OrderDetail>, SyncError> {
        self.book.create_once(invoice_id, tenant_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn first_call_applies_second_is_duplicate() {
        let sync = InMemoryOrderSynchronizer::new("tenant_a");

        let first = sync.create_order_from_payment_intent("pi_1").await.unwrap();
        let second = sync.create_order_from_payment_intent("pi_1").await.unwrap();

        match first {
            SyncOutcome::Applied(order) => {
                assert_eq!(order.source_id, "pi_1");
                assert_eq!(order.tenant_id, "tenant_a");
                assert_eq!(order.status, "paid");
                assert!(order.order_id.starts_with("ord_"));
            }
            SyncOutcome::AlreadyProcessed => panic!("first call must apply"),
        }
        assert_eq!(second, SyncOutcome::AlreadyProcessed);
        assert_eq!(sync.order_count().await, 1);
    }

    #[tokio::test]
    async fn concurrent_duplicates_apply_once() {
        let sync = Arc::new(InMemorySubscriptionInvoiceSynchronizer::new());

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let sync = sync.clone();
                tokio::spawn(async move {
                    sync.create_order_from_subscription_invoice("in_1", "tenant_a")
                        .await
                        .unwrap()
                })
            })
            .collect();

        let mut applied = 0;
        for task in tasks {
            if task.await.unwrap().is_applied() {
                applied += 1;
            }
        }

        assert_eq!(applied, 1);
        assert_eq!(sync.order_count().await, 1);
    }

    #[tokio::test]
    async fn invoice_order_uses_caller_tenant() {
        let sync = InMemorySubscriptionInvoiceSynchronizer::new();
        sync.create_order_from_subscription_invoice("in_1", "tenant_b")
            .await
            .unwrap();

        assert_eq!(sync.order_for("in_1").await.unwrap().tenant_id, "tenant_b");
    }

    #[tokio::test]
    async fn empty_key_is_rejected() {
        let sync = InMemoryOrderSynchronizer::new("tenant_a");
        let result = sync.create_order_from_payment_intent("").await;
        assert!(matches!(result, Err(SyncError::NotFound(_))));
    }
}
