//! In-memory synchronizer adapters.
//!
//! Used by the binary for local runs and by tests. Replace with adapters over
//! a shared store for multi-instance deployments.

mod orders;
mod subscriptions;

pub use orders::{InMemoryOrderSynchronizer, InMemorySubscriptionInvoiceSynchronizer};
pub use subscriptions::{InMemorySubscriptionSynchronizer, SubscriptionRecord};
