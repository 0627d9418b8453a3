//! Adapters - Implementations of port interfaces.
//!
//! - `http` - axum routes for webhook delivery
//! - `memory` - in-memory synchronizers
//! - `reporting` - tracing-backed webhook reporter

pub mod http;
pub mod memory;
pub mod reporting;

pub use memory::{
    InMemoryOrderSynchronizer, InMemorySubscriptionInvoiceSynchronizer,
    InMemorySubscriptionSynchronizer,
};
pub use reporting::TracingReporter;
