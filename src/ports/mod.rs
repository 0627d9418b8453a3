//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the webhook subsystem and the order/subscription domain it drives.
//! Adapters implement these ports.
//!
//! ## Synchronizer Ports
//!
//! - `OrderSynchronizer` - payment intent → order
//! - `SubscriptionInvoiceSynchronizer` - subscription invoice → order
//! - `SubscriptionLifecycleSynchronizer` - subscription update/delete → local record
//!
//! Each is idempotent per provider resource id and signals duplicates with
//! `SyncOutcome::AlreadyProcessed`.
//!
//! ## Reporting Ports
//!
//! - `WebhookReporter` - classification + tenant + event id for every request

mod order_synchronizer;
mod subscription_synchronizer;
mod sync_outcome;
mod webhook_reporter;

pub use order_synchronizer::{OrderDetail, OrderSynchronizer, SubscriptionInvoiceSynchronizer};
pub use subscription_synchronizer::{SubscriptionLifecycleSynchronizer, SubscriptionSyncParams};
pub use sync_outcome::{SyncError, SyncOutcome};
pub use webhook_reporter::{WebhookReport, WebhookReporter};
