//! Webhook handlers.
//!
//! - `router` - static event-type routing and synchronizer call planning
//! - `process_webhook` - end-to-end handling of one request

mod process_webhook;
mod router;

pub use process_webhook::{
    ProcessWebhookCommand, ProcessWebhookHandler, ProcessWebhookResult, Synchronizers,
};
pub use router::{plan, Plan, Route, SyncCall, WebhookRouter};
