//! Application handlers.
//!
//! Command handlers that orchestrate domain operations.

pub mod webhook;

pub use webhook::{
    ProcessWebhookCommand, ProcessWebhookHandler, ProcessWebhookResult, Synchronizers,
    WebhookRouter,
};
