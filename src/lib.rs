//! Billing Webhooks - Payment-event webhook ingestion
//!
//! Authenticates billing-provider webhooks, enforces tenant isolation on a
//! shared endpoint and drives idempotent order and subscription
//! synchronization.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
