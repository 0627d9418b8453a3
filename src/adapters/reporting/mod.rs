//! Reporting adapters - implementations of `WebhookReporter`.

mod tracing_reporter;

pub use tracing_reporter::TracingReporter;
