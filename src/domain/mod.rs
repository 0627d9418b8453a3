//! Domain layer - Webhook authentication, decoding and classification.
//!
//! Pure business logic with no HTTP or storage dependencies beyond the
//! status codes the response policy selects.

pub mod webhook;
