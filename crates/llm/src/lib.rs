//! Completion endpoint infrastructure adapter.
//!
//! Implements the [`pipeline::CompletionClient`] trait for an OpenAI-compatible
//! chat-completions gateway. Other providers are added as new types in this
//! crate without any changes to the `pipeline` or `nodes` crates.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** HTTP transport, request formatting, response parsing,
//! per-call deadlines and status-code classification live here. The
//! orchestrator sees only [`pipeline::CompletionClient`] and the
//! [`pipeline::ChatError`] variants it returns:
//!
//! | Gateway outcome | Error |
//! |-----------------|-------|
//! | `429 Too Many Requests` | `RateLimited` |
//! | `402 Payment Required` | `CreditsExhausted` |
//! | other non-2xx, transport error, deadline, missing content | `ServiceUnavailable` |
//!
//! No call is ever retried here.

pub mod gateway;

pub use gateway::{
    GatewayClient, GatewayConfig, DEFAULT_CALL_TIMEOUT, DEFAULT_GATEWAY_URL, DEFAULT_MODEL,
};
