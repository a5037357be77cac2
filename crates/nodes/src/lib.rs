//! Recipe pipeline roles and the orchestrator that drives them.
//!
//! This crate provides the four role records (Director, Writer, Reviewer and
//! the single-agent Chef), their system prompts, the [`EventSink`] through
//! which progress leaves an invocation, and the [`Orchestrator`] state machine.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** The orchestrator sequences calls through the
//! [`pipeline::CompletionClient`] port and the codecs in the [`pipeline`]
//! crate. It knows nothing about HTTP or SSE framing: it produces an ordered
//! sequence of [`pipeline::StreamEvent`] values and the transport decides how
//! they reach the client.

pub mod orchestrator;
pub mod prompts;
pub mod roles;
pub mod sink;
pub mod status;

pub use orchestrator::{Mode, Orchestrator};
pub use roles::{Role, RoleContext};
pub use sink::{channel, EventSink};
