//! HTTP surface of the recipe chat service.
//!
//! Accepts `POST /chat` with `{ "messages": [...] }`, validates the transcript,
//! runs one [`nodes::Orchestrator`] invocation on its own task and streams its
//! events back as server-sent events:
//!
//! ```text
//! data: {"type":"status","content":"Request received: \"I want to make canelés\""}
//!
//! data: {"type":"status","content":"Attempt 1/3: drafting the recipe..."}
//!
//! data: {"type":"assistant","content":"### 1. Introduction ..."}
//!
//! data: [DONE]
//! ```
//!
//! Validation failures never open a stream; they are answered with a JSON
//! `{ "error": ... }` body and a matching status code. Every response carries
//! permissive CORS headers and `OPTIONS` preflights get an empty `200`.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Framing, CORS, request decoding and client-disconnect
//! detection live here. Dropping the response body drops the event receiver,
//! which the orchestrator observes as a closed sink and stops cooperatively.

pub mod request;
pub mod server;

pub use request::parse_chat_request;
pub use server::{event_stream, router, ApiError, AppState, ALLOWED_HEADERS, DONE_SENTINEL};
