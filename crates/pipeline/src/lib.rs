//! Core domain for the sous-chef recipe chat service.
//!
//! This crate holds every value type, identifier, codec and error used by the
//! Director → Writer ⇄ Reviewer pipeline, plus the [`CompletionClient`] port.
//! Infrastructure crates implement the port; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`InvocationId`, `ModelName`) |
//! | [`types`] | Transcript, brief, draft, verdict and stream event types |
//! | [`errors`] | The [`ChatError`] taxonomy |
//! | [`round`] | Bounded Writer/Reviewer round counter |
//! | [`codecs`] | Director and Reviewer output decoding |
//! | [`recipe`] | Inspection of the `recipe-json` block in a draft |
//! | [`ports`] | The [`CompletionClient`] trait |

pub mod codecs;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod recipe;
pub mod round;
pub mod types;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use codecs::{decode_brief, decode_verdict, strip_code_fence};
pub use errors::{ChatError, RUBRIC_NOT_SATISFIED_MESSAGE};
pub use identifiers::{InvocationId, ModelName};
pub use ports::CompletionClient;
pub use recipe::{Difficulty, RecipeCategory, RecipeSummary};
pub use round::{RoundState, MAX_REVIEW_ROUNDS};
pub use types::{
    ChatMessage, ConversationTranscript, CreativeBrief, Draft, MessageRole, ReviewVerdict,
    RubricCriterion, Score, StreamEvent,
};
