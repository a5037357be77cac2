//! Port traits implemented by infrastructure crates.
//!
//! The orchestrator depends only on these traits; the concrete HTTP adapter
//! lives in the `llm` crate and test fakes live in [`crate::testing`].

use async_trait::async_trait;

use crate::{ChatError, ChatMessage};

/// One non-streaming call to the LLM completion endpoint.
///
/// Implementations are stateless between calls and never retry: a rate-limit,
/// credits or availability failure is returned to the orchestrator as the
/// matching [`ChatError`] variant and ends the invocation.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Sends `messages` (the first being the active role's system prompt) and
    /// returns the trimmed text of the single returned choice.
    ///
    /// # Errors
    ///
    /// [`ChatError::RateLimited`], [`ChatError::CreditsExhausted`] or
    /// [`ChatError::ServiceUnavailable`].
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError>;
}
