//! Test doubles for the [`crate::CompletionClient`] port.
//!
//! Enabled by the `test-utils` feature so downstream crates can drive the
//! orchestrator and HTTP layer without a network.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::{ChatError, ChatMessage, CompletionClient, MessageRole};

/// A [`CompletionClient`] that replays a fixed script of responses in order
/// and records every request it receives.
///
/// Once the script is exhausted every further call fails with
/// [`ChatError::ServiceUnavailable`].
#[derive(Debug, Default)]
pub struct ScriptedCompletionClient {
    responses: Mutex<VecDeque<Result<String, ChatError>>>,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl ScriptedCompletionClient {
    /// Creates a client that answers with `responses`, one per call.
    pub fn new(responses: impl IntoIterator<Item = Result<String, ChatError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every request received so far, in call order.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Number of requests whose system prompt equals `system_prompt`.
    pub fn calls_with_system_prompt(&self, system_prompt: &str) -> usize {
        self.calls()
            .iter()
            .filter(|messages| {
                messages.first().is_some_and(|m| {
                    m.role == MessageRole::System && m.content == system_prompt
                })
            })
            .count()
    }

    /// Number of scripted responses not yet consumed.
    pub fn remaining(&self) -> usize {
        self.responses.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletionClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(messages.to_vec());
        }
        self.responses
            .lock()
            .ok()
            .and_then(|mut r| r.pop_front())
            .unwrap_or_else(|| Err(ChatError::service_unavailable("script exhausted")))
    }
}
