//! Inbound chat request validation.

use pipeline::{ChatError, ChatMessage, ConversationTranscript, MessageRole};
use serde_json::Value;

/// Parses a `{ "messages": [{role, content}, ...] }` body into a transcript.
///
/// # Errors
///
/// Returns [`ChatError::InvalidInput`] if the body is not JSON, `messages` is
/// missing or not an array, or any entry is not a well-formed user/assistant
/// message, or the array is empty.
pub fn parse_chat_request(body: &[u8]) -> Result<ConversationTranscript, ChatError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| ChatError::invalid_input(format!("request body is not valid JSON: {e}")))?;

    let entries = match value.get("messages") {
        None | Some(Value::Null) => return Err(ChatError::invalid_input("messages is required")),
        Some(Value::Array(entries)) => entries,
        Some(_) => return Err(ChatError::invalid_input("messages must be an array")),
    };

    let mut messages = Vec::with_capacity(entries.len());
    for (index, entry) in entries.iter().enumerate() {
        let role = entry.get("role").and_then(Value::as_str).ok_or_else(|| {
            ChatError::invalid_input(format!("messages[{index}].role must be a string"))
        })?;
        let content = entry.get("content").and_then(Value::as_str).ok_or_else(|| {
            ChatError::invalid_input(format!("messages[{index}].content must be a string"))
        })?;
        let role = match role {
            "user" => MessageRole::User,
            "assistant" => MessageRole::Assistant,
            _ => {
                return Err(ChatError::invalid_input(format!(
                    "messages[{index}].role must be \"user\" or \"assistant\""
                )))
            }
        };
        messages.push(ChatMessage {
            role,
            content: content.to_string(),
        });
    }

    ConversationTranscript::new(messages)
}
