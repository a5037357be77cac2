//! Shared value types for a recipe chat invocation.
//!
//! Unlike the identifiers in [`crate::identifiers`], these types carry values
//! with invariants (a transcript is never empty, a brief always has a rubric,
//! scores stay in `[0, 100]`) and flow between the roles of the orchestrator.

use serde::{Deserialize, Serialize};

use crate::ChatError;

// ---------------------------------------------------------------------------
// Messages and transcripts
// ---------------------------------------------------------------------------

/// Author of one chat message.
///
/// `System` only ever appears in requests built for the completion endpoint;
/// a caller-supplied transcript may contain only `User` and `Assistant`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// Fixed role instructions.
    System,
    /// The person chatting.
    User,
    /// A previous model reply.
    Assistant,
}

/// One `{role, content}` entry, in the shape the completion endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who authored the message.
    pub role: MessageRole,
    /// Message text.
    pub content: String,
}

impl ChatMessage {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    /// Creates an assistant message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------

/// The caller's conversation so far: a non-empty, ordered list of user and
/// assistant messages. Read-only for the lifetime of one invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConversationTranscript(Vec<ChatMessage>);

impl ConversationTranscript {
    /// Creates a transcript.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::InvalidInput`] if `messages` is empty or contains a
    /// `system` message.
    pub fn new(messages: Vec<ChatMessage>) -> Result<Self, ChatError> {
        if messages.is_empty() {
            return Err(ChatError::invalid_input("messages must not be empty"));
        }
        if let Some(index) = messages
            .iter()
            .position(|m| m.role == MessageRole::System)
        {
            return Err(ChatError::invalid_input(format!(
                "messages[{index}].role must be \"user\" or \"assistant\""
            )));
        }
        Ok(Self(messages))
    }

    /// Returns the messages in order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.0
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; a transcript is never empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Content of the most recent user message, if any.
    pub fn latest_user_message(&self) -> Option<&str> {
        self.0
            .iter()
            .rev()
            .find(|m| m.role == MessageRole::User)
            .map(|m| m.content.as_str())
    }
}

// ---------------------------------------------------------------------------
// Creative brief
// ---------------------------------------------------------------------------

/// One rubric line: what the Reviewer checks and what a passing draft shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RubricCriterion {
    /// Short name of the criterion (e.g. `"Ingredient table"`).
    pub criterion: String,
    /// What a draft must contain to satisfy it.
    pub expectations: String,
}

/// Director output: instructions for the Writer plus the rubric and failure
/// conditions the Reviewer applies. Produced once per invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreativeBrief {
    writer_brief: String,
    rubric: Vec<RubricCriterion>,
    failure_conditions: Vec<String>,
}

impl CreativeBrief {
    /// Creates a brief.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::MalformedBrief`] if `writer_brief` is blank, the
    /// rubric is empty, or any criterion name is blank.
    pub fn new(
        writer_brief: impl Into<String>,
        rubric: Vec<RubricCriterion>,
        failure_conditions: Vec<String>,
    ) -> Result<Self, ChatError> {
        let writer_brief = writer_brief.into();
        if writer_brief.trim().is_empty() {
            return Err(ChatError::MalformedBrief {
                detail: "writerBrief is empty".into(),
            });
        }
        if rubric.is_empty() {
            return Err(ChatError::MalformedBrief {
                detail: "rubric has no criteria".into(),
            });
        }
        if let Some(index) = rubric.iter().position(|c| c.criterion.trim().is_empty()) {
            return Err(ChatError::MalformedBrief {
                detail: format!("rubric[{index}].criterion is empty"),
            });
        }
        let failure_conditions = failure_conditions
            .into_iter()
            .filter(|c| !c.trim().is_empty())
            .collect();
        Ok(Self {
            writer_brief,
            rubric,
            failure_conditions,
        })
    }

    /// Instructions for the Writer.
    pub fn writer_brief(&self) -> &str {
        &self.writer_brief
    }

    /// Evaluation criteria, in the Director's order.
    pub fn rubric(&self) -> &[RubricCriterion] {
        &self.rubric
    }

    /// Conditions that fail a draft outright.
    pub fn failure_conditions(&self) -> &[String] {
        &self.failure_conditions
    }
}

// ---------------------------------------------------------------------------
// Drafts and verdicts
// ---------------------------------------------------------------------------

/// One Writer output: markdown recipe body plus its embedded `recipe-json`
/// block. Opaque to the orchestrator and forwarded verbatim on approval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft(String);

impl Draft {
    /// Wraps raw Writer output.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// Returns the draft text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the draft, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

// ---------------------------------------------------------------------------

/// Reviewer score in the range `[0, 100]`.
///
/// Informational only: approval is decided by [`ReviewVerdict::passed`], never
/// by comparing this value to a threshold.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Score(f64);

impl Score {
    /// Creates a [`Score`], returning `None` if `value` is outside `[0, 100]`
    /// or not finite.
    #[must_use]
    pub fn new(value: f64) -> Option<Self> {
        if value.is_finite() && (0.0..=100.0).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the score as an `f64`.
    pub fn as_f64(self) -> f64 {
        self.0
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reviewer output for exactly one draft.
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewVerdict {
    /// Whether the draft is approved. The only field that drives the state machine.
    pub passed: bool,
    /// Reviewer's score.
    pub score: Score,
    /// What to fix; carried into the next Writer round when `passed` is false.
    pub feedback: String,
}

// ---------------------------------------------------------------------------
// Stream protocol
// ---------------------------------------------------------------------------

/// One unit of the outbound progress/result protocol.
///
/// Serialises as `{"type":"status"|"assistant"|"error","content":"..."}`.
/// A well-formed stream is any number of `Status` events followed by exactly
/// one `Assistant` or `Error`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "lowercase")]
pub enum StreamEvent {
    /// Progress update.
    Status(String),
    /// Terminal: the approved document.
    Assistant(String),
    /// Terminal: a human-readable failure explanation.
    Error(String),
}

impl StreamEvent {
    /// Returns `true` for `Assistant` and `Error`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Status(_))
    }

    /// Returns the event's text.
    pub fn content(&self) -> &str {
        match self {
            Self::Status(c) | Self::Assistant(c) | Self::Error(c) => c,
        }
    }
}
