//! The roles the orchestrator sequences.
//!
//! Every role makes the same kind of call against the same [`CompletionClient`];
//! roles differ only in their fixed system prompt, in how the request context
//! is built from their input, and in how the reply is decoded. A [`Role`] is a
//! plain record of the prompt and the decoder; the context comes from the
//! input type through [`RoleContext`].

use std::fmt::Write as _;
use std::time::Instant;

use pipeline::{
    decode_brief, decode_verdict, ChatError, ChatMessage, CompletionClient,
    ConversationTranscript, CreativeBrief, Draft, MessageRole, ReviewVerdict, RoundState,
};
use tracing::debug;

use crate::prompts::{CHEF_PROMPT, DIRECTOR_PROMPT, REVIEWER_PROMPT, WRITER_PROMPT};

/// Heading placed before reviewer feedback in the Writer's context.
pub const FEEDBACK_HEADING: &str = "Reviewer feedback on your previous draft";

/// Builds the messages that follow a role's system prompt.
pub trait RoleContext {
    /// Context messages, in order.
    fn context(&self) -> Vec<ChatMessage>;
}

/// A role: its name (for logs), system prompt and output decoder.
pub struct Role<O> {
    pub name: &'static str,
    pub system_prompt: &'static str,
    pub decode: fn(&str) -> Result<O, ChatError>,
}

impl<O> Role<O> {
    /// The full request for `input`: system prompt first, then the context.
    pub fn messages<I: RoleContext + ?Sized>(&self, input: &I) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system(self.system_prompt)];
        messages.extend(input.context());
        messages
    }

    /// Calls the completion endpoint as this role and decodes the reply.
    ///
    /// # Errors
    ///
    /// Any [`ChatError`] from the client, or the decoder's malformed-output error.
    pub async fn call<I: RoleContext + ?Sized>(
        &self,
        client: &dyn CompletionClient,
        input: &I,
    ) -> Result<O, ChatError> {
        self.invoke(client, input, None).await
    }

    /// Like [`Role::call`], recording which review round the call belongs to.
    ///
    /// # Errors
    ///
    /// Same as [`Role::call`].
    pub async fn call_in_round<I: RoleContext + ?Sized>(
        &self,
        client: &dyn CompletionClient,
        input: &I,
        round: &RoundState,
    ) -> Result<O, ChatError> {
        self.invoke(client, input, Some(round.attempt())).await
    }

    async fn invoke<I: RoleContext + ?Sized>(
        &self,
        client: &dyn CompletionClient,
        input: &I,
        attempt: Option<u32>,
    ) -> Result<O, ChatError> {
        let started = Instant::now();
        let raw = client.complete(&self.messages(input)).await?;
        let decoded = (self.decode)(&raw);
        debug!(
            role = self.name,
            attempt,
            elapsed_ms = started.elapsed().as_millis() as u64,
            decoded = decoded.is_ok(),
            "Role call returned"
        );
        decoded
    }
}

fn draft_from_raw(raw: &str) -> Result<Draft, ChatError> {
    Ok(Draft::new(raw))
}

/// Turns the conversation into a creative brief.
pub const DIRECTOR: Role<CreativeBrief> = Role {
    name: "director",
    system_prompt: DIRECTOR_PROMPT,
    decode: decode_brief,
};

/// Turns the brief into a recipe draft.
pub const WRITER: Role<Draft> = Role {
    name: "writer",
    system_prompt: WRITER_PROMPT,
    decode: draft_from_raw,
};

/// Scores a draft against the rubric.
pub const REVIEWER: Role<ReviewVerdict> = Role {
    name: "reviewer",
    system_prompt: REVIEWER_PROMPT,
    decode: decode_verdict,
};

/// Answers the conversation in a single call (single-agent mode).
pub const CHEF: Role<Draft> = Role {
    name: "chef",
    system_prompt: CHEF_PROMPT,
    decode: draft_from_raw,
};

// ---------------------------------------------------------------------------
// Role inputs
// ---------------------------------------------------------------------------

/// Director input: the conversation, rendered as one message so the model
/// answers with a brief instead of continuing the chat.
pub struct DirectorInput<'a> {
    pub transcript: &'a ConversationTranscript,
}

impl RoleContext for DirectorInput<'_> {
    fn context(&self) -> Vec<ChatMessage> {
        let mut text = String::from("Conversation so far:\n");
        for message in self.transcript.messages() {
            let speaker = match message.role {
                MessageRole::User => "GUEST",
                MessageRole::Assistant => "CHEF",
                MessageRole::System => continue,
            };
            let _ = write!(text, "\n{speaker}: {}\n", message.content);
        }
        text.push_str("\nWrite the creative brief for the recipe the guest wants.");
        vec![ChatMessage::user(text)]
    }
}

/// Writer input: the conversation followed by the brief, the rubric and,
/// from round 2 on, the previous round's feedback.
pub struct WriterInput<'a> {
    pub brief: &'a CreativeBrief,
    pub transcript: &'a ConversationTranscript,
    pub feedback: Option<&'a str>,
}

impl RoleContext for WriterInput<'_> {
    fn context(&self) -> Vec<ChatMessage> {
        let mut text = format!("Creative brief:\n{}\n", self.brief.writer_brief());
        push_rubric(&mut text, self.brief);
        if let Some(feedback) = self.feedback {
            let _ = write!(
                text,
                "\n{FEEDBACK_HEADING} (address every point):\n{feedback}\n"
            );
        }
        let mut messages = self.transcript.messages().to_vec();
        messages.push(ChatMessage::user(text));
        messages
    }
}

/// Reviewer input: the rubric and the draft under review.
pub struct ReviewerInput<'a> {
    pub brief: &'a CreativeBrief,
    pub draft: &'a Draft,
}

impl RoleContext for ReviewerInput<'_> {
    fn context(&self) -> Vec<ChatMessage> {
        let mut text = String::new();
        push_rubric(&mut text, self.brief);
        let _ = write!(text, "\nDraft under review:\n\n{}\n", self.draft.as_str());
        vec![ChatMessage::user(text)]
    }
}

/// Chef input: the conversation as-is.
pub struct ChefInput<'a> {
    pub transcript: &'a ConversationTranscript,
}

impl RoleContext for ChefInput<'_> {
    fn context(&self) -> Vec<ChatMessage> {
        self.transcript.messages().to_vec()
    }
}

fn push_rubric(text: &mut String, brief: &CreativeBrief) {
    text.push_str("\nRubric:\n");
    for item in brief.rubric() {
        let _ = writeln!(text, "- {}: {}", item.criterion, item.expectations);
    }
    if !brief.failure_conditions().is_empty() {
        text.push_str("\nFailure conditions:\n");
        for condition in brief.failure_conditions() {
            let _ = writeln!(text, "- {condition}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::Write as _;
    use std::sync::{Arc, Mutex};

    use pipeline::testing::ScriptedCompletionClient;
    use pipeline::RubricCriterion;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Collects every event's fields as `name=value` text.
    #[derive(Clone, Default)]
    struct CapturedEvents(Arc<Mutex<Vec<String>>>);

    impl<S: tracing::Subscriber> Layer<S> for CapturedEvents {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            let mut line = String::new();
            event.record(&mut |field: &tracing::field::Field, value: &dyn std::fmt::Debug| {
                let _ = write!(line, "{}={:?} ", field.name(), value);
            });
            self.0.lock().unwrap().push(line);
        }
    }

    fn transcript() -> ConversationTranscript {
        ConversationTranscript::new(vec![
            ChatMessage::user("Tell me about smoking brisket"),
            ChatMessage::assistant("Brisket rewards patience."),
            ChatMessage::user("I want to make it this weekend"),
        ])
        .unwrap()
    }

    fn brief() -> CreativeBrief {
        CreativeBrief::new(
            "Texas-style smoked brisket for 10.",
            vec![RubricCriterion {
                criterion: "Bark".into(),
                expectations: "Salt and pepper rub only".into(),
            }],
            vec!["Liquid smoke".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_director_renders_transcript_as_single_message() {
        let t = transcript();
        let messages = DIRECTOR.messages(&DirectorInput { transcript: &t });
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], ChatMessage::system(DIRECTOR_PROMPT));
        assert!(messages[1].content.contains("GUEST: I want to make it this weekend"));
        assert!(messages[1].content.contains("CHEF: Brisket rewards patience."));
    }

    #[test]
    fn test_writer_context_includes_brief_rubric_and_conversation() {
        let (t, b) = (transcript(), brief());
        let messages = WRITER.messages(&WriterInput {
            brief: &b,
            transcript: &t,
            feedback: None,
        });
        assert_eq!(messages.len(), 5);
        let last = &messages[4].content;
        assert!(last.contains("Texas-style smoked brisket for 10."));
        assert!(last.contains("- Bark: Salt and pepper rub only"));
        assert!(last.contains("- Liquid smoke"));
        assert!(!last.contains(FEEDBACK_HEADING));
    }

    #[test]
    fn test_writer_context_appends_feedback() {
        let (t, b) = (transcript(), brief());
        let messages = WRITER.messages(&WriterInput {
            brief: &b,
            transcript: &t,
            feedback: Some("Add resting time"),
        });
        let last = &messages.last().unwrap().content;
        assert!(last.contains(FEEDBACK_HEADING));
        assert!(last.ends_with("Add resting time\n"));
    }

    #[tokio::test]
    async fn test_reviewer_call_decodes_verdict() {
        let client = ScriptedCompletionClient::new([Ok(
            r#"{"passed": true, "score": 91, "feedback": ""}"#.to_string()
        )]);
        let b = brief();
        let draft = Draft::new("# Brisket");
        let verdict = REVIEWER
            .call(&client, &ReviewerInput { brief: &b, draft: &draft })
            .await
            .unwrap();
        assert!(verdict.passed);
        assert!(client.calls()[0][1].content.contains("# Brisket"));
    }

    #[tokio::test]
    async fn test_writer_passes_output_through_verbatim() {
        let raw = "### 1. Introduction\n\nSmoke.";
        let client = ScriptedCompletionClient::new([Ok(raw.to_string())]);
        let t = transcript();
        let draft = CHEF.call(&client, &ChefInput { transcript: &t }).await.unwrap();
        assert_eq!(draft.as_str(), raw);
    }

    #[tokio::test]
    async fn test_round_calls_log_their_attempt() {
        let captured = CapturedEvents::default();
        let _guard =
            tracing::subscriber::set_default(tracing_subscriber::registry().with(captured.clone()));

        let client = ScriptedCompletionClient::new([Ok("# Brisket, revised".to_string())]);
        let (t, b) = (transcript(), brief());
        let round = RoundState::first().advance("Add resting time").unwrap();
        WRITER
            .call_in_round(
                &client,
                &WriterInput {
                    brief: &b,
                    transcript: &t,
                    feedback: round.feedback(),
                },
                &round,
            )
            .await
            .unwrap();

        let events = captured.0.lock().unwrap().clone();
        let returned = events
            .iter()
            .find(|line| line.contains("Role call returned"))
            .expect("role call should be logged");
        assert!(returned.contains("role=\"writer\""), "{returned}");
        assert!(returned.contains("attempt=2"), "{returned}");
    }
}
