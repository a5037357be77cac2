//! The orchestrator: Director → (Writer ⇄ Reviewer)+ → terminal event.
//!
//! ```text
//! Init → Briefing ──fail──────────────────────────────────────────► Failed
//!           │ brief ok
//!           ▼
//!        Writing(n) → Reviewing(n) ──passed────────────────────────► Approved
//!           ▲               │ rejected, n < MAX_REVIEW_ROUNDS
//!           └───────────────┘
//!                           │ rejected, n = MAX_REVIEW_ROUNDS ─────► Failed
//!   any client/codec failure ─────────────────────────────────────► Failed
//!   client gone (checked after every call, before every round) ───► Abandoned
//! ```
//!
//! One invocation is one sequential task. Errors never escape [`Orchestrator::run`]:
//! every path ends in exactly one terminal event, or in silence once the
//! client has disconnected.

use std::sync::Arc;

use pipeline::{
    recipe, ChatError, CompletionClient, ConversationTranscript, Draft, InvocationId, RoundState,
};
use tracing::{info, info_span, warn, Instrument};

use crate::roles::{
    ChefInput, DirectorInput, ReviewerInput, WriterInput, CHEF, DIRECTOR, REVIEWER, WRITER,
};
use crate::sink::EventSink;
use crate::status;

/// Which pipeline an invocation runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Director, then up to `MAX_REVIEW_ROUNDS` Writer/Reviewer rounds.
    #[default]
    MultiAgent,
    /// A single Chef call; no brief, no review.
    SingleAgent,
}

/// How a supervised run ended, short of a failure.
#[derive(Debug)]
enum Outcome {
    Approved(Draft),
    Abandoned,
}

/// Drives one invocation at a time per call to [`Orchestrator::run`].
///
/// Holds no per-invocation state, so one instance serves every request.
pub struct Orchestrator {
    client: Arc<dyn CompletionClient>,
    mode: Mode,
}

impl Orchestrator {
    /// Creates an orchestrator over `client`.
    pub fn new(client: Arc<dyn CompletionClient>, mode: Mode) -> Self {
        Self { client, mode }
    }

    /// The configured mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Runs one invocation, pushing status events and then exactly one
    /// terminal event into `sink` (nothing more once the client disconnects).
    pub async fn run(&self, transcript: ConversationTranscript, sink: EventSink) {
        let span = info_span!(
            "invocation",
            invocation_id = %InvocationId::new_random(),
            mode = ?self.mode,
            messages = transcript.len(),
        );

        async move {
            info!("Invocation started");
            let result = match self.mode {
                Mode::MultiAgent => self.supervise(&transcript, &sink).await,
                Mode::SingleAgent => self.single_call(&transcript, &sink).await,
            };

            match result {
                Ok(Outcome::Approved(draft)) => {
                    log_approved(&draft);
                    sink.finish(Ok(draft));
                }
                Ok(Outcome::Abandoned) => {
                    info!("Client disconnected; invocation abandoned");
                }
                Err(err) => {
                    warn!(kind = err.kind(), error = %err, "Invocation failed");
                    sink.finish(Err(err));
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn supervise(
        &self,
        transcript: &ConversationTranscript,
        sink: &EventSink,
    ) -> Result<Outcome, ChatError> {
        let client = self.client.as_ref();

        sink.status(status::received(
            transcript.latest_user_message().unwrap_or_default(),
        ));
        sink.status(status::COORDINATING);

        let brief = DIRECTOR.call(client, &DirectorInput { transcript }).await?;
        if sink.is_closed() {
            return Ok(Outcome::Abandoned);
        }
        info!(
            criteria = brief.rubric().len(),
            failure_conditions = brief.failure_conditions().len(),
            "Creative brief ready"
        );
        sink.status(status::BRIEF_READY);

        let mut round = RoundState::first();
        let mut last_feedback: Option<String> = None;
        loop {
            if sink.is_closed() {
                return Ok(Outcome::Abandoned);
            }

            sink.status(status::drafting(&round));
            let draft = WRITER
                .call_in_round(
                    client,
                    &WriterInput {
                        brief: &brief,
                        transcript,
                        feedback: round.feedback(),
                    },
                    &round,
                )
                .await?;
            if sink.is_closed() {
                return Ok(Outcome::Abandoned);
            }

            sink.status(status::reviewing(&round));
            let verdict = REVIEWER
                .call_in_round(
                    client,
                    &ReviewerInput {
                        brief: &brief,
                        draft: &draft,
                    },
                    &round,
                )
                .await?;
            if sink.is_closed() {
                return Ok(Outcome::Abandoned);
            }

            info!(
                attempt = round.attempt(),
                passed = verdict.passed,
                score = verdict.score.as_f64(),
                "Review complete"
            );
            if verdict.passed {
                sink.status(status::approved(verdict.score));
                return Ok(Outcome::Approved(draft));
            }

            if !verdict.feedback.is_empty() {
                last_feedback = Some(verdict.feedback.clone());
            }
            round = match round.advance(&verdict.feedback) {
                Some(next) => {
                    sink.status(status::feedback(&verdict.feedback));
                    next
                }
                None => return Err(ChatError::rubric_not_satisfied(last_feedback)),
            };
        }
    }

    async fn single_call(
        &self,
        transcript: &ConversationTranscript,
        sink: &EventSink,
    ) -> Result<Outcome, ChatError> {
        sink.status(status::received(
            transcript.latest_user_message().unwrap_or_default(),
        ));
        sink.status(status::PREPARING);

        let reply = CHEF
            .call(self.client.as_ref(), &ChefInput { transcript })
            .await?;
        if sink.is_closed() {
            return Ok(Outcome::Abandoned);
        }
        Ok(Outcome::Approved(reply))
    }
}

fn log_approved(draft: &Draft) {
    match recipe::summarize(draft.as_str()) {
        Some(summary) => info!(
            title = %summary.title,
            category = summary.category.map(|c| c.label()),
            servings = summary.servings,
            difficulty = summary.difficulty.map(|d| d.label()),
            chars = draft.as_str().len(),
            "Recipe delivered"
        ),
        None => info!(
            chars = draft.as_str().len(),
            "Reply delivered without a readable recipe block"
        ),
    }
}
