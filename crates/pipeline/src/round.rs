//! Writer/Reviewer round counter.
//!
//! A [`RoundState`] is an immutable value: advancing produces a new state or
//! `None` once the bound is reached, so the orchestrator's loop can never run a
//! round past [`MAX_REVIEW_ROUNDS`].

/// Maximum number of Writer/Reviewer rounds per invocation.
pub const MAX_REVIEW_ROUNDS: u32 = 3;

/// The current round: a 1-indexed attempt number plus the feedback the
/// previous round's Reviewer left for the Writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundState {
    attempt: u32,
    feedback: Option<String>,
}

impl RoundState {
    /// Round 1, with no feedback.
    pub fn first() -> Self {
        Self {
            attempt: 1,
            feedback: None,
        }
    }

    /// The 1-indexed attempt number.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Feedback for this round's Writer; `None` on round 1.
    pub fn feedback(&self) -> Option<&str> {
        self.feedback.as_deref()
    }

    /// `true` when this is the last allowed round.
    pub fn is_final(&self) -> bool {
        self.attempt >= MAX_REVIEW_ROUNDS
    }

    /// The next round, carrying `feedback`, or `None` if this round was final.
    ///
    /// Blank feedback is not carried forward.
    #[must_use]
    pub fn advance(self, feedback: &str) -> Option<Self> {
        if self.is_final() {
            return None;
        }
        let feedback = Some(feedback.to_string()).filter(|f| !f.trim().is_empty());
        Some(Self {
            attempt: self.attempt + 1,
            feedback,
        })
    }
}

impl std::fmt::Display for RoundState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.attempt, MAX_REVIEW_ROUNDS)
    }
}
