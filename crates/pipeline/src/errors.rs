//! Error taxonomy for a recipe chat invocation.
//!
//! [`ChatError`] is the single error type that crosses the port boundary: the
//! completion adapter produces the transport variants, the role codecs produce
//! the decoding variants, and the orchestrator produces
//! [`ChatError::RubricNotSatisfied`]. Every variant renders to the exact
//! human-readable text placed in a terminal `error` stream event, and maps to
//! the HTTP status used when the failure happens before any stream is opened.

use thiserror::Error;

/// Fallback message for a rejected final attempt that never received feedback.
pub const RUBRIC_NOT_SATISFIED_MESSAGE: &str =
    "The recipe did not satisfy the review rubric. Please try rephrasing your request.";

// ---------------------------------------------------------------------------
// Invocation-level errors
// ---------------------------------------------------------------------------

/// Failures that terminate one chat invocation.
///
/// None of these are retried at the layer that produces them. The only retry
/// in the system is the orchestrator's Writer/Reviewer round loop, which is
/// driven by reviewer verdicts, never by an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// The request body is not a valid chat request.
    ///
    /// Produced by: request validation, before any stream is opened.
    #[error("{message}")]
    InvalidInput {
        /// Description of what was wrong with the body.
        message: String,
    },

    /// Credentials or settings for the completion endpoint are missing or invalid.
    ///
    /// Produced at startup; the service never accepts requests with an invalid config.
    #[error("{message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },

    /// The completion endpoint reported a quota or rate limit.
    #[error("Rate limits exceeded. Please try again in a moment.")]
    RateLimited,

    /// The completion endpoint reported that billing credits are exhausted.
    #[error("AI usage credits depleted. Please add credits to continue.")]
    CreditsExhausted,

    /// Any other endpoint failure: non-success status, transport error,
    /// deadline expiry, or a response without textual content.
    ///
    /// `detail` is for logs only; callers see the generic message.
    #[error("AI service temporarily unavailable.")]
    ServiceUnavailable {
        /// Diagnostic detail (status code, transport error) for logging.
        detail: String,
    },

    /// The Director's output could not be decoded into a usable creative brief.
    #[error("The head chef could not prepare a creative brief: {detail}")]
    MalformedBrief {
        /// What failed: JSON syntax, missing field, or an empty invariant.
        detail: String,
    },

    /// The Reviewer's output could not be decoded into a verdict.
    #[error("The recipe review could not be read: {detail}")]
    MalformedVerdict {
        /// What failed: JSON syntax, wrong field type, or an out-of-range score.
        detail: String,
    },

    /// Every allowed review round rejected its draft.
    ///
    /// Renders as the last reviewer feedback so the caller learns what was missing.
    #[error("{feedback}")]
    RubricNotSatisfied {
        /// Last non-empty feedback, or [`RUBRIC_NOT_SATISFIED_MESSAGE`].
        feedback: String,
    },
}

impl ChatError {
    /// Creates an [`ChatError::InvalidInput`].
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Creates a [`ChatError::Configuration`].
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a [`ChatError::ServiceUnavailable`] carrying a log-only detail.
    pub fn service_unavailable(detail: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            detail: detail.into(),
        }
    }

    /// Creates a [`ChatError::RubricNotSatisfied`] from the last feedback seen,
    /// falling back to a generic explanation when no feedback was ever produced.
    pub fn rubric_not_satisfied(last_feedback: Option<String>) -> Self {
        let feedback = last_feedback
            .filter(|f| !f.trim().is_empty())
            .unwrap_or_else(|| RUBRIC_NOT_SATISFIED_MESSAGE.to_string());
        Self::RubricNotSatisfied { feedback }
    }

    /// Stable snake_case name of the variant, used as a structured log field.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput { .. } => "invalid_input",
            Self::Configuration { .. } => "configuration_error",
            Self::RateLimited => "rate_limited",
            Self::CreditsExhausted => "credits_exhausted",
            Self::ServiceUnavailable { .. } => "service_unavailable",
            Self::MalformedBrief { .. } => "malformed_brief",
            Self::MalformedVerdict { .. } => "malformed_verdict",
            Self::RubricNotSatisfied { .. } => "rubric_not_satisfied",
        }
    }

    /// HTTP status code for a failure reported as a plain (non-stream) response.
    pub fn http_status(&self) -> u16 {
        match self {
            Self::InvalidInput { .. } => 400,
            Self::RateLimited => 429,
            Self::CreditsExhausted => 402,
            Self::Configuration { .. }
            | Self::ServiceUnavailable { .. }
            | Self::MalformedBrief { .. }
            | Self::MalformedVerdict { .. }
            | Self::RubricNotSatisfied { .. } => 500,
        }
    }
}
