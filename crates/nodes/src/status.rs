//! Human-readable status lines shown while an invocation runs.

use pipeline::{RoundState, Score};

/// Longest receipt preview, in characters.
pub const PREVIEW_CHARS: usize = 80;

/// Sent once the Director call starts.
pub const COORDINATING: &str = "Head chef is coordinating the brigade and drafting a creative brief...";
/// Sent once the brief has been decoded.
pub const BRIEF_READY: &str = "Creative brief ready. Handing it to the recipe writer.";
/// Sent before the single Chef call.
pub const PREPARING: &str = "Preparing your recipe...";

/// Collapses whitespace and truncates `text` to [`PREVIEW_CHARS`] characters,
/// marking a cut with an ellipsis.
pub fn preview(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.chars().count() <= PREVIEW_CHARS {
        return collapsed;
    }
    let mut cut: String = collapsed.chars().take(PREVIEW_CHARS).collect();
    cut.truncate(cut.trim_end().len());
    cut.push('…');
    cut
}

/// Receipt line quoting a preview of the latest user message.
pub fn received(latest_user_message: &str) -> String {
    format!("Request received: \"{}\"", preview(latest_user_message))
}

/// Sent before each Writer call.
pub fn drafting(round: &RoundState) -> String {
    format!("Attempt {round}: drafting the recipe...")
}

/// Sent before each Reviewer call.
pub fn reviewing(round: &RoundState) -> String {
    format!("Attempt {round}: reviewing the draft against the rubric...")
}

/// Sent after a rejection that leaves another round.
pub fn feedback(feedback: &str) -> String {
    if feedback.trim().is_empty() {
        "Reviewer requested revisions. Revising the draft...".to_string()
    } else {
        format!("Reviewer feedback: {feedback}. Revising the draft...")
    }
}

/// Sent once the Reviewer passes a draft.
pub fn approved(score: Score) -> String {
    format!("Recipe approved by the reviewer (score {score}).")
}
