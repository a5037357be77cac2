//! Role codecs: turn a role's raw completion text into its structured type.
//!
//! Models routinely wrap JSON in a fenced code block or add a sentence around
//! it. Decoding strips an optional fence first and, if the remainder still is
//! not JSON, retries on the outermost `{ ... }` slice.
//!
//! The Writer has no codec: its output is an opaque [`crate::Draft`].

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::{ChatError, CreativeBrief, ReviewVerdict, RubricCriterion, Score};

/// Removes a surrounding ```` ``` ```` fence (with optional language tag) and
/// surrounding whitespace. Text without a leading fence is only trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = match rest.find('\n') {
        Some(newline) => &rest[newline + 1..],
        None => rest,
    };
    let body = body.trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

fn decode_json<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    let body = strip_code_fence(raw);
    match serde_json::from_str(body) {
        Ok(value) => Ok(value),
        Err(err) => match (body.find('{'), body.rfind('}')) {
            (Some(start), Some(end)) if start < end => serde_json::from_str(&body[start..=end]),
            _ => Err(err),
        },
    }
}

// ---------------------------------------------------------------------------
// Director
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct BriefWire {
    writer_brief: String,
    rubric: Vec<RubricCriterion>,
    #[serde(default)]
    failure_conditions: Vec<String>,
}

/// Decodes the Director's output.
///
/// # Errors
///
/// Returns [`ChatError::MalformedBrief`] if the text is not the expected JSON
/// object or the brief invariants do not hold.
pub fn decode_brief(raw: &str) -> Result<CreativeBrief, ChatError> {
    let wire: BriefWire = decode_json(raw).map_err(|e| ChatError::MalformedBrief {
        detail: e.to_string(),
    })?;
    CreativeBrief::new(wire.writer_brief, wire.rubric, wire.failure_conditions)
}

// ---------------------------------------------------------------------------
// Reviewer
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct VerdictWire {
    passed: bool,
    score: f64,
    #[serde(default)]
    feedback: Option<String>,
}

/// Decodes the Reviewer's output.
///
/// # Errors
///
/// Returns [`ChatError::MalformedVerdict`] if `passed` is not a boolean,
/// `score` is not a number in `[0, 100]`, or the text is not JSON at all.
pub fn decode_verdict(raw: &str) -> Result<ReviewVerdict, ChatError> {
    let wire: VerdictWire = decode_json(raw).map_err(|e| ChatError::MalformedVerdict {
        detail: e.to_string(),
    })?;
    let score = Score::new(wire.score).ok_or_else(|| ChatError::MalformedVerdict {
        detail: format!("score {} is outside 0-100", wire.score),
    })?;
    Ok(ReviewVerdict {
        passed: wire.passed,
        score,
        feedback: wire.feedback.unwrap_or_default().trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const BRIEF: &str = r#"{
        "writerBrief": "Classic Bordeaux canelés with a caramelised crust.",
        "rubric": [
            {"criterion": "Ingredient table", "expectations": "Metric weights in usage order"},
            {"criterion": "Nutrition", "expectations": "All nine nutrients per serving"}
        ],
        "failureConditions": ["Imperial units"]
    }"#;

    #[test]
    fn test_strip_code_fence_variants() {
        assert_eq!(strip_code_fence("  {\"a\":1}  "), "{\"a\":1}");
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```\n"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```{\"a\":1}```"), "{\"a\":1}");
    }

    #[test]
    fn test_decode_brief_plain_and_fenced() {
        let plain = decode_brief(BRIEF).unwrap();
        assert_eq!(plain.rubric().len(), 2);
        assert_eq!(plain.failure_conditions(), ["Imperial units".to_string()]);

        let fenced = decode_brief(&format!("```json\n{BRIEF}\n```")).unwrap();
        assert_eq!(fenced, plain);
    }

    #[test]
    fn test_decode_brief_tolerates_surrounding_prose() {
        let brief = decode_brief(&format!("Here is the brief:\n{BRIEF}\nGood luck!")).unwrap();
        assert_eq!(
            brief.writer_brief(),
            "Classic Bordeaux canelés with a caramelised crust."
        );
    }

    #[test]
    fn test_decode_brief_failures() {
        assert!(matches!(
            decode_brief("not json"),
            Err(ChatError::MalformedBrief { .. })
        ));
        assert!(matches!(
            decode_brief(r#"{"writerBrief": "", "rubric": [{"criterion": "a", "expectations": "b"}]}"#),
            Err(ChatError::MalformedBrief { .. })
        ));
        assert!(matches!(
            decode_brief(r#"{"writerBrief": "write", "rubric": []}"#),
            Err(ChatError::MalformedBrief { .. })
        ));
        assert!(matches!(
            decode_brief(r#"{"rubric": [{"criterion": "a", "expectations": "b"}]}"#),
            Err(ChatError::MalformedBrief { .. })
        ));
    }

    #[test]
    fn test_decode_verdict() {
        let verdict =
            decode_verdict(r#"{"passed": false, "score": 40, "feedback": "Nutrition table incomplete"}"#)
                .unwrap();
        assert!(!verdict.passed);
        assert_eq!(verdict.score.as_f64(), 40.0);
        assert_eq!(verdict.feedback, "Nutrition table incomplete");

        let approved = decode_verdict("```json\n{\"passed\": true, \"score\": 88}\n```").unwrap();
        assert!(approved.passed);
        assert_eq!(approved.feedback, "");
    }

    #[test]
    fn test_decode_verdict_rejects_wrong_types() {
        for raw in [
            r#"{"passed": "true", "score": 90}"#,
            r#"{"passed": true, "score": "ninety"}"#,
            r#"{"passed": true}"#,
            r#"{"passed": true, "score": 140}"#,
            "I think it passes.",
        ] {
            assert!(
                matches!(decode_verdict(raw), Err(ChatError::MalformedVerdict { .. })),
                "expected MalformedVerdict for {raw}"
            );
        }
    }
}
