use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Upper bound on comment entries taken from one model response
pub const MAX_COMMENTS: usize = 12;

/// Quotes shorter than this (after trimming) cannot be anchored reliably
pub const MIN_QUOTE_CHARS: usize = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scores {
    pub clarity: u8,
    pub tone: u8,
    pub alignment: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackComment {
    pub quote: String,
    pub comment: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedFeedback {
    pub scores: Scores,
    pub global_feedback: String,
    pub comments: Vec<FeedbackComment>,
}

/// Coerce an untrusted candidate value into a well-formed feedback record.
/// Missing or invalid fields fall back to zero scores, empty text and no
/// comments; this never fails.
pub fn normalize_feedback(candidate: &Value) -> NormalizedFeedback {
    let scores = candidate.get("scores").unwrap_or(&Value::Null);

    let global_feedback = candidate
        .get("global_feedback")
        .or_else(|| candidate.get("globalFeedback"))
        .map(coerce_string)
        .unwrap_or_default()
        .trim()
        .to_string();

    let comments = candidate
        .get("comments")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .take(MAX_COMMENTS)
                .filter_map(normalize_comment)
                .collect()
        })
        .unwrap_or_default();

    NormalizedFeedback {
        scores: scale_scores(
            read_number(scores.get("clarity")),
            read_number(scores.get("tone")),
            read_number(scores.get("alignment")),
        ),
        global_feedback,
        comments,
    }
}

fn normalize_comment(item: &Value) -> Option<FeedbackComment> {
    if !item.is_object() {
        return None;
    }

    let quote = item.get("quote").map(coerce_string).unwrap_or_default();
    let quote = quote.trim();
    if quote.chars().count() < MIN_QUOTE_CHARS {
        return None;
    }

    Some(FeedbackComment {
        quote: quote.to_string(),
        comment: item.get("comment").map(coerce_string).unwrap_or_default(),
    })
}

/// Models answer on 0-1, 1-10 or 0-100 scales. The largest of the three
/// values decides which one was used.
fn scale_scores(clarity: f64, tone: f64, alignment: f64) -> Scores {
    let max = clarity.max(tone).max(alignment);
    let factor = if max <= 1.0 {
        100.0
    } else if max <= 10.0 {
        10.0
    } else {
        1.0
    };

    let scale = |v: f64| (v * factor).round().clamp(0.0, 100.0) as u8;

    Scores {
        clarity: scale(clarity),
        tone: scale(tone),
        alignment: scale(alignment),
    }
}

fn read_number(value: Option<&Value>) -> f64 {
    let n = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|v| v.is_finite()).unwrap_or(0.0)
}

fn coerce_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn scores_of(clarity: Value, tone: Value, alignment: Value) -> Scores {
        normalize_feedback(&json!({
            "scores": {"clarity": clarity, "tone": tone, "alignment": alignment}
        }))
        .scores
    }

    #[test]
    fn test_scale_detection_is_convention_invariant() {
        let expected = Scores {
            clarity: 80,
            tone: 60,
            alignment: 90,
        };
        assert_eq!(scores_of(json!(0.8), json!(0.6), json!(0.9)), expected);
        assert_eq!(scores_of(json!(8), json!(6), json!(9)), expected);
        assert_eq!(scores_of(json!(80), json!(60), json!(90)), expected);
    }

    #[test]
    fn test_scores_clamped_and_rounded() {
        let scores = scores_of(json!(150), json!(-20), json!(55.5));
        assert_eq!(scores.clarity, 100);
        assert_eq!(scores.tone, 0);
        assert_eq!(scores.alignment, 56);
    }

    #[test]
    fn test_scores_accept_numeric_strings() {
        let scores = scores_of(json!("7"), json!("8.5"), json!("n/a"));
        assert_eq!(scores.clarity, 70);
        assert_eq!(scores.tone, 85);
        assert_eq!(scores.alignment, 0);
    }

    #[test]
    fn test_missing_everything_yields_defaults() {
        let feedback = normalize_feedback(&json!("just a string"));
        assert_eq!(feedback, NormalizedFeedback::default());

        let feedback = normalize_feedback(&json!({"scores": {"tone": 9}}));
        assert_eq!(feedback.scores.tone, 90);
        assert_eq!(feedback.scores.clarity, 0);
        assert!(feedback.comments.is_empty());
    }

    #[test]
    fn test_global_feedback_alias() {
        let feedback = normalize_feedback(&json!({"globalFeedback": "  Solid draft. "}));
        assert_eq!(feedback.global_feedback, "Solid draft.");
    }

    #[test]
    fn test_comments_sanitized() {
        let feedback = normalize_feedback(&json!({
            "comments": [
                {"quote": "  quick brown fox ", "comment": "nice imagery"},
                {"quote": "ab", "comment": "too short"},
                {"quote": "   ", "comment": "blank"},
                {"comment": "no quote"},
                "not an object",
                {"quote": 12345, "comment": null},
            ]
        }));

        assert_eq!(
            feedback.comments,
            vec![
                FeedbackComment {
                    quote: "quick brown fox".to_string(),
                    comment: "nice imagery".to_string(),
                },
                FeedbackComment {
                    quote: "12345".to_string(),
                    comment: String::new(),
                },
            ]
        );
    }

    #[test]
    fn test_comments_capped() {
        let items: Vec<Value> = (0..20)
            .map(|i| json!({"quote": format!("quote number {}", i), "comment": "c"}))
            .collect();
        let feedback = normalize_feedback(&json!({ "comments": items }));
        assert_eq!(feedback.comments.len(), MAX_COMMENTS);
        assert_eq!(feedback.comments[11].quote, "quote number 11");
    }
}
