use crate::error::ParserError;
use regex::Regex;
use serde_json::Value;
use tracing::debug;

/// Recover a JSON value from free-form model output.
///
/// Candidates are tried in order: the whole trimmed string, ```json fences,
/// any fence, then the span from the first `{` to the last `}`. Each
/// candidate gets up to two repaired retries before moving on.
pub fn parse_response(raw: &str) -> Result<Value, ParserError> {
    for (stage, candidate) in candidates(raw) {
        if let Some(value) = parse_with_repair(&candidate) {
            debug!("Parsed model response via {}", stage);
            return Ok(value);
        }
    }

    Err(ParserError::Unparseable {
        raw: raw.to_string(),
    })
}

fn candidates(raw: &str) -> Vec<(&'static str, String)> {
    let trimmed = raw.trim();
    let mut out = vec![("direct", trimmed.to_string())];

    if let Ok(re) = Regex::new(r"(?i)```json[ \t]*\r?\n?([\s\S]*?)```") {
        for cap in re.captures_iter(trimmed) {
            if let Some(body) = cap.get(1) {
                out.push(("json fence", body.as_str().trim().to_string()));
            }
        }
    }

    if let Ok(re) = Regex::new(r"```[A-Za-z0-9_+-]*[ \t]*\r?\n?([\s\S]*?)```") {
        for cap in re.captures_iter(trimmed) {
            if let Some(body) = cap.get(1) {
                out.push(("fence", body.as_str().trim().to_string()));
            }
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}')) {
        if start < end {
            out.push(("brace span", trimmed[start..=end].to_string()));
        }
    }

    out
}

fn parse_with_repair(candidate: &str) -> Option<Value> {
    if candidate.is_empty() {
        return None;
    }

    let err = match serde_json::from_str::<Value>(candidate) {
        Ok(value) => return Some(value),
        Err(e) => e,
    };

    // Commas alone first: curly quotes inside string values are valid JSON
    let without_commas = strip_trailing_commas(candidate);
    let straightened = strip_trailing_commas(&straighten_quotes(candidate));

    let mut tried = vec![candidate.to_string()];
    for repaired in [without_commas, straightened] {
        if tried.contains(&repaired) {
            continue;
        }
        debug!("JSON parse failed ({}), retrying after repair", err);
        if let Ok(value) = serde_json::from_str::<Value>(&repaired) {
            return Some(value);
        }
        tried.push(repaired);
    }
    None
}

/// Drop trailing commas before `}` or `]`
fn strip_trailing_commas(s: &str) -> String {
    match Regex::new(r",(\s*[}\]])") {
        Ok(re) => re.replace_all(s, "$1").into_owned(),
        Err(_) => s.to_string(),
    }
}

fn straighten_quotes(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' | '\u{201E}' | '\u{201F}' => '"',
            '\u{2018}' | '\u{2019}' | '\u{201A}' | '\u{201B}' => '\'',
            other => other,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_direct_json() {
        assert_eq!(parse_response(r#"{"a":1}"#).unwrap(), json!({"a": 1}));
    }

    #[test]
    fn test_parse_json_fence() {
        assert_eq!(
            parse_response("```json\n{\"a\":1}\n```").unwrap(),
            json!({"a": 1})
        );
    }

    #[test]
    fn test_parse_untagged_fence_with_prose() {
        let raw = "Here is my review:\n\n```\n{\"scores\": {\"tone\": 7}}\n```\nThanks!";
        assert_eq!(
            parse_response(raw).unwrap(),
            json!({"scores": {"tone": 7}})
        );
    }

    #[test]
    fn test_parse_brace_span_in_noise() {
        assert_eq!(
            parse_response(r#"noise {"a":1} trailing"#).unwrap(),
            json!({"a": 1})
        );
    }

    #[test]
    fn test_parse_nested_braces_greedy() {
        let raw = r#"Result: {"scores": {"clarity": 1}, "comments": []} -- done"#;
        assert_eq!(
            parse_response(raw).unwrap(),
            json!({"scores": {"clarity": 1}, "comments": []})
        );
    }

    #[test]
    fn test_parse_repairs_trailing_commas() {
        let raw = r#"{"comments": [{"quote": "abc", "comment": "x",},], "global_feedback": "ok",}"#;
        let value = parse_response(raw).unwrap();
        assert_eq!(value["global_feedback"], "ok");
        assert_eq!(value["comments"][0]["quote"], "abc");
    }

    #[test]
    fn test_parse_repairs_curly_quotes() {
        let raw = "{\u{201C}global_feedback\u{201D}: \u{201C}fine\u{201D}}";
        assert_eq!(
            parse_response(raw).unwrap(),
            json!({"global_feedback": "fine"})
        );
    }

    #[test]
    fn test_parse_keeps_curly_quotes_inside_strings() {
        let raw = "{\"global_feedback\": \"the \u{201C}best\u{201D} plan\",}";
        assert_eq!(
            parse_response(raw).unwrap(),
            json!({"global_feedback": "the \u{201C}best\u{201D} plan"})
        );
    }

    #[test]
    fn test_parse_failure_keeps_raw() {
        match parse_response("not json at all") {
            Err(ParserError::Unparseable { raw }) => assert_eq!(raw, "not json at all"),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_unbalanced_braces_fails() {
        assert!(parse_response("} nothing here {").is_err());
        assert!(parse_response("   ").is_err());
    }
}
