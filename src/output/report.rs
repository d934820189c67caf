use crate::document::InsertedComment;
use crate::error::OutputError;
use crate::runner::{RunResult, RunSession, RunStatus};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Serialize)]
struct ReviewJson<'a> {
    document: &'a str,
    progress: f64,
    session: &'a RunSession,
    inserted_comments: &'a [InsertedComment],
}

/// Write `<stem>.md` and `<stem>.review.json` into `report_dir`, returning
/// the markdown path
pub fn write_session_report(
    report_dir: &Path,
    document_name: &str,
    session: &RunSession,
    inserted: &[InsertedComment],
) -> Result<PathBuf, OutputError> {
    fs::create_dir_all(report_dir).map_err(OutputError::CreateDir)?;

    let content = render_markdown(document_name, session);
    let report_path = report_dir.join(format!("{}.md", document_name));
    fs::write(&report_path, &content).map_err(OutputError::WriteReport)?;

    let json = serde_json::to_string_pretty(&ReviewJson {
        document: document_name,
        progress: session.progress(),
        session,
        inserted_comments: inserted,
    })?;
    let json_path = report_dir.join(format!("{}.review.json", document_name));
    fs::write(&json_path, json).map_err(OutputError::WriteReport)?;

    Ok(report_path)
}

fn render_markdown(document_name: &str, session: &RunSession) -> String {
    let mut content = String::new();

    content.push_str(&format!("# Persona review: {}\n\n", document_name));
    content.push_str(&format!(
        "Session `{}` started {}\n\n",
        session.id,
        session.started_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));

    content.push_str("| Persona | Status | Clarity | Tone | Alignment | Anchored | Unanchored |\n");
    content.push_str("|---------|--------|---------|------|-----------|----------|------------|\n");
    for result in session.results() {
        let (clarity, tone, alignment) = result
            .feedback
            .as_ref()
            .map(|f| {
                (
                    f.scores.clarity.to_string(),
                    f.scores.tone.to_string(),
                    f.scores.alignment.to_string(),
                )
            })
            .unwrap_or_else(|| ("-".to_string(), "-".to_string(), "-".to_string()));
        content.push_str(&format!(
            "| {} | {} | {} | {} | {} | {} | {} |\n",
            result.persona_name,
            format_status(result),
            clarity,
            tone,
            alignment,
            result.matched.as_ref().map_or(0, Vec::len),
            result.unmatched.as_ref().map_or(0, Vec::len),
        ));
    }
    content.push_str(&format!(
        "\nProgress: {}/{} personas done\n\n---\n\n",
        session.count(RunStatus::Done),
        session.total_enabled()
    ));

    for result in session.results() {
        content.push_str(&format!("## {}\n\n", result.persona_name));

        if let Some(error) = &result.error_message {
            content.push_str(&format!("**Error:** {}\n\n", error));
            if let Some(raw) = &result.raw_response {
                content.push_str("**Raw response:**\n");
                content.push_str(&format!("```\n{}\n```\n\n", raw));
            }
        }

        if let Some(feedback) = &result.feedback {
            if feedback.global_feedback.is_empty() {
                content.push_str("*No global feedback*\n\n");
            } else {
                content.push_str(&format!("{}\n\n", feedback.global_feedback));
            }
        }

        if let Some(matched) = result.matched.as_ref().filter(|m| !m.is_empty()) {
            content.push_str("### Anchored comments\n\n");
            for item in matched {
                content.push_str(&format!(
                    "- > {}\n  \n  {} *(bytes {}..{}, {})*\n",
                    item.quote,
                    item.comment,
                    item.location.start(),
                    item.location.end(),
                    item.stage
                ));
            }
            content.push('\n');
        }

        if let Some(unmatched) = result.unmatched.as_ref().filter(|u| !u.is_empty()) {
            content.push_str("### Comments without a location\n\n");
            for item in unmatched {
                content.push_str(&format!("- > {}\n  \n  {}\n", item.quote, item.comment));
            }
            content.push('\n');
        }

        content.push_str("---\n\n");
    }

    content
}

fn format_status(result: &RunResult) -> String {
    match result.status() {
        RunStatus::Queued => "⏳ Queued".to_string(),
        RunStatus::Running => "▶️ Running".to_string(),
        RunStatus::Done => "✅ Done".to_string(),
        RunStatus::Error => "❌ Error".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Persona;
    use crate::parser::{FeedbackComment, NormalizedFeedback, Scores};
    use crate::runner::UnmatchedComment;
    use std::time::Duration;

    fn session() -> RunSession {
        let persona = |id: &str, name: &str| Persona {
            id: id.to_string(),
            name: name.to_string(),
            enabled: true,
            system_prompt: String::new(),
            instruction_prompt: String::new(),
            color: None,
        };

        let mut session = RunSession::new(2);

        let mut done = RunResult::queued(&persona("hr", "HR"));
        done.transition(RunStatus::Running);
        done.complete(
            NormalizedFeedback {
                scores: Scores {
                    clarity: 80,
                    tone: 70,
                    alignment: 90,
                },
                global_feedback: "Warm and clear.".to_string(),
                comments: vec![FeedbackComment {
                    quote: "team offsite".to_string(),
                    comment: "Say who is invited.".to_string(),
                }],
            },
            vec![],
            vec![UnmatchedComment {
                quote: "team offsite".to_string(),
                comment: "Say who is invited.".to_string(),
            }],
            Duration::from_millis(1200),
        );
        session.upsert(done);

        let mut failed = RunResult::queued(&persona("legal", "Legal"));
        failed.transition(RunStatus::Running);
        failed.fail(
            "Parser error: not JSON".to_string(),
            Some("no thanks".to_string()),
            Duration::ZERO,
        );
        session.upsert(failed);

        session
    }

    #[test]
    fn test_render_markdown() {
        let md = render_markdown("memo", &session());
        assert!(md.starts_with("# Persona review: memo"));
        assert!(md.contains("| HR | ✅ Done | 80 | 70 | 90 | 0 | 1 |"));
        assert!(md.contains("| Legal | ❌ Error | - | - | - | 0 | 0 |"));
        assert!(md.contains("Progress: 1/2 personas done"));
        assert!(md.contains("### Comments without a location"));
        assert!(md.contains("**Raw response:**\n```\nno thanks\n```"));
    }

    #[test]
    fn test_write_session_report() {
        let dir = tempfile::tempdir().unwrap();
        let report_dir = dir.path().join("2024-01-01");
        let inserted = vec![InsertedComment {
            start: 4,
            end: 9,
            excerpt: "quick".to_string(),
            message: "HR (AI): ok".to_string(),
        }];

        let path = write_session_report(&report_dir, "memo", &session(), &inserted).unwrap();
        assert_eq!(path, report_dir.join("memo.md"));

        let json: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(report_dir.join("memo.review.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(json["document"], "memo");
        assert_eq!(json["progress"], 0.5);
        assert_eq!(json["session"]["results"][1]["status"], "error");
        assert_eq!(json["inserted_comments"][0]["excerpt"], "quick");
    }
}
