use crate::anchor::find_anchor;
use crate::config::Persona;
use crate::document::DocumentSurface;
use crate::error::PersonaError;
use crate::parser::{parse_feedback, NormalizedFeedback};
use crate::provider::Provider;
use tracing::{debug, warn};

use super::retry::call_with_retry;
use super::{MatchedComment, ReviewOptions, UnmatchedComment};

/// Build the user prompt: persona brief, strict output shape, then the
/// (bounded) document text
pub fn build_review_prompt(persona: &Persona, document_text: &str, max_chars: usize) -> String {
    let document: String = document_text.chars().take(max_chars).collect();

    format!(
        "You are the following persona reviewing a document.\n\n\
         Persona Name: {name}\n\
         System Persona: {system}\n\n\
         INSTRUCTIONS FOR PERSONA:\n\
         {instruction}\n\n\
         Return a STRICT JSON object with the following shape (and nothing else):\n\
         {{\n\
         \x20 \"scores\": {{ \"clarity\": 0-100, \"tone\": 0-100, \"alignment\": 0-100 }},\n\
         \x20 \"global_feedback\": \"short paragraph of overall feedback\",\n\
         \x20 \"comments\": [\n\
         \x20    {{ \"quote\": \"exact span from the doc\", \"comment\": \"your brief comment\" }}\n\
         \x20 ]\n\
         }}\n\n\
         Document text:\n\
         --------------------\n\
         {document}",
        name = persona.name,
        system = persona.system_prompt,
        instruction = persona.instruction_prompt,
        document = document,
    )
}

/// What one persona produced once its response was parsed and anchored
#[derive(Debug)]
pub struct PersonaReview {
    pub feedback: NormalizedFeedback,
    pub matched: Vec<MatchedComment>,
    pub unmatched: Vec<UnmatchedComment>,
}

pub(super) struct ReviewContext<'a> {
    pub provider: &'a dyn Provider,
    pub surface: &'a dyn DocumentSurface,
    pub options: &'a ReviewOptions,
}

/// Provider call, parse, normalize, then anchor and insert each comment.
/// Only provider and parse failures are errors; anything that goes wrong
/// while anchoring sends that comment to the unmatched list.
pub(super) async fn review_persona(
    ctx: &ReviewContext<'_>,
    persona: &Persona,
    document_text: &str,
) -> Result<PersonaReview, PersonaError> {
    let prompt = build_review_prompt(persona, document_text, ctx.options.max_document_chars);
    let label = format!("{} via {}", persona.id, ctx.provider.name());

    let provider = ctx.provider;
    let system = persona.system_prompt.as_str();
    let user = prompt.as_str();
    let timeout = ctx.options.timeout;
    let raw = call_with_retry(&ctx.options.retry, &persona.id, provider.name(), move || {
        provider.complete(system, user, timeout)
    })
    .await?;

    debug!("{} returned {} chars", label, raw.chars().count());
    let feedback = parse_feedback(&raw)?;

    let author = format!("{} (AI)", persona.name);
    let mut matched = Vec::new();
    let mut unmatched = Vec::new();

    for item in &feedback.comments {
        let anchor = match find_anchor(ctx.surface, &item.quote).await {
            Ok(anchor) => anchor,
            Err(e) => {
                warn!("{}: search failed for quote {:?}: {}", persona.id, item.quote, e);
                None
            }
        };

        let Some(anchor) = anchor else {
            unmatched.push(UnmatchedComment {
                quote: item.quote.clone(),
                comment: item.comment.clone(),
            });
            continue;
        };

        let message = format!("{}: {}", author, item.comment);
        match ctx.surface.insert_comment(Some(anchor.location), &message).await {
            Ok(()) => matched.push(MatchedComment {
                quote: item.quote.clone(),
                comment: item.comment.clone(),
                location: anchor.location,
                stage: anchor.stage,
            }),
            Err(e) => {
                warn!("{}: comment insertion failed: {}", persona.id, e);
                unmatched.push(UnmatchedComment {
                    quote: item.quote.clone(),
                    comment: item.comment.clone(),
                });
            }
        }
    }

    if ctx.options.insert_summary && !feedback.global_feedback.is_empty() {
        let message = format!("{} summary: {}", author, feedback.global_feedback);
        if let Err(e) = ctx.surface.insert_comment(None, &message).await {
            warn!("{}: summary insertion failed: {}", persona.id, e);
        }
    }

    Ok(PersonaReview {
        feedback,
        matched,
        unmatched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persona() -> Persona {
        Persona {
            id: "legal".to_string(),
            name: "Legal".to_string(),
            enabled: true,
            system_prompt: "Risk-aware.".to_string(),
            instruction_prompt: "Flag ambiguous claims.".to_string(),
            color: None,
        }
    }

    #[test]
    fn test_prompt_contains_persona_and_shape() {
        let prompt = build_review_prompt(&persona(), "Body text.", 100);
        assert!(prompt.contains("Persona Name: Legal"));
        assert!(prompt.contains("System Persona: Risk-aware."));
        assert!(prompt.contains("Flag ambiguous claims."));
        assert!(prompt.contains("\"global_feedback\""));
        assert!(prompt.ends_with("--------------------\nBody text."));
    }

    #[test]
    fn test_prompt_truncates_document() {
        let prompt = build_review_prompt(&persona(), "abcdefghij", 4);
        assert!(prompt.ends_with("\nabcd"));
    }
}
