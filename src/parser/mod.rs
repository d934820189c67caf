mod feedback;
mod json;

pub use feedback::{normalize_feedback, NormalizedFeedback};
#[cfg(test)]
pub use feedback::{FeedbackComment, Scores};
pub use json::parse_response;

use crate::error::ParserError;

/// Parse a raw model response and normalize it into feedback
pub fn parse_feedback(raw: &str) -> Result<NormalizedFeedback, ParserError> {
    let candidate = parse_response(raw)?;
    Ok(normalize_feedback(&candidate))
}
