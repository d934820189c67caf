//! Locates model-quoted spans inside the document.
//!
//! Models rarely quote verbatim. The matcher walks a fixed cascade from the
//! most specific needle (the whole quote) down to short word seeds, and takes
//! the first hit the document surface reports.

mod normalize;

pub use normalize::normalize_quote;

use crate::document::{DocumentSurface, Location};
use crate::error::DocumentError;
use serde::Serialize;
use std::fmt;
use tracing::debug;

/// Seed window sizes in words, most specific first
pub const SEED_WINDOWS: [usize; 3] = [8, 6, 5];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedPosition {
    First,
    Middle,
    Last,
}

const SEED_POSITIONS: [SeedPosition; 3] =
    [SeedPosition::First, SeedPosition::Middle, SeedPosition::Last];

/// Which cascade step produced the anchor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "stage")]
pub enum MatchStage {
    Exact,
    Unquoted,
    Seed { words: usize, position: SeedPosition },
}

impl fmt::Display for MatchStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchStage::Exact => write!(f, "exact"),
            MatchStage::Unquoted => write!(f, "unquoted"),
            MatchStage::Seed { words, position } => {
                write!(f, "seed {} words ({:?})", words, position)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnchorMatch {
    pub location: Location,
    pub stage: MatchStage,
}

/// Find where `quote` sits in the document. `Ok(None)` means every cascade
/// step came back empty.
pub async fn find_anchor<S>(surface: &S, quote: &str) -> Result<Option<AnchorMatch>, DocumentError>
where
    S: DocumentSurface + ?Sized,
{
    let normalized = normalize_quote(quote);
    if normalized.is_empty() {
        return Ok(None);
    }

    for (stage, needle) in cascade(&normalized) {
        if let Some(location) = surface.search(&needle).await?.into_iter().next() {
            debug!("Anchored quote via {} stage", stage);
            return Ok(Some(AnchorMatch { location, stage }));
        }
    }

    debug!("No anchor for quote: {}", normalized);
    Ok(None)
}

/// Needles in the order they are tried
fn cascade(normalized: &str) -> Vec<(MatchStage, String)> {
    let mut steps = vec![(MatchStage::Exact, normalized.to_string())];

    let quote_marks: &[char] = &['"', '\''];
    let mut base = normalized;
    if normalized.starts_with(quote_marks) || normalized.ends_with(quote_marks) {
        let stripped = normalized.trim_matches(quote_marks).trim();
        if !stripped.is_empty() {
            steps.push((MatchStage::Unquoted, stripped.to_string()));
            base = stripped;
        }
    }

    let words: Vec<&str> = base.split_whitespace().collect();
    for &window in &SEED_WINDOWS {
        if words.len() <= window {
            continue;
        }
        for &position in &SEED_POSITIONS {
            let start = match position {
                SeedPosition::First => 0,
                SeedPosition::Middle => (words.len() - window) / 2,
                SeedPosition::Last => words.len() - window,
            };
            steps.push((
                MatchStage::Seed {
                    words: window,
                    position,
                },
                words[start..start + window].join(" "),
            ));
        }
    }

    steps
}
