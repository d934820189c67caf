mod text;

pub use text::{InsertedComment, TextDocument};

use crate::error::DocumentError;
use async_trait::async_trait;
use serde::Serialize;

/// Byte range of a search hit inside a surface's text.
///
/// Only a [`DocumentSurface`] creates these; callers receive them through
/// the quote matcher and hand them back for comment insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Location {
    start: usize,
    end: usize,
}

impl Location {
    pub(crate) fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }
}

/// The document host: read text, find text, attach comments.
#[async_trait]
pub trait DocumentSurface: Send + Sync {
    async fn full_text(&self) -> Result<String, DocumentError>;

    /// Case, whitespace and punctuation insensitive search, hits in document
    /// order
    async fn search(&self, needle: &str) -> Result<Vec<Location>, DocumentError>;

    /// Attach a comment at `location`, or at the document start when `None`
    async fn insert_comment(
        &self,
        location: Option<Location>,
        message: &str,
    ) -> Result<(), DocumentError>;
}
