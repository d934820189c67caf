use super::{DocumentSurface, Location};
use crate::error::DocumentError;
use async_trait::async_trait;
use serde::Serialize;
use std::path::Path;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InsertedComment {
    pub start: usize,
    pub end: usize,
    /// Document text covered by the comment (empty for document-start notes)
    pub excerpt: String,
    pub message: String,
}

/// Plain-text document held in memory.
///
/// Search runs over a folded copy of the text: letters and digits lowercased,
/// every run of anything else collapsed into one space. Each folded char
/// remembers the byte range it came from so hits map back onto the original.
pub struct TextDocument {
    text: String,
    folded: Vec<char>,
    spans: Vec<(usize, usize)>,
    comments: Mutex<Vec<InsertedComment>>,
}

impl TextDocument {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let (folded, spans) = fold(&text);
        Self {
            text,
            folded,
            spans,
            comments: Mutex::new(Vec::new()),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, DocumentError> {
        let text = std::fs::read_to_string(path).map_err(|e| DocumentError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;
        Ok(Self::new(text))
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Comments inserted so far, in insertion order
    pub fn comments(&self) -> Vec<InsertedComment> {
        self.comments
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn find_all(&self, needle: &str) -> Vec<Location> {
        let (needle, _) = fold(needle);
        let n = needle.len();
        let mut hits = Vec::new();
        if n == 0 || n > self.folded.len() {
            return hits;
        }

        let mut i = 0;
        while i + n <= self.folded.len() {
            if self.folded[i..i + n] == needle[..] {
                hits.push(Location::new(self.spans[i].0, self.spans[i + n - 1].1));
                i += n;
            } else {
                i += 1;
            }
        }
        hits
    }
}

fn fold(text: &str) -> (Vec<char>, Vec<(usize, usize)>) {
    let mut folded = Vec::with_capacity(text.len());
    let mut spans = Vec::with_capacity(text.len());
    let mut pending_separator: Option<(usize, usize)> = None;

    for (idx, c) in text.char_indices() {
        let span = (idx, idx + c.len_utf8());
        if c.is_alphanumeric() {
            if let Some(sep) = pending_separator.take() {
                if !folded.is_empty() {
                    folded.push(' ');
                    spans.push(sep);
                }
            }
            for lower in c.to_lowercase() {
                folded.push(lower);
                spans.push(span);
            }
        } else if pending_separator.is_none() {
            pending_separator = Some(span);
        }
    }

    (folded, spans)
}

#[async_trait]
impl DocumentSurface for TextDocument {
    async fn full_text(&self) -> Result<String, DocumentError> {
        Ok(self.text.clone())
    }

    async fn search(&self, needle: &str) -> Result<Vec<Location>, DocumentError> {
        Ok(self.find_all(needle))
    }

    async fn insert_comment(
        &self,
        location: Option<Location>,
        message: &str,
    ) -> Result<(), DocumentError> {
        let (start, end) = location.map_or((0, 0), |l| (l.start(), l.end()));
        let in_bounds = start <= end
            && end <= self.text.len()
            && self.text.is_char_boundary(start)
            && self.text.is_char_boundary(end);
        if !in_bounds {
            return Err(DocumentError::OutOfBounds { start, end });
        }

        self.comments
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(InsertedComment {
                start,
                end,
                excerpt: self.text[start..end].to_string(),
                message: message.to_string(),
            });
        Ok(())
    }
}
