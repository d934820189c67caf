use crate::anchor::MatchStage;
use crate::config::Persona;
use crate::document::Location;
use crate::parser::NormalizedFeedback;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::time::Duration;
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RunStatus {
    Queued,
    Running,
    Done,
    Error,
}

impl RunStatus {
    /// `queued -> running -> done | error`, and back to `queued` only from a
    /// terminal state on explicit retry
    pub fn can_transition_to(self, next: RunStatus) -> bool {
        use RunStatus::*;
        matches!(
            (self, next),
            (Queued, Running) | (Running, Done) | (Running, Error) | (Done, Queued) | (Error, Queued)
        )
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Queued => write!(f, "queued"),
            RunStatus::Running => write!(f, "running"),
            RunStatus::Done => write!(f, "done"),
            RunStatus::Error => write!(f, "error"),
        }
    }
}

/// A comment anchored in the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchedComment {
    pub quote: String,
    pub comment: String,
    pub location: Location,
    pub stage: MatchStage,
}

/// A comment whose quote could not be found; kept for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnmatchedComment {
    pub quote: String,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub persona_id: String,
    pub persona_name: String,
    status: RunStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<NormalizedFeedback>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched: Option<Vec<MatchedComment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unmatched: Option<Vec<UnmatchedComment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    /// Model output that failed to parse
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
    pub duration_ms: u64,
}

impl RunResult {
    pub fn queued(persona: &Persona) -> Self {
        Self {
            persona_id: persona.id.clone(),
            persona_name: persona.name.clone(),
            status: RunStatus::Queued,
            feedback: None,
            matched: None,
            unmatched: None,
            error_message: None,
            raw_response: None,
            duration_ms: 0,
        }
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    /// Move to `next` if the state machine allows it
    pub fn transition(&mut self, next: RunStatus) -> bool {
        if !self.status.can_transition_to(next) {
            warn!(
                "Refusing status change {} -> {} for {}",
                self.status, next, self.persona_id
            );
            return false;
        }
        self.status = next;
        true
    }

    /// Back to `queued`, dropping the previous outcome
    pub fn reset(&mut self) -> bool {
        if !self.transition(RunStatus::Queued) {
            return false;
        }
        self.feedback = None;
        self.matched = None;
        self.unmatched = None;
        self.error_message = None;
        self.raw_response = None;
        self.duration_ms = 0;
        true
    }

    pub fn complete(
        &mut self,
        feedback: NormalizedFeedback,
        matched: Vec<MatchedComment>,
        unmatched: Vec<UnmatchedComment>,
        duration: Duration,
    ) -> bool {
        if !self.transition(RunStatus::Done) {
            return false;
        }
        self.feedback = Some(feedback);
        self.matched = Some(matched);
        self.unmatched = Some(unmatched);
        self.duration_ms = duration.as_millis() as u64;
        true
    }

    pub fn fail(&mut self, message: String, raw_response: Option<String>, duration: Duration) -> bool {
        if !self.transition(RunStatus::Error) {
            return false;
        }
        self.error_message = Some(message);
        self.raw_response = raw_response;
        self.duration_ms = duration.as_millis() as u64;
        true
    }
}

/// Results of one review pass, one per enabled persona, in persona order.
/// Results are keyed by persona id so a rerun replaces rather than appends.
#[derive(Debug, Clone, Serialize)]
pub struct RunSession {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    results: Vec<RunResult>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    total_enabled: usize,
}

impl RunSession {
    pub fn new(total_enabled: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            results: Vec::new(),
            index: HashMap::new(),
            total_enabled,
        }
    }

    /// Insert or replace the result for `result.persona_id`
    pub fn upsert(&mut self, result: RunResult) {
        match self.index.get(&result.persona_id) {
            Some(&idx) => self.results[idx] = result,
            None => {
                self.index
                    .insert(result.persona_id.clone(), self.results.len());
                self.results.push(result);
            }
        }
    }

    pub fn get(&self, persona_id: &str) -> Option<&RunResult> {
        self.index.get(persona_id).map(|&idx| &self.results[idx])
    }

    pub fn get_mut(&mut self, persona_id: &str) -> Option<&mut RunResult> {
        match self.index.get(persona_id) {
            Some(&idx) => self.results.get_mut(idx),
            None => None,
        }
    }

    pub fn results(&self) -> &[RunResult] {
        &self.results
    }

    pub fn total_enabled(&self) -> usize {
        self.total_enabled
    }

    pub(crate) fn set_total_enabled(&mut self, total: usize) {
        self.total_enabled = total;
    }

    /// Drop results whose persona id fails `keep`, preserving order
    pub(crate) fn retain_personas<F>(&mut self, keep: F)
    where
        F: Fn(&str) -> bool,
    {
        self.results.retain(|r| keep(&r.persona_id));
        self.index = self
            .results
            .iter()
            .enumerate()
            .map(|(idx, r)| (r.persona_id.clone(), idx))
            .collect();
    }

    pub fn count(&self, status: RunStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// Fraction of enabled personas that finished successfully
    pub fn progress(&self) -> f64 {
        if self.total_enabled == 0 {
            return 0.0;
        }
        (self.count(RunStatus::Done) as f64 / self.total_enabled as f64).min(1.0)
    }
}
