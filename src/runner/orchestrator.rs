use crate::config::{Config, Persona, RetryConfig};
use crate::document::DocumentSurface;
use crate::error::RunnerError;
use crate::provider::Provider;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{info, warn};

use super::executor::{review_persona, ReviewContext};
use super::{RunObserver, RunResult, RunSession, RunStatus};

#[derive(Debug, Clone)]
pub struct ReviewOptions {
    /// Per provider call
    pub timeout: Duration,
    pub retry: RetryConfig,
    pub max_document_chars: usize,
    pub insert_summary: bool,
}

impl ReviewOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_sec),
            retry: config.retry.clone(),
            max_document_chars: config.max_document_chars,
            insert_summary: config.insert_summary,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Fresh session over every enabled persona
    All,
    /// Reuse the session; rerun only personas that errored or never ran
    RetryFailed,
}

/// Clears the in-flight flag however `run` exits
struct RunGuard<'a>(&'a AtomicBool);

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

pub struct Orchestrator {
    provider: Arc<dyn Provider>,
    surface: Arc<dyn DocumentSurface>,
    options: ReviewOptions,
    running: AtomicBool,
    session: Mutex<Option<RunSession>>,
}

impl Orchestrator {
    pub fn new(
        provider: Arc<dyn Provider>,
        surface: Arc<dyn DocumentSurface>,
        options: ReviewOptions,
    ) -> Self {
        Self {
            provider,
            surface,
            options,
            running: AtomicBool::new(false),
            session: Mutex::new(None),
        }
    }

    #[allow(dead_code)]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Snapshot of the current session, if any run has started
    #[allow(dead_code)]
    pub async fn session(&self) -> Option<RunSession> {
        self.session.lock().await.clone()
    }

    fn acquire(&self) -> Result<RunGuard<'_>, RunnerError> {
        self.running
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| RunnerError::AlreadyRunning)?;
        Ok(RunGuard(&self.running))
    }

    /// Review `document_text` with each enabled persona, one at a time.
    ///
    /// Per-persona failures end up in that persona's result; only the
    /// preconditions (something enabled, non-empty text, no run in flight)
    /// fail the call, and they do so before anything is touched.
    pub async fn run(
        &self,
        personas: &[Persona],
        document_text: &str,
        mode: RunMode,
        observer: &dyn RunObserver,
    ) -> Result<RunSession, RunnerError> {
        let guard = self.acquire()?;

        let enabled: Vec<&Persona> = personas.iter().filter(|p| p.enabled).collect();
        if enabled.is_empty() {
            return Err(RunnerError::NoPersonasEnabled);
        }
        if document_text.trim().is_empty() {
            return Err(RunnerError::EmptyDocument);
        }

        let mut slot = self.session.lock().await;
        if mode == RunMode::All {
            *slot = None;
        }
        let session = slot.get_or_insert_with(|| RunSession::new(enabled.len()));
        session.set_total_enabled(enabled.len());
        session.retain_personas(|id| enabled.iter().any(|p| p.id == id));

        let working: Vec<&Persona> = enabled
            .iter()
            .copied()
            .filter(|p| match mode {
                RunMode::All => true,
                RunMode::RetryFailed => session
                    .get(&p.id)
                    .map_or(true, |r| r.status() == RunStatus::Error),
            })
            .collect();

        for persona in &working {
            let reset = session
                .get_mut(&persona.id)
                .map(|existing| existing.reset());
            if reset != Some(true) {
                session.upsert(RunResult::queued(persona));
            }
            observer.on_status(&persona.id, RunStatus::Queued, None);
        }

        info!(
            "Reviewing with {} of {} personas ({:?}) via {}",
            working.len(),
            enabled.len(),
            mode,
            self.provider.name()
        );

        let ctx = ReviewContext {
            provider: self.provider.as_ref(),
            surface: self.surface.as_ref(),
            options: &self.options,
        };

        for persona in working {
            let start = Instant::now();
            let mut result = RunResult::queued(persona);
            result.transition(RunStatus::Running);
            session.upsert(result.clone());
            observer.on_status(&persona.id, RunStatus::Running, None);

            match review_persona(&ctx, persona, document_text).await {
                Ok(review) => {
                    let note = format!(
                        "{} matched, {} unmatched",
                        review.matched.len(),
                        review.unmatched.len()
                    );
                    info!("{} done: {}", persona.id, note);
                    result.complete(
                        review.feedback,
                        review.matched,
                        review.unmatched,
                        start.elapsed(),
                    );
                    session.upsert(result);
                    observer.on_status(&persona.id, RunStatus::Done, Some(&note));
                }
                Err(e) => {
                    let message = e.to_string();
                    warn!("{} failed: {}", persona.id, message);
                    result.fail(
                        message.clone(),
                        e.raw_response().map(str::to_string),
                        start.elapsed(),
                    );
                    session.upsert(result);
                    observer.on_status(&persona.id, RunStatus::Error, Some(&message));
                }
            }

            observer.on_progress(session.progress());
        }

        let snapshot = session.clone();
        drop(slot);
        drop(guard);
        observer.on_finished(&snapshot);
        Ok(snapshot)
    }
}
