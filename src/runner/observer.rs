use super::{RunSession, RunStatus};
use tracing::{info, warn};

/// Receives run events in the order they happen
pub trait RunObserver: Send + Sync {
    fn on_status(&self, persona_id: &str, status: RunStatus, note: Option<&str>);

    fn on_progress(&self, _fraction: f64) {}

    fn on_finished(&self, _session: &RunSession) {}
}

/// Observer that writes every event to the log
pub struct TracingObserver;

impl RunObserver for TracingObserver {
    fn on_status(&self, persona_id: &str, status: RunStatus, note: Option<&str>) {
        match (status, note) {
            (RunStatus::Error, Some(note)) => warn!("{}: {} ({})", persona_id, status, note),
            (_, Some(note)) => info!("{}: {} ({})", persona_id, status, note),
            (_, None) => info!("{}: {}", persona_id, status),
        }
    }

    fn on_progress(&self, fraction: f64) {
        info!("Progress: {:.0}%", fraction * 100.0);
    }

    fn on_finished(&self, session: &RunSession) {
        info!(
            "Review finished: {} done, {} failed of {}",
            session.count(RunStatus::Done),
            session.count(RunStatus::Error),
            session.total_enabled()
        );
    }
}
