mod executor;
mod observer;
mod orchestrator;
mod retry;
mod session;

pub use executor::build_review_prompt;
pub use observer::{RunObserver, TracingObserver};
pub use orchestrator::{Orchestrator, ReviewOptions, RunMode};
pub use session::{MatchedComment, RunResult, RunSession, RunStatus, UnmatchedComment};
