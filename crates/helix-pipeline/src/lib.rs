//! Orchestration of the opportunity pipeline.
//!
//! Three steps — discover, score, report — run strictly sequentially with a
//! fixed delay between upstream calls. Items fail soft: a dead query, an
//! unparseable completion, or a lost claim is logged and skipped, never
//! fatal to the batch. [`run_full`] chains the steps with best-effort
//! partial completion and reports per-step outcomes.

mod discovery;
mod report;
mod scoring;
mod summary;

use thiserror::Error;

pub use discovery::{run_discovery, DiscoveryOutcome};
pub use report::{run_report, ReportOutcome};
pub use scoring::{run_scoring, ScoringOutcome};
pub use summary::{run_full, PipelineRunSummary, StepOutcome};

#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required upstream credential is not configured.
    #[error("missing credential: set {0}")]
    MissingCredential(&'static str),

    #[error(transparent)]
    Config(#[from] helix_core::ConfigError),

    #[error(transparent)]
    Db(#[from] helix_db::DbError),

    #[error(transparent)]
    Search(#[from] helix_search::SearchError),

    #[error(transparent)]
    Scoring(#[from] helix_scoring::ScoringError),
}
