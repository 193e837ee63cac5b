//! Best-effort full-pipeline run with per-step outcomes.

use helix_core::AppConfig;
use serde::Serialize;
use sqlx::PgPool;

use crate::{
    discovery::run_discovery, report::run_report, scoring::run_scoring, DiscoveryOutcome,
    ReportOutcome, ScoringOutcome,
};

/// One step's result: what it produced, or the error that stopped it.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StepOutcome<T> {
    Completed { outcome: T },
    Failed { error: String },
}

impl<T> StepOutcome<T> {
    fn from_result<E: std::fmt::Display>(result: Result<T, E>) -> Self {
        match result {
            Ok(outcome) => StepOutcome::Completed { outcome },
            Err(e) => StepOutcome::Failed {
                error: e.to_string(),
            },
        }
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, StepOutcome::Completed { .. })
    }
}

/// Per-step results of one full pipeline run.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineRunSummary {
    pub discovery: StepOutcome<DiscoveryOutcome>,
    pub scoring: StepOutcome<ScoringOutcome>,
    pub report: StepOutcome<ReportOutcome>,
}

/// Run discovery, scoring, and report in order.
///
/// A failed step is recorded in the summary and does not prevent later
/// steps from attempting to run — partial completion is reported, never
/// hidden behind an all-or-nothing error.
pub async fn run_full(pool: &PgPool, config: &AppConfig) -> PipelineRunSummary {
    let discovery = StepOutcome::from_result(run_discovery(pool, config).await);
    if let StepOutcome::Failed { error } = &discovery {
        tracing::error!(error = %error, "pipeline: discovery step failed");
    }

    let scoring = StepOutcome::from_result(run_scoring(pool, config).await);
    if let StepOutcome::Failed { error } = &scoring {
        tracing::error!(error = %error, "pipeline: scoring step failed");
    }

    let report = StepOutcome::from_result(run_report(pool, config).await);
    if let StepOutcome::Failed { error } = &report {
        tracing::error!(error = %error, "pipeline: report step failed");
    }

    PipelineRunSummary {
        discovery,
        scoring,
        report,
    }
}
