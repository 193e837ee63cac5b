//! Step 3: aggregate the daily report.

use chrono::{NaiveDate, Utc};
use helix_core::AppConfig;
use helix_report::{build_report, DEFAULT_REPORT_TYPE};
use serde::Serialize;
use sqlx::PgPool;

use crate::PipelineError;

/// Result of one report run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportOutcome {
    pub report_id: i64,
    pub report_date: NaiveDate,
    pub idea_count: i32,
}

/// Run the report step: pull the top-N scored ideas, compute the
/// aggregates, and upsert today's report row.
///
/// Keyed on `(report_date, report_type)`, so re-running on the same day
/// refreshes the existing row instead of duplicating it.
///
/// # Errors
///
/// Returns [`PipelineError::Db`] if the top-N query or the upsert fails.
pub async fn run_report(pool: &PgPool, config: &AppConfig) -> Result<ReportOutcome, PipelineError> {
    let rows = helix_db::top_scored(pool, config.report_top_n).await?;
    let report_date = Utc::now().date_naive();
    let report = build_report(report_date, DEFAULT_REPORT_TYPE, &rows);

    let report_id = helix_db::upsert_daily_report(pool, &report).await?;

    tracing::info!(
        report_id,
        %report_date,
        idea_count = report.idea_count,
        "report: daily snapshot written"
    );

    Ok(ReportOutcome {
        report_id,
        report_date,
        idea_count: report.idea_count,
    })
}
