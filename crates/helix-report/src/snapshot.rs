//! Daily report snapshot assembly.

use chrono::NaiveDate;
use helix_db::{NewDailyReport, ScoredIdeaRow};
use serde_json::{json, Value};

use crate::stats::{max_revenue_potential, mean_build_weeks, simple_count, top_tech_stack};

/// Report type written by the standard daily run.
pub const DEFAULT_REPORT_TYPE: &str = "daily_top_ideas";

/// Assemble the report row for one day from the ranked top-N ideas.
///
/// The scalar aggregates summarize the slice; `payload` embeds a
/// denormalized copy of every idea with its analysis, so the dashboard can
/// render a historical report without joining back to live tables. An empty
/// slice produces a zero-count report, not an error.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
pub fn build_report(
    report_date: NaiveDate,
    report_type: &str,
    rows: &[ScoredIdeaRow],
) -> NewDailyReport {
    NewDailyReport {
        report_date,
        report_type: report_type.to_string(),
        idea_count: rows.len() as i32,
        avg_build_weeks: mean_build_weeks(rows),
        top_tech_stack: top_tech_stack(rows),
        max_revenue_potential: max_revenue_potential(rows),
        simple_count: simple_count(rows),
        payload: Value::Array(rows.iter().map(snapshot_entry).collect()),
    }
}

fn snapshot_entry(row: &ScoredIdeaRow) -> Value {
    json!({
        "idea": {
            "id": row.id,
            "title": row.title,
            "description": row.description,
            "source_platform": row.source_platform,
            "source_url": row.source_url,
            "category": row.category,
            "estimated_build_weeks": row.estimated_build_weeks,
            "estimated_tech_stack": row.estimated_tech_stack,
            "discovered_at": row.discovered_at,
        },
        "analysis": {
            "id": row.analysis_id,
            "severity": row.severity,
            "feasibility": row.feasibility,
            "competition_gap": row.competition_gap,
            "viability": row.viability,
            "revenue_potential": row.revenue_potential,
            "overall_score": row.overall_score,
            "complexity": row.complexity,
            "explanation": row.explanation,
            "is_fallback": row.is_fallback,
        },
    })
}
