//! Database operations for the `daily_reports` table.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde_json::Value;
use sqlx::PgPool;

use crate::DbError;

/// A row from the `daily_reports` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DailyReportRow {
    pub id: i64,
    pub report_date: NaiveDate,
    pub report_type: String,
    pub idea_count: i32,
    pub avg_build_weeks: Decimal,
    pub top_tech_stack: Option<String>,
    pub max_revenue_potential: i32,
    pub simple_count: i32,
    pub payload: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields required to write a daily report snapshot.
#[derive(Debug, Clone)]
pub struct NewDailyReport {
    pub report_date: NaiveDate,
    pub report_type: String,
    pub idea_count: i32,
    pub avg_build_weeks: Decimal,
    pub top_tech_stack: Option<String>,
    pub max_revenue_potential: i32,
    pub simple_count: i32,
    pub payload: Value,
}

const REPORT_COLUMNS: &str = "id, report_date, report_type, idea_count, avg_build_weeks, \
     top_tech_stack, max_revenue_potential, simple_count, payload, created_at, updated_at";

/// Insert or refresh the report for `(report_date, report_type)`.
///
/// Re-running the aggregator on the same day updates the existing row in
/// place rather than producing a second one; the returned id is stable
/// across re-runs.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the upsert fails.
pub async fn upsert_daily_report(pool: &PgPool, report: &NewDailyReport) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO daily_reports \
             (report_date, report_type, idea_count, avg_build_weeks, top_tech_stack, \
              max_revenue_potential, simple_count, payload) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         ON CONFLICT (report_date, report_type) DO UPDATE SET \
             idea_count = EXCLUDED.idea_count, \
             avg_build_weeks = EXCLUDED.avg_build_weeks, \
             top_tech_stack = EXCLUDED.top_tech_stack, \
             max_revenue_potential = EXCLUDED.max_revenue_potential, \
             simple_count = EXCLUDED.simple_count, \
             payload = EXCLUDED.payload, \
             updated_at = NOW() \
         RETURNING id",
    )
    .bind(report.report_date)
    .bind(&report.report_type)
    .bind(report.idea_count)
    .bind(report.avg_build_weeks)
    .bind(&report.top_tech_stack)
    .bind(report.max_revenue_potential)
    .bind(report.simple_count)
    .bind(&report.payload)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Return the most recent report of the given type, or `None` if none exists.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_latest_report(
    pool: &PgPool,
    report_type: &str,
) -> Result<Option<DailyReportRow>, DbError> {
    let row = sqlx::query_as::<_, DailyReportRow>(&format!(
        "SELECT {REPORT_COLUMNS} FROM daily_reports \
         WHERE report_type = $1 \
         ORDER BY report_date DESC, id DESC \
         LIMIT 1"
    ))
    .bind(report_type)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// List recent reports, optionally filtered by type.
///
/// Results are ordered by `report_date DESC` then `id DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_reports(
    pool: &PgPool,
    report_type: Option<&str>,
    limit: i64,
) -> Result<Vec<DailyReportRow>, DbError> {
    let rows = match report_type {
        Some(kind) => {
            sqlx::query_as::<_, DailyReportRow>(&format!(
                "SELECT {REPORT_COLUMNS} FROM daily_reports \
                 WHERE report_type = $1 \
                 ORDER BY report_date DESC, id DESC \
                 LIMIT $2"
            ))
            .bind(kind)
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, DailyReportRow>(&format!(
                "SELECT {REPORT_COLUMNS} FROM daily_reports \
                 ORDER BY report_date DESC, id DESC \
                 LIMIT $1"
            ))
            .bind(limit)
            .fetch_all(pool)
            .await?
        }
    };

    Ok(rows)
}
