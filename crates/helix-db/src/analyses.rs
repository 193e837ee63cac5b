//! Database operations for the `analyses` table.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::DbError;

/// A row from the `analyses` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct AnalysisRow {
    pub id: i64,
    pub idea_id: i64,
    pub severity: i32,
    pub feasibility: i32,
    pub competition_gap: i32,
    pub viability: i32,
    pub revenue_potential: i32,
    pub overall_score: i32,
    pub complexity: String,
    pub explanation: String,
    pub is_fallback: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert an analysis.
#[derive(Debug, Clone)]
pub struct NewAnalysis {
    pub idea_id: i64,
    pub severity: i32,
    pub feasibility: i32,
    pub competition_gap: i32,
    pub viability: i32,
    pub revenue_potential: i32,
    pub overall_score: i32,
    pub complexity: String,
    pub explanation: String,
    pub is_fallback: bool,
}

/// Insert a new analysis and return its generated id.
///
/// Analyses are immutable once written. `idea_id` carries a UNIQUE
/// constraint, so a second writer racing on the same idea gets a conflict
/// error here instead of silently creating a duplicate.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails, including on an
/// `idea_id` uniqueness conflict.
pub async fn insert_analysis(pool: &PgPool, analysis: &NewAnalysis) -> Result<i64, DbError> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO analyses \
             (idea_id, severity, feasibility, competition_gap, viability, \
              revenue_potential, overall_score, complexity, explanation, is_fallback) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) \
         RETURNING id",
    )
    .bind(analysis.idea_id)
    .bind(analysis.severity)
    .bind(analysis.feasibility)
    .bind(analysis.competition_gap)
    .bind(analysis.viability)
    .bind(analysis.revenue_potential)
    .bind(analysis.overall_score)
    .bind(&analysis.complexity)
    .bind(&analysis.explanation)
    .bind(analysis.is_fallback)
    .fetch_one(pool)
    .await?;

    Ok(id)
}

/// Fetch a single analysis by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_analysis(pool: &PgPool, id: i64) -> Result<Option<AnalysisRow>, DbError> {
    let row = sqlx::query_as::<_, AnalysisRow>(
        "SELECT id, idea_id, severity, feasibility, competition_gap, viability, \
                revenue_potential, overall_score, complexity, explanation, is_fallback, \
                created_at \
         FROM analyses WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}
