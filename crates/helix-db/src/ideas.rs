//! Database operations for the `ideas` table.

use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::PgPool;

use crate::DbError;

// ---------------------------------------------------------------------------
// Row types
// ---------------------------------------------------------------------------

/// A row from the `ideas` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IdeaRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub source_platform: String,
    pub source_url: String,
    pub dedup_key: String,
    pub indicators: Value,
    pub category: String,
    pub estimated_build_weeks: i32,
    pub estimated_tech_stack: String,
    pub is_new: bool,
    pub analysis_id: Option<i64>,
    pub discovered_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// An idea joined with its analysis, ordered for report assembly.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScoredIdeaRow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub source_platform: String,
    pub source_url: String,
    pub category: String,
    pub estimated_build_weeks: i32,
    pub estimated_tech_stack: String,
    pub discovered_at: DateTime<Utc>,
    pub analysis_id: i64,
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

/// Fields required to insert a discovered candidate.
#[derive(Debug, Clone)]
pub struct NewIdea {
    pub title: String,
    pub description: String,
    pub source_platform: String,
    pub source_url: String,
    pub dedup_key: String,
    pub indicators: Value,
    pub category: String,
    pub estimated_build_weeks: i32,
    pub estimated_tech_stack: String,
}

const IDEA_COLUMNS: &str = "id, title, description, source_platform, source_url, dedup_key, \
     indicators, category, estimated_build_weeks, estimated_tech_stack, is_new, analysis_id, \
     discovered_at, created_at";

// ---------------------------------------------------------------------------
// Queries
// ---------------------------------------------------------------------------

/// Insert a candidate idea, skipping it when its `dedup_key` already exists.
///
/// Returns `Some(id)` for a fresh insert and `None` when the candidate was a
/// duplicate of an earlier discovery.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the insert fails.
pub async fn insert_idea(pool: &PgPool, idea: &NewIdea) -> Result<Option<i64>, DbError> {
    let id: Option<i64> = sqlx::query_scalar(
        "INSERT INTO ideas \
             (title, description, source_platform, source_url, dedup_key, indicators, \
              category, estimated_build_weeks, estimated_tech_stack) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (dedup_key) DO NOTHING \
         RETURNING id",
    )
    .bind(&idea.title)
    .bind(&idea.description)
    .bind(&idea.source_platform)
    .bind(&idea.source_url)
    .bind(&idea.dedup_key)
    .bind(&idea.indicators)
    .bind(&idea.category)
    .bind(idea.estimated_build_weeks)
    .bind(&idea.estimated_tech_stack)
    .fetch_optional(pool)
    .await?;

    Ok(id)
}

/// List ideas that have no analysis yet, oldest discovery first.
///
/// This is the scoring step's work queue: `analysis_id IS NULL` is the only
/// unscored marker, so an idea skipped by one run is picked up by the next.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_unscored(pool: &PgPool, limit: i64) -> Result<Vec<IdeaRow>, DbError> {
    let rows = sqlx::query_as::<_, IdeaRow>(&format!(
        "SELECT {IDEA_COLUMNS} FROM ideas \
         WHERE analysis_id IS NULL \
         ORDER BY discovered_at ASC, id ASC \
         LIMIT $1"
    ))
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Link an analysis to its idea, claiming the idea if it is still unscored.
///
/// Returns `true` when this caller won the claim. Returns `false` when
/// another writer attached an analysis first — the caller should log and
/// move on rather than overwrite.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the update fails.
pub async fn attach_analysis(
    pool: &PgPool,
    idea_id: i64,
    analysis_id: i64,
) -> Result<bool, DbError> {
    let result = sqlx::query(
        "UPDATE ideas SET analysis_id = $2, is_new = false \
         WHERE id = $1 AND analysis_id IS NULL",
    )
    .bind(idea_id)
    .bind(analysis_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Fetch a single idea by id.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn get_idea(pool: &PgPool, id: i64) -> Result<Option<IdeaRow>, DbError> {
    let row = sqlx::query_as::<_, IdeaRow>(&format!(
        "SELECT {IDEA_COLUMNS} FROM ideas WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row)
}

/// List recent ideas, optionally restricted to scored ones.
///
/// Results are ordered by `discovered_at DESC` then `id DESC`.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn list_ideas(
    pool: &PgPool,
    scored_only: bool,
    limit: i64,
) -> Result<Vec<IdeaRow>, DbError> {
    let rows = if scored_only {
        sqlx::query_as::<_, IdeaRow>(&format!(
            "SELECT {IDEA_COLUMNS} FROM ideas \
             WHERE analysis_id IS NOT NULL \
             ORDER BY discovered_at DESC, id DESC \
             LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(pool)
        .await?
    } else {
        sqlx::query_as::<_, IdeaRow>(&format!(
            "SELECT {IDEA_COLUMNS} FROM ideas \
             ORDER BY discovered_at DESC, id DESC \
             LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(pool)
        .await?
    };

    Ok(rows)
}

/// Return the top-N scored ideas joined with their analyses.
///
/// Ordered by `overall_score DESC` with id as a stable tie-break; only ideas
/// with a linked analysis qualify.
///
/// # Errors
///
/// Returns [`DbError::Sqlx`] if the query fails.
pub async fn top_scored(pool: &PgPool, limit: i64) -> Result<Vec<ScoredIdeaRow>, DbError> {
    let rows = sqlx::query_as::<_, ScoredIdeaRow>(
        "SELECT i.id, i.title, i.description, i.source_platform, i.source_url, i.category, \
                i.estimated_build_weeks, i.estimated_tech_stack, i.discovered_at, \
                a.id AS analysis_id, a.severity, a.feasibility, a.competition_gap, a.viability, \
                a.revenue_potential, a.overall_score, a.complexity, a.explanation, a.is_fallback \
         FROM ideas i \
         JOIN analyses a ON a.id = i.analysis_id \
         ORDER BY a.overall_score DESC, i.id ASC \
         LIMIT $1",
    )
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
