use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Deserialize)]
pub(super) struct IdeasQuery {
    pub scored_only: Option<bool>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct IdeaItem {
    id: i64,
    title: String,
    description: String,
    source_platform: String,
    source_url: String,
    category: String,
    indicators: serde_json::Value,
    estimated_build_weeks: i32,
    estimated_tech_stack: String,
    is_new: bool,
    analysis_id: Option<i64>,
    discovered_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(super) struct AnalysisItem {
    id: i64,
    severity: i32,
    feasibility: i32,
    competition_gap: i32,
    viability: i32,
    revenue_potential: i32,
    overall_score: i32,
    complexity: String,
    explanation: String,
    is_fallback: bool,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub(super) struct IdeaDetail {
    idea: IdeaItem,
    analysis: Option<AnalysisItem>,
}

fn idea_item(row: helix_db::IdeaRow) -> IdeaItem {
    IdeaItem {
        id: row.id,
        title: row.title,
        description: row.description,
        source_platform: row.source_platform,
        source_url: row.source_url,
        category: row.category,
        indicators: row.indicators,
        estimated_build_weeks: row.estimated_build_weeks,
        estimated_tech_stack: row.estimated_tech_stack,
        is_new: row.is_new,
        analysis_id: row.analysis_id,
        discovered_at: row.discovered_at,
    }
}

fn analysis_item(row: helix_db::AnalysisRow) -> AnalysisItem {
    AnalysisItem {
        id: row.id,
        severity: row.severity,
        feasibility: row.feasibility,
        competition_gap: row.competition_gap,
        viability: row.viability,
        revenue_potential: row.revenue_potential,
        overall_score: row.overall_score,
        complexity: row.complexity,
        explanation: row.explanation,
        is_fallback: row.is_fallback,
        created_at: row.created_at,
    }
}

pub(super) async fn list_ideas(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<IdeasQuery>,
) -> Result<Json<ApiResponse<Vec<IdeaItem>>>, ApiError> {
    let rows = helix_db::list_ideas(
        &state.pool,
        query.scored_only.unwrap_or(false),
        normalize_limit(query.limit),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows.into_iter().map(idea_item).collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn get_idea(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<IdeaDetail>>, ApiError> {
    let Some(row) = helix_db::get_idea(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
    else {
        return Err(ApiError::new(req_id.0, "not_found", "idea not found"));
    };

    let analysis = match row.analysis_id {
        Some(analysis_id) => helix_db::get_analysis(&state.pool, analysis_id)
            .await
            .map_err(|e| map_db_error(req_id.0.clone(), &e))?
            .map(analysis_item),
        None => None,
    };

    Ok(Json(ApiResponse {
        data: IdeaDetail {
            idea: idea_item(row),
            analysis,
        },
        meta: ResponseMeta::new(req_id.0),
    }))
}
