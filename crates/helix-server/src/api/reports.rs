use axum::{
    extract::{Query, State},
    Extension, Json,
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{map_db_error, normalize_limit, ApiError, ApiResponse, AppState, ResponseMeta};

const DEFAULT_REPORT_TYPE: &str = "daily_top_ideas";

#[derive(Debug, Deserialize)]
pub(super) struct ReportsQuery {
    #[serde(rename = "type")]
    pub report_type: Option<String>,
    pub limit: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(super) struct ReportItem {
    id: i64,
    report_date: NaiveDate,
    report_type: String,
    idea_count: i32,
    avg_build_weeks: Decimal,
    top_tech_stack: Option<String>,
    max_revenue_potential: i32,
    simple_count: i32,
    payload: serde_json::Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn report_item(row: helix_db::DailyReportRow) -> ReportItem {
    ReportItem {
        id: row.id,
        report_date: row.report_date,
        report_type: row.report_type,
        idea_count: row.idea_count,
        avg_build_weeks: row.avg_build_weeks,
        top_tech_stack: row.top_tech_stack,
        max_revenue_potential: row.max_revenue_potential,
        simple_count: row.simple_count,
        payload: row.payload,
        created_at: row.created_at,
        updated_at: row.updated_at,
    }
}

pub(super) async fn list_reports(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ReportsQuery>,
) -> Result<Json<ApiResponse<Vec<ReportItem>>>, ApiError> {
    let rows = helix_db::list_reports(
        &state.pool,
        query.report_type.as_deref(),
        normalize_limit(query.limit),
    )
    .await
    .map_err(|e| map_db_error(req_id.0.clone(), &e))?;

    let data = rows.into_iter().map(report_item).collect();

    Ok(Json(ApiResponse {
        data,
        meta: ResponseMeta::new(req_id.0),
    }))
}

pub(super) async fn latest_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(query): Query<ReportsQuery>,
) -> Result<Json<ApiResponse<ReportItem>>, ApiError> {
    let report_type = query.report_type.as_deref().unwrap_or(DEFAULT_REPORT_TYPE);

    let Some(row) = helix_db::get_latest_report(&state.pool, report_type)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
    else {
        return Err(ApiError::new(
            req_id.0,
            "not_found",
            format!("no {report_type} report exists yet"),
        ));
    };

    Ok(Json(ApiResponse {
        data: report_item(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}
