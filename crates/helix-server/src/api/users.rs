use axum::{
    extract::{Path, State},
    Extension, Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::middleware::RequestId;

use super::{map_db_error, ApiError, ApiResponse, AppState, ResponseMeta};

#[derive(Debug, Serialize)]
pub(super) struct UserItem {
    id: Uuid,
    email: String,
    tier: String,
    /// Tier with gift expiry applied; what feature gating should use.
    effective_tier: String,
    usage_count: i32,
    gift_expires_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub(super) struct GrantTierBody {
    pub tier: String,
    pub gift_expires_at: Option<DateTime<Utc>>,
}

fn user_item(row: helix_db::UserRow) -> UserItem {
    let effective = helix_db::effective_tier(&row, Utc::now()).to_string();
    UserItem {
        id: row.id,
        email: row.email,
        tier: row.tier,
        effective_tier: effective,
        usage_count: row.usage_count,
        gift_expires_at: row.gift_expires_at,
        created_at: row.created_at,
    }
}

pub(super) async fn get_user(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserItem>>, ApiError> {
    let Some(row) = helix_db::get_user(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
    else {
        return Err(ApiError::new(req_id.0, "not_found", "user not found"));
    };

    Ok(Json(ApiResponse {
        data: user_item(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}

/// Usage tracking: the dashboard calls this once per billable action.
pub(super) async fn track_usage(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UsageItem>>, ApiError> {
    match helix_db::increment_usage(&state.pool, id).await {
        Ok(usage_count) => Ok(Json(ApiResponse {
            data: UsageItem { id, usage_count },
            meta: ResponseMeta::new(req_id.0),
        })),
        Err(helix_db::DbError::NotFound) => {
            Err(ApiError::new(req_id.0, "not_found", "user not found"))
        }
        Err(e) => Err(map_db_error(req_id.0, &e)),
    }
}

#[derive(Debug, Serialize)]
pub(super) struct UsageItem {
    id: Uuid,
    usage_count: i32,
}

pub(super) async fn grant_tier(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Path(id): Path<Uuid>,
    Json(body): Json<GrantTierBody>,
) -> Result<Json<ApiResponse<UserItem>>, ApiError> {
    if !helix_db::VALID_TIERS.contains(&body.tier.as_str()) {
        return Err(ApiError::new(
            req_id.0,
            "validation_error",
            format!(
                "unknown tier '{}'; expected one of {:?}",
                body.tier,
                helix_db::VALID_TIERS
            ),
        ));
    }

    match helix_db::grant_tier(&state.pool, id, &body.tier, body.gift_expires_at).await {
        Ok(()) => {}
        Err(helix_db::DbError::NotFound) => {
            return Err(ApiError::new(req_id.0, "not_found", "user not found"));
        }
        Err(e) => return Err(map_db_error(req_id.0, &e)),
    }

    tracing::info!(user_id = %id, tier = %body.tier, "granted tier");

    let Some(row) = helix_db::get_user(&state.pool, id)
        .await
        .map_err(|e| map_db_error(req_id.0.clone(), &e))?
    else {
        return Err(ApiError::new(req_id.0, "not_found", "user not found"));
    };

    Ok(Json(ApiResponse {
        data: user_item(row),
        meta: ResponseMeta::new(req_id.0),
    }))
}
