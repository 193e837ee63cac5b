use axum::{extract::State, Extension, Json};
use serde::Serialize;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

/// Presence booleans for the configured credentials — never the values.
#[derive(Debug, Serialize)]
pub(super) struct EnvReport {
    database_url: bool,
    search_api_key: bool,
    search_base_url_override: bool,
    llm_api_key: bool,
    llm_base_url_override: bool,
    sources_file: bool,
}

pub(super) async fn env_report(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<EnvReport>> {
    let config = &state.config;

    Json(ApiResponse {
        data: EnvReport {
            database_url: !config.database_url.is_empty(),
            search_api_key: config.search_api_key.is_some(),
            search_base_url_override: config.search_base_url.is_some(),
            llm_api_key: config.llm_api_key.is_some(),
            llm_base_url_override: config.llm_base_url.is_some(),
            sources_file: config.sources_path.exists(),
        },
        meta: ResponseMeta::new(req_id.0),
    })
}
