use axum::{extract::State, Extension, Json};
use helix_pipeline::PipelineRunSummary;

use crate::middleware::RequestId;

use super::{ApiResponse, AppState, ResponseMeta};

/// Run the full discover → score → report pipeline synchronously.
///
/// The response always carries the per-step summary; a failed step shows up
/// as `status: "failed"` next to whatever did complete, mirroring the
/// pipeline's best-effort semantics.
pub(super) async fn run_pipeline(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> Json<ApiResponse<PipelineRunSummary>> {
    tracing::info!("pipeline run triggered via API");
    let summary = helix_pipeline::run_full(&state.pool, &state.config).await;

    Json(ApiResponse {
        data: summary,
        meta: ResponseMeta::new(req_id.0),
    })
}
