mod diagnostics;
mod ideas;
mod pipeline;
mod reports;
mod users;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::middleware::{
    enforce_rate_limit, request_id, require_admin_auth, require_bearer_auth, AuthState,
    RateLimitState, RequestId,
};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<helix_core::AppConfig>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub request_id: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: ErrorBody,
    pub meta: ResponseMeta,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    database: &'static str,
}

impl ResponseMeta {
    pub(super) fn new(request_id: String) -> Self {
        Self {
            request_id,
            timestamp: Utc::now(),
        }
    }
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: ErrorBody {
                code: code.into(),
                message: message.into(),
            },
            meta: ResponseMeta::new(request_id.into()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.error.code.as_str() {
            "not_found" => StatusCode::NOT_FOUND,
            "unauthorized" => StatusCode::UNAUTHORIZED,
            "bad_request" | "validation_error" => StatusCode::BAD_REQUEST,
            "conflict" => StatusCode::CONFLICT,
            "rate_limited" => StatusCode::TOO_MANY_REQUESTS,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

pub(super) fn normalize_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(50).clamp(1, 200)
}

pub(super) fn map_db_error(request_id: String, error: &helix_db::DbError) -> ApiError {
    tracing::error!(error = %error, "database query failed");
    ApiError::new(request_id, "internal_error", "database query failed")
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-request-id"),
        ])
}

fn protected_router(auth: AuthState, rate_limit: RateLimitState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/ideas", get(ideas::list_ideas))
        .route("/api/v1/ideas/{id}", get(ideas::get_idea))
        .route("/api/v1/reports", get(reports::list_reports))
        .route("/api/v1/reports/latest", get(reports::latest_report))
        .route("/api/v1/diagnostics/env", get(diagnostics::env_report))
        .route("/api/v1/users/{id}", get(users::get_user))
        .route("/api/v1/users/{id}/usage", post(users::track_usage))
        .layer(
            ServiceBuilder::new()
                .layer(axum::middleware::from_fn_with_state(
                    rate_limit,
                    enforce_rate_limit,
                ))
                .layer(axum::middleware::from_fn_with_state(
                    auth,
                    require_bearer_auth,
                )),
        )
}

fn admin_router(auth: AuthState) -> Router<AppState> {
    Router::new()
        .route("/api/v1/pipeline/run", post(pipeline::run_pipeline))
        .route("/api/v1/users/{id}/tier", post(users::grant_tier))
        .layer(axum::middleware::from_fn_with_state(auth, require_admin_auth))
}

pub fn build_app(state: AppState, auth: AuthState, rate_limit: RateLimitState) -> Router {
    let public_routes = Router::new().route("/api/v1/health", get(health));

    Router::new()
        .merge(public_routes)
        .merge(protected_router(auth.clone(), rate_limit))
        .merge(admin_router(auth))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id)),
        )
        .with_state(state)
}

async fn health(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
) -> impl IntoResponse {
    let meta = ResponseMeta::new(req_id.0);

    match helix_db::health_check(&state.pool).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse {
                data: HealthData {
                    status: "ok",
                    database: "ok",
                },
                meta,
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "health check: database unavailable");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    data: HealthData {
                        status: "degraded",
                        database: "unavailable",
                    },
                    meta,
                }),
            )
        }
    }
}

pub fn default_rate_limit_state() -> RateLimitState {
    RateLimitState::new(120, Duration::from_secs(60))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use std::path::PathBuf;

    fn test_config() -> Arc<helix_core::AppConfig> {
        Arc::new(helix_core::AppConfig {
            database_url: "postgres://unused".to_string(),
            env: helix_core::Environment::Test,
            bind_addr: "127.0.0.1:0".parse().expect("addr"),
            log_level: "debug".to_string(),
            sources_path: PathBuf::from("./no-such-sources.yaml"),
            search_api_key: None,
            search_base_url: None,
            llm_api_key: None,
            llm_base_url: None,
            llm_model: "test-model".to_string(),
            db_max_connections: 5,
            db_min_connections: 1,
            db_acquire_timeout_secs: 10,
            request_timeout_secs: 5,
            inter_request_delay_ms: 0,
            max_retries: 0,
            retry_backoff_base_ms: 0,
            search_page_size: 10,
            scoring_batch_size: 20,
            report_top_n: 10,
        })
    }

    fn test_auth() -> AuthState {
        AuthState::with_keys(vec!["reader-key".to_string()], vec!["admin-key".to_string()])
    }

    fn test_app(pool: sqlx::PgPool) -> Router {
        build_app(
            AppState {
                pool,
                config: test_config(),
            },
            test_auth(),
            default_rate_limit_state(),
        )
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&bytes).expect("json parse")
    }

    fn get_request(uri: &str, bearer: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = bearer {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::empty()).expect("request")
    }

    #[test]
    fn normalize_limit_applies_defaults_and_bounds() {
        assert_eq!(normalize_limit(None), 50);
        assert_eq!(normalize_limit(Some(0)), 1);
        assert_eq!(normalize_limit(Some(1_000)), 200);
        assert_eq!(normalize_limit(Some(25)), 25);
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_not_found_maps_to_404() {
        let response = ApiError::new("req-1", "not_found", "missing").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn api_error_unknown_code_maps_to_500() {
        let response = ApiError::new("req-1", "mystery", "boom").into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    // -------------------------------------------------------------------------
    // Auth gating — a missing Authorization header is never a silent success
    // -------------------------------------------------------------------------

    #[sqlx::test(migrations = "../../migrations")]
    async fn gated_route_without_token_returns_unauthorized(pool: sqlx::PgPool) {
        use tower::ServiceExt;

        let app = test_app(pool);
        let response = app
            .oneshot(get_request("/api/v1/ideas", None))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "unauthorized");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn gated_route_with_unknown_token_returns_unauthorized(pool: sqlx::PgPool) {
        use tower::ServiceExt;

        let app = test_app(pool);
        let response = app
            .oneshot(get_request("/api/v1/ideas", Some("wrong-key")))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn admin_route_rejects_regular_key(pool: sqlx::PgPool) {
        use tower::ServiceExt;

        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/pipeline/run")
                    .header("authorization", "Bearer reader-key")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "unauthorized");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn health_is_public(pool: sqlx::PgPool) {
        use tower::ServiceExt;

        let app = test_app(pool);
        let response = app
            .oneshot(get_request("/api/v1/health", None))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["status"], "ok");
        assert!(json["meta"]["request_id"].is_string());
    }

    // -------------------------------------------------------------------------
    // Ideas routes
    // -------------------------------------------------------------------------

    async fn seed_idea(pool: &sqlx::PgPool, dedup: &str, title: &str) -> i64 {
        sqlx::query_scalar::<_, i64>(
            "INSERT INTO ideas \
                 (title, description, source_platform, source_url, dedup_key, indicators, \
                  category, estimated_build_weeks, estimated_tech_stack) \
             VALUES ($1, 'A dashboard for tracking things', 'r-startups', $2, $3, \
                     '[\"pain point\"]'::jsonb, 'startup', 2, 'Next.js + Node.js + PostgreSQL') \
             RETURNING id",
        )
        .bind(title)
        .bind(format!("https://example.com/{dedup}"))
        .bind(dedup)
        .fetch_one(pool)
        .await
        .expect("seed idea")
    }

    async fn seed_analysis(pool: &sqlx::PgPool, idea_id: i64, overall: i32) -> i64 {
        let analysis_id: i64 = sqlx::query_scalar(
            "INSERT INTO analyses \
                 (idea_id, severity, feasibility, competition_gap, viability, \
                  revenue_potential, overall_score, complexity, explanation, is_fallback) \
             VALUES ($1, 60, 60, 60, 60, 50, $2, 'simple', 'seeded', false) \
             RETURNING id",
        )
        .bind(idea_id)
        .bind(overall)
        .fetch_one(pool)
        .await
        .expect("seed analysis");

        sqlx::query("UPDATE ideas SET analysis_id = $2 WHERE id = $1")
            .bind(idea_id)
            .bind(analysis_id)
            .execute(pool)
            .await
            .expect("link analysis");

        analysis_id
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn list_ideas_returns_seeded_rows(pool: sqlx::PgPool) {
        use tower::ServiceExt;

        seed_idea(&pool, "key-1", "Idea one").await;
        seed_idea(&pool, "key-2", "Idea two").await;

        let app = test_app(pool);
        let response = app
            .oneshot(get_request("/api/v1/ideas", Some("reader-key")))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 2);
        assert!(data.iter().all(|item| item["analysis_id"].is_null()));
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn list_ideas_scored_only_filters_unscored(pool: sqlx::PgPool) {
        use tower::ServiceExt;

        let scored = seed_idea(&pool, "key-scored", "Scored idea").await;
        seed_idea(&pool, "key-unscored", "Unscored idea").await;
        seed_analysis(&pool, scored, 70).await;

        let app = test_app(pool);
        let response = app
            .oneshot(get_request(
                "/api/v1/ideas?scored_only=true",
                Some("reader-key"),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["title"], "Scored idea");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn get_idea_embeds_analysis(pool: sqlx::PgPool) {
        use tower::ServiceExt;

        let id = seed_idea(&pool, "key-detail", "Detailed idea").await;
        seed_analysis(&pool, id, 81).await;

        let app = test_app(pool);
        let response = app
            .oneshot(get_request(
                &format!("/api/v1/ideas/{id}"),
                Some("reader-key"),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["idea"]["title"], "Detailed idea");
        assert_eq!(json["data"]["analysis"]["overall_score"], 81);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn get_idea_returns_404_for_unknown_id(pool: sqlx::PgPool) {
        use tower::ServiceExt;

        let app = test_app(pool);
        let response = app
            .oneshot(get_request("/api/v1/ideas/999999", Some("reader-key")))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "not_found");
    }

    // -------------------------------------------------------------------------
    // Reports routes
    // -------------------------------------------------------------------------

    async fn seed_report(pool: &sqlx::PgPool, date: &str, kind: &str) {
        sqlx::query(
            "INSERT INTO daily_reports \
                 (report_date, report_type, idea_count, avg_build_weeks, top_tech_stack, \
                  max_revenue_potential, simple_count, payload) \
             VALUES ($1::date, $2, 3, 2.3, 'Next.js + Node.js + PostgreSQL', 85, 2, '[]'::jsonb)",
        )
        .bind(date)
        .bind(kind)
        .execute(pool)
        .await
        .expect("seed report");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn latest_report_returns_most_recent_of_type(pool: sqlx::PgPool) {
        use tower::ServiceExt;

        seed_report(&pool, "2026-08-05", "daily_top_ideas").await;
        seed_report(&pool, "2026-08-06", "daily_top_ideas").await;

        let app = test_app(pool);
        let response = app
            .oneshot(get_request("/api/v1/reports/latest", Some("reader-key")))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["report_date"], "2026-08-06");
        assert_eq!(json["data"]["idea_count"], 3);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn latest_report_returns_404_when_none_exists(pool: sqlx::PgPool) {
        use tower::ServiceExt;

        let app = test_app(pool);
        let response = app
            .oneshot(get_request("/api/v1/reports/latest", Some("reader-key")))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn list_reports_filters_by_type(pool: sqlx::PgPool) {
        use tower::ServiceExt;

        seed_report(&pool, "2026-08-06", "daily_top_ideas").await;
        seed_report(&pool, "2026-08-06", "weekly_trends").await;

        let app = test_app(pool);
        let response = app
            .oneshot(get_request(
                "/api/v1/reports?type=weekly_trends",
                Some("reader-key"),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let data = json["data"].as_array().expect("data array");
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["report_type"], "weekly_trends");
    }

    // -------------------------------------------------------------------------
    // Users routes
    // -------------------------------------------------------------------------

    #[sqlx::test(migrations = "../../migrations")]
    async fn grant_tier_updates_profile(pool: sqlx::PgPool) {
        use tower::ServiceExt;

        let user_id = uuid::Uuid::new_v4();
        helix_db::create_user(&pool, user_id, "subscriber@example.com")
            .await
            .expect("create user");

        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/users/{user_id}/tier"))
                    .header("authorization", "Bearer admin-key")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"tier": "pro"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["tier"], "pro");
        assert_eq!(json["data"]["effective_tier"], "pro");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn grant_tier_rejects_unknown_tier(pool: sqlx::PgPool) {
        use tower::ServiceExt;

        let user_id = uuid::Uuid::new_v4();
        helix_db::create_user(&pool, user_id, "subscriber@example.com")
            .await
            .expect("create user");

        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(format!("/api/v1/users/{user_id}/tier"))
                    .header("authorization", "Bearer admin-key")
                    .header("content-type", "application/json")
                    .body(Body::from(r#"{"tier": "platinum"}"#))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "validation_error");
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn track_usage_increments_counter(pool: sqlx::PgPool) {
        use tower::ServiceExt;

        let user_id = uuid::Uuid::new_v4();
        helix_db::create_user(&pool, user_id, "counter@example.com")
            .await
            .expect("create user");

        let app = test_app(pool);
        for expected in 1..=2 {
            let response = app
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri(format!("/api/v1/users/{user_id}/usage"))
                        .header("authorization", "Bearer reader-key")
                        .body(Body::empty())
                        .expect("request"),
                )
                .await
                .expect("response");

            assert_eq!(response.status(), StatusCode::OK);
            let json = body_json(response).await;
            assert_eq!(json["data"]["usage_count"], expected);
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn get_user_reports_expired_gift_as_free(pool: sqlx::PgPool) {
        use tower::ServiceExt;

        let user_id = uuid::Uuid::new_v4();
        helix_db::create_user(&pool, user_id, "gifted@example.com")
            .await
            .expect("create user");
        helix_db::grant_tier(
            &pool,
            user_id,
            "pro",
            Some(chrono::Utc::now() - chrono::Duration::days(1)),
        )
        .await
        .expect("grant");

        let app = test_app(pool);
        let response = app
            .oneshot(get_request(
                &format!("/api/v1/users/{user_id}"),
                Some("reader-key"),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["tier"], "pro");
        assert_eq!(json["data"]["effective_tier"], "free");
    }

    // -------------------------------------------------------------------------
    // Diagnostics + pipeline trigger
    // -------------------------------------------------------------------------

    #[sqlx::test(migrations = "../../migrations")]
    async fn diagnostics_env_reports_presence_booleans_only(pool: sqlx::PgPool) {
        use tower::ServiceExt;

        let app = test_app(pool);
        let response = app
            .oneshot(get_request("/api/v1/diagnostics/env", Some("reader-key")))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["search_api_key"], false);
        assert_eq!(json["data"]["llm_api_key"], false);
        assert_eq!(json["data"]["sources_file"], false);
        // Booleans only; no secret material anywhere in the body.
        assert!(!body_contains_secret(&json));
    }

    fn body_contains_secret(value: &serde_json::Value) -> bool {
        match value {
            serde_json::Value::String(s) => s.contains("key") && s.len() > 20,
            serde_json::Value::Array(items) => items.iter().any(body_contains_secret),
            serde_json::Value::Object(map) => map.values().any(body_contains_secret),
            _ => false,
        }
    }

    #[sqlx::test(migrations = "../../migrations")]
    async fn pipeline_run_reports_partial_success(pool: sqlx::PgPool) {
        use tower::ServiceExt;

        // No upstream credentials configured: discovery and scoring fail,
        // the report step still writes an empty snapshot.
        let app = test_app(pool);
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/v1/pipeline/run")
                    .header("authorization", "Bearer admin-key")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["discovery"]["status"], "failed");
        assert_eq!(json["data"]["scoring"]["status"], "failed");
        assert_eq!(json["data"]["report"]["status"], "completed");
    }
}
