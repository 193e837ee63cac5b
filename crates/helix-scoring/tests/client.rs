//! Integration tests for `ScoringClient` using wiremock HTTP mocks.

use helix_core::Complexity;
use helix_scoring::{IdeaBrief, ScoringClient, ScoringError};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn brief() -> IdeaBrief {
    IdeaBrief {
        title: "Invoice chasing assistant".to_string(),
        description: "Chasing late invoices is a tedious manual process.".to_string(),
        category: "business".to_string(),
        estimated_build_weeks: 2,
        estimated_tech_stack: "Next.js + Node.js + PostgreSQL".to_string(),
    }
}

fn test_client(base_url: &str) -> ScoringClient {
    ScoringClient::with_base_url("test-key", "test-model", 30, base_url)
        .expect("client construction should not fail")
}

fn completion_body(content: &str) -> serde_json::Value {
    serde_json::json!({
        "id": "chatcmpl-123",
        "object": "chat.completion",
        "model": "test-model",
        "choices": [
            {
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }
        ]
    })
}

#[tokio::test]
async fn analyze_parses_clean_completion() {
    let server = MockServer::start().await;

    let content = r#"{"severity": 80, "feasibility": 70, "competition_gap": 60,
        "viability": 75, "revenue_potential": 55, "complexity": "medium",
        "explanation": "Strong demand, crowded middle."}"#;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({ "model": "test-model" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let analysis = client.analyze(&brief()).await.expect("should parse");

    assert!(!analysis.is_fallback);
    assert_eq!(analysis.scores.severity, 80);
    assert_eq!(analysis.scores.complexity, Complexity::Medium);
    // 0.25*80 + 0.20*70 + 0.20*60 + 0.20*75 + 0.15*70 = 71.5 -> 72
    assert_eq!(analysis.overall_score, 72);
}

#[tokio::test]
async fn analyze_handles_fenced_and_prosed_content() {
    let server = MockServer::start().await;

    let content = "Here is the assessment you asked for:\n```json\n\
        {\"severity\": 50, \"feasibility\": 90, \"competition_gap\": 80, \
         \"viability\": 60, \"revenue_potential\": 40, \"complexity\": \"simple\", \
         \"explanation\": \"Easy build, modest upside.\"}\n```\nHope that helps!";

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body(content)))
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let analysis = client.analyze(&brief()).await.expect("should parse");
    assert_eq!(analysis.scores.feasibility, 90);
    assert_eq!(analysis.scores.complexity, Complexity::Simple);
}

#[tokio::test]
async fn analyze_surfaces_unparseable_content_as_parse_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion_body("I'm sorry, I can't score that.")),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.analyze(&brief()).await.unwrap_err();
    assert!(matches!(err, ScoringError::Parse(_)), "got: {err:?}");
}

#[tokio::test]
async fn analyze_surfaces_api_error_with_status() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(429).set_body_string(r#"{"error": "rate limited"}"#),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.analyze(&brief()).await.unwrap_err();
    assert!(
        matches!(err, ScoringError::Api { status: 429, .. }),
        "got: {err:?}"
    );
}

#[tokio::test]
async fn analyze_treats_missing_choices_as_empty_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "id": "chatcmpl-456", "choices": [] })),
        )
        .mount(&server)
        .await;

    let client = test_client(&server.uri());
    let err = client.analyze(&brief()).await.unwrap_err();
    assert!(matches!(err, ScoringError::EmptyResponse), "got: {err:?}");
}
