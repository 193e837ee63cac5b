//! HTTP client for the LLM completion API.
//!
//! Speaks the chat-completions dialect: one user message carrying the
//! scoring prompt, one choice back whose content embeds the JSON analysis.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::ScoringError;
use crate::extract::parse_scores;
use crate::fallback::overall_score;
use crate::prompt::build_scoring_prompt;
use crate::types::{ChatMessage, ChatRequest, ChatResponse, IdeaBrief, ScoredAnalysis};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/";
const TEMPERATURE: f32 = 0.2;

/// Client for the LLM completion API.
///
/// Use [`ScoringClient::new`] for production or
/// [`ScoringClient::with_base_url`] to point at a mock server in tests.
pub struct ScoringClient {
    client: Client,
    api_key: String,
    base_url: Url,
    model: String,
}

impl ScoringClient {
    /// Creates a new client pointed at the hosted completion API.
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, model: &str, timeout_secs: u64) -> Result<Self, ScoringError> {
        Self::with_base_url(api_key, model, timeout_secs, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`ScoringError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ScoringError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        model: &str,
        timeout_secs: u64,
        base_url: &str,
    ) -> Result<Self, ScoringError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("helix/0.1 (opportunity-scoring)")
            .build()?;

        // Normalise: the URL must end with one slash so join() appends the
        // endpoint path rather than replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ScoringError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            model: model.to_owned(),
        })
    }

    /// Score one idea through the completion API.
    ///
    /// Builds the prompt, sends a single-message chat request, extracts the
    /// JSON analysis from the first choice, and computes the weighted
    /// overall score. Callers absorb every error here with the fallback
    /// path; nothing aborts a batch.
    ///
    /// # Errors
    ///
    /// - [`ScoringError::Http`] on network failure.
    /// - [`ScoringError::Api`] on a non-2xx response.
    /// - [`ScoringError::EmptyResponse`] when no choice content came back.
    /// - [`ScoringError::Parse`] when the content holds no parseable
    ///   analysis.
    pub async fn analyze(&self, brief: &IdeaBrief) -> Result<ScoredAnalysis, ScoringError> {
        let prompt = build_scoring_prompt(brief);
        let content = self.complete(&prompt).await?;
        let scores = parse_scores(&content)?;
        let overall = overall_score(
            scores.severity,
            scores.feasibility,
            scores.competition_gap,
            scores.viability,
            scores.complexity,
        );

        Ok(ScoredAnalysis {
            scores,
            overall_score: overall,
            is_fallback: false,
        })
    }

    async fn complete(&self, prompt: &str) -> Result<String, ScoringError> {
        let url = self.endpoint_url();
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: TEMPERATURE,
        };

        tracing::debug!(model = %self.model, "completion request");

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ScoringError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: ChatResponse = response.json().await?;
        envelope
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|content| !content.trim().is_empty())
            .ok_or(ScoringError::EmptyResponse)
    }

    fn endpoint_url(&self) -> Url {
        self.base_url
            .join("chat/completions")
            .unwrap_or_else(|_| self.base_url.clone())
    }
}
