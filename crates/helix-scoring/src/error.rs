use thiserror::Error;

/// Errors returned by the LLM scoring client.
///
/// Every variant is absorbed by the pipeline's fallback path; none of them
/// aborts a scoring batch.
#[derive(Debug, Error)]
pub enum ScoringError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The completion API returned a non-2xx status.
    #[error("completion API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The completion API base URL could not be parsed.
    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The response envelope held no choices or an empty message.
    #[error("completion API returned no content")]
    EmptyResponse,

    /// No parseable JSON analysis could be extracted from the completion.
    #[error("analysis parse error: {0}")]
    Parse(String),
}
