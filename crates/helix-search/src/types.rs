use serde::{Deserialize, Serialize};

/// Request body for the search endpoint.
#[derive(Debug, Serialize)]
pub(crate) struct SearchRequest<'a> {
    pub q: &'a str,
    pub num: u32,
}

/// Top-level search response envelope.
///
/// Fields other than `organic` (knowledge panels, ads, related searches)
/// are ignored.
#[derive(Debug, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub organic: Vec<OrganicResult>,
}

/// One organic search result.
#[derive(Debug, Clone, Deserialize)]
pub struct OrganicResult {
    pub title: String,
    #[serde(default)]
    pub snippet: String,
    pub link: String,
    #[serde(default)]
    pub position: Option<u32>,
}

impl OrganicResult {
    /// Title and snippet joined for indicator scanning.
    #[must_use]
    pub fn combined_text(&self) -> String {
        if self.snippet.is_empty() {
            self.title.clone()
        } else {
            format!("{} {}", self.title, self.snippet)
        }
    }
}
