use helix_core::Complexity;
use serde::{Deserialize, Serialize};

/// The idea fields embedded into the scoring prompt.
#[derive(Debug, Clone)]
pub struct IdeaBrief {
    pub title: String,
    pub description: String,
    pub category: String,
    pub estimated_build_weeks: i32,
    pub estimated_tech_stack: String,
}

/// The scores parsed from the completion (or synthesized by the fallback).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisScores {
    pub severity: i32,
    pub feasibility: i32,
    pub competition_gap: i32,
    pub viability: i32,
    pub revenue_potential: i32,
    pub complexity: Complexity,
    pub explanation: String,
}

/// A complete analysis ready for persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredAnalysis {
    pub scores: AnalysisScores,
    pub overall_score: i32,
    pub is_fallback: bool,
}

// ---------------------------------------------------------------------------
// Chat-completion wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub(crate) struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage<'a>>,
    pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage<'a> {
    pub role: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    pub content: Option<String>,
}
