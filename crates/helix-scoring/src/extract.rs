//! Parsing of LLM completion content into [`AnalysisScores`].
//!
//! Models rarely return bare JSON: fenced code blocks and surrounding prose
//! are common. The policy is fence-strip, then take the first
//! brace-delimited substring, then parse strictly.

use std::sync::LazyLock;

use helix_core::Complexity;
use regex::Regex;
use serde::Deserialize;

use crate::error::ScoringError;
use crate::types::AnalysisScores;

// First `{` through last `}`, newlines included. Nested braces stay inside
// the match, so a single top-level object survives intact.
static JSON_OBJECT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\{.*\}").expect("static regex must compile"));

/// The completion's JSON schema before clamping. Numbers arrive as floats
/// often enough that parsing them as `f64` first avoids spurious failures.
#[derive(Debug, Deserialize)]
struct RawScores {
    severity: f64,
    feasibility: f64,
    competition_gap: f64,
    viability: f64,
    revenue_potential: f64,
    complexity: String,
    explanation: String,
}

/// Strip markdown code fences from a completion.
fn strip_code_fences(response: &str) -> &str {
    response
        .trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

#[allow(clippy::cast_possible_truncation)]
fn clamp_score(value: f64) -> i32 {
    value.round().clamp(0.0, 100.0) as i32
}

/// Parse completion content into [`AnalysisScores`].
///
/// # Errors
///
/// Returns [`ScoringError::Parse`] when no brace-delimited JSON object can
/// be found, the object does not match the schema, or the complexity label
/// is unknown.
pub fn parse_scores(content: &str) -> Result<AnalysisScores, ScoringError> {
    let stripped = strip_code_fences(content);

    let json = JSON_OBJECT_RE
        .find(stripped)
        .map(|m| m.as_str())
        .ok_or_else(|| ScoringError::Parse("no JSON object in completion".to_string()))?;

    let raw: RawScores = serde_json::from_str(json)
        .map_err(|e| ScoringError::Parse(format!("schema mismatch: {e}")))?;

    let complexity = Complexity::parse(&raw.complexity.to_lowercase())
        .ok_or_else(|| ScoringError::Parse(format!("unknown complexity '{}'", raw.complexity)))?;

    Ok(AnalysisScores {
        severity: clamp_score(raw.severity),
        feasibility: clamp_score(raw.feasibility),
        competition_gap: clamp_score(raw.competition_gap),
        viability: clamp_score(raw.viability),
        revenue_potential: clamp_score(raw.revenue_potential),
        complexity,
        explanation: raw.explanation,
    })
}
