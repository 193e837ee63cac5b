//! Painpoint-indicator vocabulary and extraction.

/// Phrases that mark a post as describing a real painpoint.
///
/// Matching is case-insensitive substring presence; no phrase outweighs
/// another. A result matching none of these is discarded by the pipeline.
pub const INDICATOR_PHRASES: &[&str] = &[
    "i wish there was",
    "i wish someone would",
    "is there a tool",
    "is there an app",
    "does anyone know a tool",
    "looking for a tool",
    "looking for an app",
    "pain point",
    "biggest pain",
    "so frustrating",
    "frustrated with",
    "annoying to",
    "tedious",
    "waste of time",
    "wasting hours",
    "manual process",
    "manually every",
    "spreadsheet hell",
    "workflow issue",
    "workflow problem",
    "struggling with",
    "struggling to",
    "no good solution",
    "no easy way",
    "hard to manage",
    "hate doing",
    "time consuming",
    "wish i could automate",
];

/// Scan text for painpoint phrases.
///
/// Returns the matched phrases in vocabulary order. An empty result means
/// the candidate carries no painpoint signal and should be discarded.
#[must_use]
pub fn extract_indicators(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    INDICATOR_PHRASES
        .iter()
        .copied()
        .filter(|phrase| lower.contains(phrase))
        .collect()
}
