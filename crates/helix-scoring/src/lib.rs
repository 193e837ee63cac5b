//! Client for the external LLM completion API that scores candidate ideas,
//! plus the deterministic fallback used when the upstream response cannot
//! be parsed.

mod client;
mod error;
mod extract;
mod fallback;
mod prompt;
mod types;

pub use client::ScoringClient;
pub use error::ScoringError;
pub use extract::parse_scores;
pub use fallback::{fallback_analysis, overall_score};
pub use prompt::build_scoring_prompt;
pub use types::{AnalysisScores, IdeaBrief, ScoredAnalysis};
