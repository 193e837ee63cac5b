//! Deterministic fallback scoring.
//!
//! When the completion API is unreachable or its output cannot be parsed,
//! the pipeline still produces an analysis so the idea ranks in reports.
//! Fallback rows carry `is_fallback = true` so upstream format drift stays
//! observable instead of silently blending in.

use helix_core::Complexity;

use crate::types::{AnalysisScores, IdeaBrief, ScoredAnalysis};

const FALLBACK_SCORE: i32 = 60;
const FALLBACK_REVENUE_POTENTIAL: i32 = 50;

fn complexity_bonus(complexity: Complexity) -> f64 {
    match complexity {
        Complexity::Simple => 100.0,
        Complexity::Medium => 70.0,
        Complexity::Complex => 40.0,
    }
}

/// Weighted overall score, shared by parsed and fallback analyses.
///
/// `overall = 0.25*severity + 0.20*feasibility + 0.20*competition_gap +
/// 0.20*viability + 0.15*complexity_bonus`, rounded half away from zero and
/// clamped to 0-100.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn overall_score(
    severity: i32,
    feasibility: i32,
    competition_gap: i32,
    viability: i32,
    complexity: Complexity,
) -> i32 {
    let weighted = 0.25 * f64::from(severity)
        + 0.20 * f64::from(feasibility)
        + 0.20 * f64::from(competition_gap)
        + 0.20 * f64::from(viability)
        + 0.15 * complexity_bonus(complexity);
    weighted.round().clamp(0.0, 100.0) as i32
}

/// Synthesize the deterministic analysis used when the API path fails.
///
/// Complexity derives from the idea's estimated build weeks; every rubric
/// score is a fixed baseline. Output depends only on the brief.
#[must_use]
pub fn fallback_analysis(brief: &IdeaBrief) -> ScoredAnalysis {
    let complexity = Complexity::from_build_weeks(brief.estimated_build_weeks);
    let scores = AnalysisScores {
        severity: FALLBACK_SCORE,
        feasibility: FALLBACK_SCORE,
        competition_gap: FALLBACK_SCORE,
        viability: FALLBACK_SCORE,
        revenue_potential: FALLBACK_REVENUE_POTENTIAL,
        complexity,
        explanation: format!(
            "Baseline estimate: scored without model assistance from an estimated \
             build time of {} weeks.",
            brief.estimated_build_weeks
        ),
    };
    let overall = overall_score(
        scores.severity,
        scores.feasibility,
        scores.competition_gap,
        scores.viability,
        scores.complexity,
    );

    ScoredAnalysis {
        scores,
        overall_score: overall,
        is_fallback: true,
    }
}
