//! Step 2: score unscored ideas through the completion API.

use std::time::Duration;

use helix_core::AppConfig;
use helix_db::{IdeaRow, NewAnalysis};
use helix_scoring::{fallback_analysis, IdeaBrief, ScoredAnalysis, ScoringClient};
use serde::Serialize;
use sqlx::PgPool;

use crate::PipelineError;

/// Counters reported by one scoring run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScoringOutcome {
    pub examined: u32,
    pub scored: u32,
    pub fallback: u32,
    pub skipped: u32,
}

fn brief_for(idea: &IdeaRow) -> IdeaBrief {
    IdeaBrief {
        title: idea.title.clone(),
        description: idea.description.clone(),
        category: idea.category.clone(),
        estimated_build_weeks: idea.estimated_build_weeks,
        estimated_tech_stack: idea.estimated_tech_stack.clone(),
    }
}

/// Run the scoring step over one batch of unscored ideas.
///
/// For each idea: call the completion API and parse its analysis, falling
/// back to the deterministic formula when the call or parse fails. A
/// database failure (or a lost claim against a concurrent scorer) skips the
/// idea — it stays unscored and a future run picks it up again via the
/// `analysis_id IS NULL` filter. A fixed delay separates API calls.
///
/// # Errors
///
/// Returns [`PipelineError::MissingCredential`] if no LLM API key is
/// configured, [`PipelineError::Scoring`] if the client cannot be
/// constructed, or [`PipelineError::Db`] if the unscored batch cannot be
/// loaded. Per-item failures are absorbed into the outcome counts.
pub async fn run_scoring(
    pool: &PgPool,
    config: &AppConfig,
) -> Result<ScoringOutcome, PipelineError> {
    let api_key = config
        .llm_api_key
        .as_deref()
        .ok_or(PipelineError::MissingCredential("HELIX_LLM_API_KEY"))?;

    let client = match config.llm_base_url.as_deref() {
        Some(base_url) => ScoringClient::with_base_url(
            api_key,
            &config.llm_model,
            config.request_timeout_secs,
            base_url,
        )?,
        None => ScoringClient::new(api_key, &config.llm_model, config.request_timeout_secs)?,
    };

    #[allow(clippy::cast_possible_wrap)]
    let batch = helix_db::list_unscored(pool, config.scoring_batch_size as i64).await?;
    let mut outcome = ScoringOutcome::default();

    tracing::info!(count = batch.len(), "scoring: processing unscored batch");

    for (index, idea) in batch.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(Duration::from_millis(config.inter_request_delay_ms)).await;
        }
        outcome.examined += 1;

        let brief = brief_for(idea);
        let analysis: ScoredAnalysis = match client.analyze(&brief).await {
            Ok(analysis) => analysis,
            Err(e) => {
                tracing::warn!(
                    idea_id = idea.id,
                    error = %e,
                    "scoring: completion failed, using fallback analysis"
                );
                fallback_analysis(&brief)
            }
        };

        let new_analysis = NewAnalysis {
            idea_id: idea.id,
            severity: analysis.scores.severity,
            feasibility: analysis.scores.feasibility,
            competition_gap: analysis.scores.competition_gap,
            viability: analysis.scores.viability,
            revenue_potential: analysis.scores.revenue_potential,
            overall_score: analysis.overall_score,
            complexity: analysis.scores.complexity.as_str().to_string(),
            explanation: analysis.scores.explanation.clone(),
            is_fallback: analysis.is_fallback,
        };

        let analysis_id = match helix_db::insert_analysis(pool, &new_analysis).await {
            Ok(id) => id,
            Err(e) => {
                tracing::error!(idea_id = idea.id, error = %e, "scoring: analysis insert failed, skipping");
                outcome.skipped += 1;
                continue;
            }
        };

        match helix_db::attach_analysis(pool, idea.id, analysis_id).await {
            Ok(true) => {
                outcome.scored += 1;
                if analysis.is_fallback {
                    outcome.fallback += 1;
                }
            }
            Ok(false) => {
                tracing::warn!(
                    idea_id = idea.id,
                    analysis_id,
                    "scoring: lost claim, another writer scored this idea first"
                );
                outcome.skipped += 1;
            }
            Err(e) => {
                tracing::error!(idea_id = idea.id, error = %e, "scoring: attach failed, skipping");
                outcome.skipped += 1;
            }
        }
    }

    tracing::info!(
        examined = outcome.examined,
        scored = outcome.scored,
        fallback = outcome.fallback,
        skipped = outcome.skipped,
        "scoring: run complete"
    );

    Ok(outcome)
}
