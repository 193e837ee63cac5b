//! Step 1: discover candidate ideas from forum search results.

use std::time::Duration;

use helix_core::AppConfig;
use helix_db::NewIdea;
use helix_discovery::{extract_indicators, generate_queries, make_dedup_key};
use helix_search::SearchClient;
use serde::Serialize;
use sqlx::PgPool;

use crate::PipelineError;

/// Counters reported by one discovery run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct DiscoveryOutcome {
    pub queries_run: u32,
    pub queries_failed: u32,
    pub results_seen: u32,
    pub discarded_no_indicators: u32,
    pub candidates_inserted: u32,
    pub duplicates_skipped: u32,
}

/// Run the discovery step.
///
/// 1. Generate the fixed query list from the source catalog.
/// 2. Search each query in order, sleeping the configured delay between
///    calls. A failed query is logged and skipped.
/// 3. Scan each result for painpoint indicators; zero matches discards it.
/// 4. Derive the build-weeks and tech-stack heuristics and insert one row
///    per surviving candidate. Duplicate and failed inserts are skipped —
///    inserts are independent and order-independent.
///
/// # Errors
///
/// Returns [`PipelineError::MissingCredential`] if no search API key is
/// configured, [`PipelineError::Config`] if the source catalog fails to
/// load, or [`PipelineError::Search`] if the client cannot be constructed.
/// Per-query and per-insert failures are absorbed into the outcome counts.
pub async fn run_discovery(
    pool: &PgPool,
    config: &AppConfig,
) -> Result<DiscoveryOutcome, PipelineError> {
    let catalog = helix_core::sources::load_sources_or_builtin(&config.sources_path)?;

    let api_key = config
        .search_api_key
        .as_deref()
        .ok_or(PipelineError::MissingCredential("HELIX_SEARCH_API_KEY"))?;

    let client = match config.search_base_url.as_deref() {
        Some(base_url) => SearchClient::with_base_url(api_key, config.request_timeout_secs, base_url)?,
        None => SearchClient::new(api_key, config.request_timeout_secs)?,
    }
    .with_retry_policy(config.max_retries, config.retry_backoff_base_ms);

    let queries = generate_queries(&catalog);
    let mut outcome = DiscoveryOutcome::default();

    tracing::info!(count = queries.len(), "discovery: running query batch");

    for (index, query) in queries.iter().enumerate() {
        if index > 0 {
            tokio::time::sleep(Duration::from_millis(config.inter_request_delay_ms)).await;
        }

        let results = match client.search(&query.text, config.search_page_size).await {
            Ok(results) => results,
            Err(e) => {
                tracing::warn!(query = %query.text, error = %e, "discovery: query failed, skipping");
                outcome.queries_failed += 1;
                continue;
            }
        };
        outcome.queries_run += 1;

        for result in results {
            outcome.results_seen += 1;

            let text = result.combined_text();
            let indicators = extract_indicators(&text);
            if indicators.is_empty() {
                outcome.discarded_no_indicators += 1;
                continue;
            }

            let description = if result.snippet.is_empty() {
                result.title.clone()
            } else {
                result.snippet.clone()
            };

            let idea = NewIdea {
                title: result.title.clone(),
                description: description.clone(),
                source_platform: query.platform.clone(),
                source_url: result.link.clone(),
                dedup_key: make_dedup_key(&result.link),
                indicators: serde_json::json!(indicators),
                category: query.category.clone(),
                estimated_build_weeks: helix_discovery::estimate_build_weeks(&description),
                estimated_tech_stack: helix_discovery::suggest_tech_stack(&description).to_string(),
            };

            match helix_db::insert_idea(pool, &idea).await {
                Ok(Some(id)) => {
                    tracing::debug!(id, url = %idea.source_url, "discovery: candidate inserted");
                    outcome.candidates_inserted += 1;
                }
                Ok(None) => {
                    outcome.duplicates_skipped += 1;
                }
                Err(e) => {
                    tracing::error!(url = %idea.source_url, error = %e, "discovery: insert failed, skipping");
                }
            }
        }
    }

    tracing::info!(
        queries_run = outcome.queries_run,
        queries_failed = outcome.queries_failed,
        inserted = outcome.candidates_inserted,
        duplicates = outcome.duplicates_skipped,
        "discovery: run complete"
    );

    Ok(outcome)
}
