//! Command runners: load config, connect the pool, run one pipeline step.

use helix_core::AppConfig;
use sqlx::PgPool;

async fn setup() -> anyhow::Result<(AppConfig, PgPool)> {
    let config = helix_core::load_app_config_from_env()?;
    let pool_config = helix_db::PoolConfig::from_app_config(&config);
    let pool = helix_db::connect_pool(&config.database_url, pool_config).await?;
    let applied = helix_db::run_migrations(&pool).await?;
    if applied > 0 {
        tracing::info!(applied, "applied pending migrations");
    }
    Ok((config, pool))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn discover() -> anyhow::Result<()> {
    let (config, pool) = setup().await?;
    let outcome = helix_pipeline::run_discovery(&pool, &config).await?;
    print_json(&outcome)
}

pub async fn score() -> anyhow::Result<()> {
    let (config, pool) = setup().await?;
    let outcome = helix_pipeline::run_scoring(&pool, &config).await?;
    print_json(&outcome)
}

pub async fn report() -> anyhow::Result<()> {
    let (config, pool) = setup().await?;
    let outcome = helix_pipeline::run_report(&pool, &config).await?;
    print_json(&outcome)
}

pub async fn run_all() -> anyhow::Result<()> {
    let (config, pool) = setup().await?;
    let summary = helix_pipeline::run_full(&pool, &config).await;
    print_json(&summary)
}

/// Print presence booleans for every configuration variable the service
/// reads. Values are never printed, only whether they are set.
pub fn env() {
    let vars = [
        "DATABASE_URL",
        "HELIX_ENV",
        "HELIX_BIND_ADDR",
        "HELIX_LOG_LEVEL",
        "HELIX_API_KEYS",
        "HELIX_ADMIN_KEYS",
        "HELIX_SEARCH_API_KEY",
        "HELIX_SEARCH_BASE_URL",
        "HELIX_LLM_API_KEY",
        "HELIX_LLM_BASE_URL",
        "HELIX_LLM_MODEL",
        "HELIX_SOURCES_PATH",
        "HELIX_SCORING_BATCH_SIZE",
        "HELIX_REPORT_TOP_N",
        "HELIX_SEARCH_PAGE_SIZE",
        "HELIX_INTER_REQUEST_DELAY_MS",
    ];

    for var in vars {
        let present = std::env::var(var).is_ok_and(|v| !v.is_empty());
        println!("{var}: {}", if present { "set" } else { "missing" });
    }
}
