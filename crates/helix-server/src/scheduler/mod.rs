//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! recurring pipeline job.

use std::sync::Arc;

use sqlx::PgPool;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

/// Builds and starts the background job scheduler.
///
/// Registers the daily pipeline run and starts the scheduler. Returns the
/// running [`JobScheduler`] handle, which must be kept alive for the
/// lifetime of the process — dropping it shuts down all jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a job cannot be registered, or the scheduler fails to start.
pub async fn build_scheduler(
    pool: PgPool,
    config: Arc<helix_core::AppConfig>,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_pipeline_job(&scheduler, pool, config).await?;

    scheduler.start().await?;
    Ok(scheduler)
}

/// Register the daily opportunity-pipeline job.
///
/// Runs every day at 06:00 UTC (`0 0 6 * * *`): discovers new candidates,
/// scores the unscored backlog, and refreshes the daily report. Step
/// failures are captured in the run summary; the job itself never aborts.
async fn register_pipeline_job(
    scheduler: &JobScheduler,
    pool: PgPool,
    config: Arc<helix_core::AppConfig>,
) -> Result<(), JobSchedulerError> {
    let pool = Arc::new(pool);

    let job = Job::new_async("0 0 6 * * *", move |_uuid, _lock| {
        let pool = Arc::clone(&pool);
        let config = Arc::clone(&config);

        Box::pin(async move {
            tracing::info!("scheduler: starting daily pipeline run");
            let summary = helix_pipeline::run_full(&pool, &config).await;
            match serde_json::to_string(&summary) {
                Ok(rendered) => {
                    tracing::info!(summary = %rendered, "scheduler: daily pipeline run complete");
                }
                Err(e) => {
                    tracing::warn!(error = %e, "scheduler: failed to render run summary");
                }
            }
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}
