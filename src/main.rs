use lottolabs::config::config;
use lottolabs::db::init_db;
use lottolabs::api::router;
use lottolabs::state::AppState;
use lottolabs::scheduler;
use tokio::net::TcpListener;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let conf = config();
    let utc_offset = conf.utc_offset();
    tracing::info!(port = conf.port, offset = %utc_offset, "Starting LOTTO Labs fortune service");

    let pool = init_db(&conf.db_path).await?;

    let sched_pool = pool.clone();
    let sched = JobScheduler::new().await?;

    sched.add(
        Job::new_async(conf.quota_reset_cron.as_str(), move |_uuid, _l| {
            let p = sched_pool.clone();
            Box::pin(async move {
                if let Err(e) = scheduler::run_daily_reset(p, utc_offset).await {
                    tracing::error!(error = ?e, "Daily quota reset failed");
                }
            })
        })?
    ).await?;
    sched.start().await?;

    let state = AppState {
        pool,
        utc_offset,
    };

    let app = router(state);
    let addr = format!("0.0.0.0:{}", conf.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server bound");

    axum::serve(listener, app).await?;

    Ok(())
}
