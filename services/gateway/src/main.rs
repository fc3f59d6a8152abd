use gateway::config::Config;
use gateway::router::create_router;
use gateway::state::AppState;
use market_data::fetch::HttpFetcher;
use market_data::scheduler::{run_scheduler, SyncJob};
use market_data::store::{FsBlobStore, FsPointerStore};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::watch;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    tracing::info!("Starting market data gateway");

    let config = Config::from_env()?;

    let state = AppState::new(
        Arc::new(FsBlobStore::new(config.blob_dir())),
        Arc::new(FsPointerStore::new(config.pointer_dir())),
    );

    // Scheduled ingestion runs alongside the server and shares its stores.
    let job = SyncJob {
        upstream_url: config.upstream_url.clone(),
        blobs: state.blobs.clone(),
        pointer: state.pointer.clone(),
        fetcher: Arc::new(HttpFetcher::new(reqwest::Client::new())),
        metrics: state.ingest_metrics.clone(),
    };
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = tokio::spawn(run_scheduler(job, config.scheduler(), shutdown_rx));

    let app = create_router(state);

    let listener = TcpListener::bind(&config.bind_addr).await?;

    tracing::info!("Listening on {}", config.bind_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "Failed to listen for shutdown signal");
                std::future::pending::<()>().await;
            }
        })
        .await?;

    tracing::info!("Shutting down ingestion scheduler");
    let _ = shutdown_tx.send(true);
    if let Err(e) = scheduler.await {
        tracing::error!(error = %e, "Ingestion scheduler task failed");
    }

    Ok(())
}
