//! Ferry Risk Server
//!
//! Trains the initial classifier, starts continuous training in the
//! background and serves predictions over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ferry_risk::config::Config;
use ferry_risk::constants::{APP_NAME, APP_VERSION};
use ferry_risk::logic::{trainer, TrainerContext, TrainerHandle};
use ferry_risk::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "ferry_risk=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing::info!("{} v{} starting...", APP_NAME, APP_VERSION);
    tracing::info!("Environment: {}", config.environment);

    let trainer_ctx = Arc::new(TrainerContext::new(config.trainer_config()));

    // First cycle before accepting requests; on failure requests get 503 until a cycle succeeds
    if let Err(e) = trainer::bootstrap(&trainer_ctx).await {
        tracing::warn!("Initial training failed, serving 'not ready' until next cycle: {}", e);
    }

    let trainer_handle = TrainerHandle::spawn(Arc::clone(&trainer_ctx));

    let state = AppState {
        trainer: trainer_ctx,
        config: config.clone(),
    };
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Stopping training...");
    trainer_handle.stop().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
