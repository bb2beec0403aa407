use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use ridepool_api::{app, AppState};
use ridepool_core::identity::PasswordHasher;
use ridepool_store::{Config, FileStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "ridepool_api=debug,ridepool_store=debug,tower_http=debug,axum::rejection=trace".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting RidePool API on port {}", config.server.port);

    let hasher = PasswordHasher::new(config.auth.bcrypt_cost);
    let store = FileStore::open(&config.storage, &hasher)
        .await
        .with_context(|| format!("Failed to open data store at {}", config.storage.data_dir.display()))?;

    let state = AppState::new(Arc::new(store), config.auth.clone(), &config.business_rules)
        .context("Failed to register metrics")?;

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid server address")?;
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
