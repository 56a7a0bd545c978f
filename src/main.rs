use anyhow::Context;
use blogfeed::api::{self, app_state::AppState};
use blogfeed::config::loader::ConfigLoader;
use blogfeed::observability::{ObservabilityState, create_observability_router, init_tracing};
use blogfeed::storage::StorageFactory;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ConfigLoader::load().context("failed to load configuration")?;
    ConfigLoader::validate(&config).context("invalid configuration")?;

    let _guard = init_tracing(&config.logging);
    info!(
        "Starting {} ({} environment)...",
        config.app_name, config.environment
    );

    let storage = StorageFactory::create(&config.database)
        .await
        .context("failed to initialise storage")?;
    info!("Storage initialized: {:?}", config.database.backend);

    let app_state = AppState::from_config(storage.clone(), &config);
    info!("Application state created");

    let observability_state = Arc::new(ObservabilityState::new(
        storage,
        env!("CARGO_PKG_VERSION").to_string(),
    ));
    let api_router = api::initialize_api(app_state, &config.server).await?;
    let router = create_observability_router(observability_state).merge(api_router);
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
    }
}
