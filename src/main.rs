use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use wisata_rec::{
    api::{create_router, AppState, RecommendationLimits},
    config::Config,
    services::providers::{CsvSource, DatasetLocation, DatasetSource},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wisata_rec=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let source: Arc<dyn DatasetSource> = Arc::new(CsvSource::new(
        DatasetLocation::parse(&config.places_source),
        DatasetLocation::parse(&config.ratings_source),
    ));

    // Initialize application state and warm the similarity snapshot
    let state = AppState::new()
        .with_source(source)
        .with_limits(RecommendationLimits::from(&config));
    let snapshot = state.reload().await?;
    tracing::info!(
        version = snapshot.version(),
        users = snapshot.matrix().user_count(),
        places = snapshot.matrix().place_count(),
        "Dataset loaded"
    );

    // Create the router with all routes
    let app = create_router(state);

    // Start the server
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server running");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
