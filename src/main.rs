use anyhow::Result;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kwscout::clock::SystemClock;
use kwscout::config::Config;
use kwscout::storage::open_store;
use kwscout::{api, KeywordService, ServiceSettings};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("kwscout=info")),
        )
        .init();

    // Load configuration
    let config = Config::from_env()?;
    info!("Loaded configuration");

    // Initialize storage
    let store = open_store(&config.storage).await?;
    info!("Storage initialized successfully");

    let service = Arc::new(KeywordService::new(
        store,
        Arc::new(SystemClock),
        ServiceSettings::from(&config),
    ));
    info!(
        "Request governor: {}ms spacing, {} requests per minute",
        config.governor.min_spacing.as_millis(),
        config.governor.max_per_window
    );
    info!(
        "Selected provider: {}",
        service.selected_provider().await
    );

    let router = api::create_api_router(Arc::clone(&service));

    let api_addr = format!("{}:{}", config.api_server.host, config.api_server.port);
    let listener = tokio::net::TcpListener::bind(&api_addr).await?;
    info!("🚀 API server listening on http://{}", api_addr);
    info!("   - API endpoints available at http://{}/api/...", api_addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received");
        })
        .await?;

    service.shutdown().await;
    info!("Server stopped");

    Ok(())
}
