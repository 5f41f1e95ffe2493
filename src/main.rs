use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use flixboard::config::Config;
use flixboard::routes::{create_router, AppState};
use flixboard::services::{CatalogClient, ContentService};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let catalog = CatalogClient::new(
        config.tmdb_api_url.clone(),
        config.tmdb_api_keys.clone(),
        Duration::from_secs(config.upstream_timeout_secs),
    )?;
    let state = AppState {
        content: Arc::new(ContentService::new(catalog)),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, keys = config.tmdb_api_keys.len(), "Server running");
    axum::serve(listener, app).await?;

    Ok(())
}
