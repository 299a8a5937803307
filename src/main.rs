use anyhow::{Context, Result};
use decoupled_articles::{config, server};
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("decoupled_articles=info".parse()?),
        )
        .init();

    info!("Starting decoupled article listing");

    // Load configuration from environment
    let config = config::Config::from_env()?;
    let port = config.port;

    info!(
        "Serving {} locale(s) (default '{}') from {}",
        config.locales.len(),
        config.default_locale,
        config.backend_url
    );

    let state = Arc::new(server::AppState::from_config(config)?);
    let app = server::router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("✓ Listening on http://{}", addr);
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
