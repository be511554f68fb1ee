use std::sync::Arc;

use anyhow::Result;
use busboard::{AppState, Config, StrideClient, routes, signal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("busboard=debug,tower_http=info")),
        )
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))?;

    let source = StrideClient::new(&config.api_base, config.timeout)?;
    info!(api_base = %config.api_base, "gtfs route records served by the stride api");

    let app = routes::router(AppState::new(Arc::new(source)));
    let shutdown = signal::bind();

    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    info!("http server starting on {}", config.bind);
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
    {
        error!("http server error: {}", err);
        return Err(err.into());
    }

    info!("http server stopped");
    Ok(())
}
