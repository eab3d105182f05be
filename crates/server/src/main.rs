//! Clean Hurghada chat server entry point

use std::net::SocketAddr;

use tracing_subscriber::EnvFilter;

use clean_hurghada_config::{load_settings, Settings};
use clean_hurghada_server::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Priority: env vars > config/{env}.toml > config/default.toml > defaults
    let env = std::env::var("CLEAN_HURGHADA_ENV").ok();
    let settings = match load_settings(env.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            // Tracing not yet initialized, use eprintln for early logging
            eprintln!("Warning: Failed to load config: {}. Using defaults.", e);
            Settings::default()
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = ?settings.environment,
        "Starting Clean Hurghada chat server"
    );

    let addr: SocketAddr = format!("{}:{}", settings.server.host, settings.server.port).parse()?;
    let state = AppState::from_settings(settings)?;
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Listening");
    axum::serve(listener, router).await?;

    Ok(())
}
