//! Main entrypoint for the crisis API service.
//!
//! Loads configuration, wires the director, and serves the router until
//! Ctrl+C.

use anyhow::Context;
use crisis_api::{config::Config, router::create_router, state::AppState};
use crisis_core::CrisisDirector;
use mistral::Mistral;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Listens for Ctrl+C to shut the server down gracefully.
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    info!("Received shutdown signal. Shutting down gracefully...");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;

    let mut client = Mistral::with_timeout(&config.mistral_api_key, config.request_timeout);
    if let Some(ref model) = config.chat_model {
        client = client.with_model(model);
    }
    let director = CrisisDirector::with_client(client);

    let app = create_router(AppState::new(director));

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    info!("crisis-api listening on {}", config.bind_address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    Ok(())
}
