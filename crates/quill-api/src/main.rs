//! # quill-api: Binary Entry Point
//!
//! Loads configuration from the environment, starts the Axum HTTP server,
//! and shuts down gracefully on Ctrl-C or SIGTERM.

use anyhow::Context;
use clap::Parser;
use quill_api::state::{AppConfig, AppState};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "quill-api", version, about = "Authenticated comment service")]
struct Cli {
    /// Host or address to bind.
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Port to bind.
    #[arg(long, default_value_t = 8080)]
    port: u16,

    /// Print a random secret suitable for JWT_SECRET and exit.
    #[arg(long)]
    generate_secret: bool,
}

/// Bytes of entropy in a generated secret.
const GENERATED_SECRET_BYTES: usize = 32;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.generate_secret {
        let secret = quill_core::id::generate_secure_token(GENERATED_SECRET_BYTES)
            .map_err(|e| anyhow::anyhow!("failed to generate secret: {e}"))?;
        println!("{secret}");
        return Ok(());
    }

    let config = AppConfig::from_env();
    init_tracing(config.as_ref().map_or(true, AppConfig::is_development));
    let config = config.map_err(|e| {
        tracing::error!("Configuration error: {e}");
        e
    })?;

    let listener = tokio::net::TcpListener::bind((cli.host.as_str(), cli.port))
        .await
        .with_context(|| format!("failed to bind {}:{}", cli.host, cli.port))?;
    tracing::info!(
        addr = %listener.local_addr()?,
        environment = %config.environment,
        database_url = %config.database_url,
        "Quill API listening"
    );

    let state = AppState::new(config);
    let metrics = state.metrics.clone();
    let app = quill_api::app(state);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    let snapshot = metrics.snapshot();
    tracing::info!(
        requests = snapshot.requests,
        client_errors = snapshot.client_errors,
        server_errors = snapshot.server_errors,
        auth_rejections = snapshot.auth_rejections,
        "Quill API stopped"
    );
    Ok(())
}

/// Human-readable logs in development, JSON elsewhere.
fn init_tracing(development: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if development {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received, draining connections");
}
