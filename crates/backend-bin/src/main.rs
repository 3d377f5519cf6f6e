//! Entry point of the `loginsvc` HTTP server.
use std::path::PathBuf;

use anyhow::Context;
use backend_lib::{
    api,
    auth::DEMO_USERS,
    config::Settings,
    AppState,
};
use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Minimal email/password login service
#[derive(Debug, Parser)]
#[command(name = "loginsvc", version)]
struct Args {
    /// Config file (defaults to ./config.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override `server.host`
    #[arg(long)]
    host: Option<String>,

    /// Override `server.port`
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut settings = match &args.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .context("failed to load configuration")?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }
    settings.validate()?;

    // Initialize tracing; RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let state = AppState::new(settings.clone())
        .await
        .context("failed to initialize application state")?;

    if let Some(period) = settings.session.sweep_interval() {
        state.sessions.spawn_sweeper(period);
        tracing::info!(?period, "expired-session sweep enabled");
    }

    let app = api::create_router(state);

    let listener = TcpListener::bind((settings.server.host.as_str(), settings.server.port))
        .await
        .with_context(|| {
            format!("failed to bind {}:{}", settings.server.host, settings.server.port)
        })?;
    tracing::info!(addr = %listener.local_addr()?, "listening");

    if settings.storage.seed_demo_users {
        for (email, _) in DEMO_USERS {
            tracing::info!(email, "demo account available");
        }
    }

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
