//! City Builder - HTTP Server

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use city_server::{AppState, ConfigOverrides, ServerConfig};

#[derive(Parser)]
#[command(name = "city_server")]
#[command(about = "HTTP backend for the browser city builder")]
#[command(version)]
struct Cli {
    /// RON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Address to listen on
    #[arg(long, env = "CITY_BIND_ADDR")]
    bind: Option<SocketAddr>,

    /// Directory for save files
    #[arg(long, env = "CITY_SAVES_DIR")]
    saves_dir: Option<PathBuf>,

    /// Directory served under /static
    #[arg(long, env = "CITY_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    /// Map provider access token for the client
    #[arg(long, env = "MAPBOX_TOKEN", hide_env_values = true)]
    mapbox_token: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "city_server=debug,city_core=debug,tower_http=debug"
    } else {
        "city_server=info,city_core=info,tower_http=info"
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .init();

    tracing::info!("Starting City Builder server");

    let config = match &cli.config {
        Some(path) => ServerConfig::from_ron_file(path)?,
        None => ServerConfig::default(),
    }
    .with_overrides(ConfigOverrides {
        bind_addr: cli.bind,
        saves_dir: cli.saves_dir,
        static_dir: cli.static_dir,
        mapbox_token: cli.mapbox_token,
    });

    let state = AppState::new(&config);
    state
        .saves
        .ensure_dir()
        .with_context(|| format!("cannot create save directory {}", config.saves_dir.display()))?;
    tracing::info!("Saving games to {}", config.saves_dir.display());

    let app = city_server::build_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("cannot bind {}", config.bind_addr))?;
    tracing::info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
