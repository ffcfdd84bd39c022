//! Usage value server.
//!
//! Loads the factor configuration, builds the method registry and serves
//! the HTTP API until interrupted.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

use vruchtgebruik_engine::api::{create_router, AppState, RateLimitSettings};
use vruchtgebruik_engine::config::ConfigLoader;

/// Vruchtgebruik usage value service
#[derive(Parser)]
#[command(name = "vruchtgebruik-server")]
#[command(version)]
#[command(about = "HTTP service calculating the usage value of a usufruct")]
struct Cli {
    /// Directory holding age_factor.yaml and factor_methods/
    #[arg(long, env = "VRUCHTGEBRUIK_CONFIG_DIR", default_value = "./config")]
    config_dir: PathBuf,

    /// Address to listen on
    #[arg(long, env = "VRUCHTGEBRUIK_BIND", default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// Requests allowed per client per window (0 disables rate limiting)
    #[arg(long, env = "VRUCHTGEBRUIK_RATE_LIMIT_PERMITS", default_value_t = 10)]
    rate_limit_permits: u32,

    /// Rate limit window length in seconds
    #[arg(long, env = "VRUCHTGEBRUIK_RATE_LIMIT_WINDOW_SECS", default_value_t = 10)]
    rate_limit_window_secs: u64,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_level(true)
        .with_writer(std::io::stderr)
        .init();

    let loader = ConfigLoader::load(&cli.config_dir).with_context(|| {
        format!(
            "failed to load configuration from {}",
            cli.config_dir.display()
        )
    })?;

    let rate_limit = RateLimitSettings {
        permits: cli.rate_limit_permits,
        window: Duration::from_secs(cli.rate_limit_window_secs.max(1)),
    };
    let state = AppState::from_loader(&loader, rate_limit)
        .context("failed to build the factor method registry")?;
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;

    info!(
        address = %cli.bind,
        rate_limit_permits = rate_limit.permits,
        rate_limit_window_secs = rate_limit.window.as_secs(),
        "Server listening"
    );

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => {
            tracing::error!(error = %err, "Unable to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}
