//! tagrank server binary.

use anyhow::{Context, Result};
use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tagrank_server::settings::{self, CONFIG_PATH_ENV};
use tagrank_server::{AppState, create_router};
use tagrank_source::{StackExchangeSource, TagSource};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// tagrank - StackOverflow tag popularity service
#[derive(Parser, Debug)]
#[command(name = "tagrankd")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file (optional; defaults apply when absent)
    #[arg(
        short,
        long,
        env = CONFIG_PATH_ENV,
        default_value = "config/server.toml"
    )]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let args = Args::parse();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("tagrank v{}", env!("CARGO_PKG_VERSION"));

    let config = settings::load_config(Path::new(&args.config))?;

    // Register Prometheus metrics
    if config.server.metrics_enabled {
        tagrank_server::metrics::register_metrics();
        tracing::info!("Prometheus metrics registered");
    }

    // Initialize tag store
    let store = tagrank_store::from_config(&config.store)
        .await
        .context("failed to initialize tag store")?;
    store
        .health_check()
        .await
        .context("tag store health check failed")?;
    tracing::info!("Tag store initialized");

    // Seed the stored-tags gauge from whatever survived the last run
    let stored = store
        .count_tags()
        .await
        .context("failed to count stored tags")?;
    tagrank_server::metrics::TAGS_STORED.set(i64::try_from(stored).unwrap_or(i64::MAX));

    // Initialize remote tag source
    let source = StackExchangeSource::new(&config.source).context("failed to build tag source")?;
    tracing::info!(endpoint = %source.endpoint(), "Tag source configured");
    let source: Arc<dyn TagSource> = Arc::new(source);

    let addr: SocketAddr = config.server.bind.parse().context("invalid bind address")?;

    let state = AppState::new(config, store, source);
    let app = create_router(state);

    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind to {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

/// Resolve on Ctrl-C.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down HTTP server");
}
