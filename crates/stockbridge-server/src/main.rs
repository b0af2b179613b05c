//! stockbridge-server binary.
//!
//! Reads `config.toml` (or the path specified with `--config`), opens the
//! SQLite shipment store, and serves the tracking API over HTTP.
//!
//! ```
//! cargo run -p stockbridge-server -- --config config.toml
//! ```

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use anyhow::Context as _;
use clap::Parser;
use stockbridge_core::Tracker;
use stockbridge_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Stockbridge shipment tracking server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let server_cfg = stockbridge_server::load_config(&cli.config)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  // Expand `~` in store path.
  let store_path = expand_tilde(Path::new(&server_cfg.store_path));

  let store = SqliteStore::open(&store_path)
    .await
    .with_context(|| format!("failed to open store at {store_path:?}"))?;

  let on_record = store
    .shipment_count()
    .await
    .context("failed to count shipments")?;
  tracing::info!(path = ?store_path, shipments = on_record, "store opened");

  let tracker = Tracker::new(Arc::new(store))
    .with_code_attempts(server_cfg.tracking_code_attempts);

  let app = stockbridge_server::app(Arc::new(tracker), &server_cfg);
  let address = format!("{}:{}", server_cfg.host, server_cfg.port);

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  Ok(())
}

/// Resolve once Ctrl+C is received.
async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!("failed to listen for Ctrl+C: {e}");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
