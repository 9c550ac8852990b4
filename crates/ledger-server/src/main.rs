//! ledger server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! ledger and the photo directory, registers the configured payers and
//! categories, and serves the JSON API over HTTP.

use std::path::PathBuf;

use anyhow::Context as _;
use clap::Parser;
use ledger_photos::FsPhotoStore;
use ledger_server::{AppState, Overrides, ServerConfig};
use ledger_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Personal expense ledger server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,

  /// SQLite database file; overrides `db_path`.
  #[arg(long)]
  db: Option<PathBuf>,

  /// Base directory for photos; overrides `store_dir`.
  #[arg(long)]
  store: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  let overrides = Overrides { db_path: cli.db, store_dir: cli.store };
  let cfg = ServerConfig::load(&cli.config, &overrides)
    .with_context(|| format!("failed to load configuration from {:?}", cli.config))?;

  let store = SqliteStore::open(&cfg.db_path)
    .await
    .with_context(|| format!("failed to open database at {:?}", cfg.db_path))?;
  tracing::info!(path = %cfg.db_path.display(), "database opened");

  if !cfg.seed.is_empty() {
    let added = store.seed(&cfg.seed).await.context("failed to seed reference data")?;
    tracing::info!(added, "reference data seeded");
  }

  let photos = FsPhotoStore::open(&cfg.store_dir)
    .await
    .with_context(|| format!("failed to open photo store under {:?}", cfg.store_dir))?;

  let app = ledger_server::router(AppState::new(store, photos)).layer(TraceLayer::new_for_http());
  let address = cfg.address();

  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;
  tracing::info!("Listening on http://{address}");

  axum::serve(listener, app)
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

  tracing::info!("server stopped");
  Ok(())
}

/// Resolve on SIGINT or, on unix, SIGTERM.
async fn shutdown_signal() {
  let ctrl_c = async {
    if let Err(e) = tokio::signal::ctrl_c().await {
      tracing::error!(error = %e, "could not listen for ctrl-c");
      std::future::pending::<()>().await;
    }
  };

  #[cfg(unix)]
  let terminate = async {
    use tokio::signal::unix::{SignalKind, signal};
    match signal(SignalKind::terminate()) {
      Ok(mut sigterm) => {
        sigterm.recv().await;
      }
      Err(e) => {
        tracing::error!(error = %e, "could not listen for SIGTERM");
        std::future::pending::<()>().await;
      }
    }
  };

  #[cfg(not(unix))]
  let terminate = std::future::pending::<()>();

  tokio::select! {
    () = ctrl_c => {}
    () = terminate => {}
  }
  tracing::info!("shutdown signal received, draining connections");
}
