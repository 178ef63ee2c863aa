//! Scoop Node - content sharing HTTP server.

use anyhow::Context;
use clap::Parser;
use scoop_node::{
    api::{create_router, AppState},
    config::{ConfigOverrides, NodeConfig},
    observability::init_logging,
    persistence::SnapshotFile,
};
use scoop_store::ContentStore;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::{net::TcpListener, signal};

/// Scoop Node - users, articles, comments and votes over HTTP
#[derive(Parser, Debug)]
#[command(name = "scoop-node")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Listen host
    #[arg(long)]
    host: Option<String>,

    /// Listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Snapshot file to load at startup and save after each change
    #[arg(long)]
    data_file: Option<PathBuf>,

    /// Never read or write the snapshot file
    #[arg(long)]
    test_mode: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Log format (pretty, json)
    #[arg(long)]
    log_format: Option<String>,
}

impl Args {
    fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            host: self.host.clone(),
            port: self.port,
            data_file: self.data_file.clone(),
            test_mode: self.test_mode.then_some(true),
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let config = NodeConfig::load(args.config.as_deref(), args.overrides())
        .context("failed to load configuration")?;

    init_logging(&config.log_level, config.log_format());
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Scoop node");

    let store = Arc::new(ContentStore::new());
    let mut state = AppState::new(Arc::clone(&store));

    if let Some(path) = config.snapshot_path() {
        let snapshots = SnapshotFile::new(path);
        if let Some(snapshot) = snapshots
            .load()
            .with_context(|| format!("failed to load snapshot {}", snapshots.path().display()))?
        {
            tracing::info!(
                path = %snapshots.path().display(),
                users = snapshot.users.len(),
                articles = snapshot.live_articles(),
                comments = snapshot.live_comments(),
                "Snapshot loaded"
            );
            store.restore(snapshot);
        }
        state = state.with_snapshots(Arc::new(snapshots));
    } else {
        tracing::info!(test_mode = config.test_mode, "Persistence disabled");
    }

    let addr = config.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!(addr = %listener.local_addr()?, "Listening");

    axum::serve(listener, create_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Scoop node stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install signal handler");
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
}
