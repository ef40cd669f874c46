//! Wordbook server entry point.
//!
//! Lifecycle: parse config, start logging, open and migrate the store, serve
//! until Ctrl-C/SIGTERM, then close the store.

use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use std::sync::Arc;
use tokio::net::TcpListener;
use wordbook_core::db::{close_db, open_db};
use wordbook_core::{core_version, init_logging};
use wordbook_server::{build_router, AppState, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::parse();

    init_logging(config.effective_log_level(), config.log_dir.as_deref())
        .map_err(anyhow::Error::msg)
        .context("failed to initialize logging")?;

    let conn = open_db(&config.db_path)
        .with_context(|| format!("failed to open word store `{}`", config.db_path.display()))?;

    let state = AppState::new(conn, config.list_order.into());
    let db = state.connection();
    let router = build_router(state);

    let listener = TcpListener::bind(config.bind_addr())
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr()))?;
    let local_addr = listener.local_addr()?;
    info!(
        "event=server_start module=server status=ok addr={local_addr} version={} list_order={:?}",
        core_version(),
        config.list_order
    );

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server terminated with an I/O error")?;

    match Arc::try_unwrap(db) {
        Ok(mutex) => close_db(mutex.into_inner()).context("failed to close word store")?,
        Err(_) => warn!("event=db_close module=server status=skipped reason=connection_still_shared"),
    }
    info!("event=server_stop module=server status=ok");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!("event=signal module=server status=error error={err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!("event=signal module=server status=error error={err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    info!("event=shutdown_requested module=server status=ok");
}
