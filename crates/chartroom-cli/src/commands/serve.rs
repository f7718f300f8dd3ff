//! Serve command - run the HTTP server

use std::sync::Arc;

use crate::commands::{ConfigArgs, build_discovery};
use crate::error::{CliError, Result};
use crate::server::{AppState, router};

/// Run the serve command until interrupted
pub async fn run(args: &ConfigArgs) -> Result<()> {
    let config = args.resolve()?;
    let discovery = build_discovery(&config)?;

    tracing::info!(
        root = ?config.storage.local_root_dir,
        backend = %config.storage.backend,
        allow_list_repos = config.features.allow_list_repos,
        strategies = ?discovery.strategy_names(),
        "repository discovery configured"
    );

    let address = config.listen.address();
    let app = router(Arc::new(AppState::new(config, discovery)));

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .map_err(|e| CliError::server(format!("cannot bind {}: {}", address, e)))?;
    tracing::info!("listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CliError::server(e.to_string()))?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("cannot listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
