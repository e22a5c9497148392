//! Endpoint lifecycle: bind, serve until Ctrl-C

use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use super::routes::create_router;
use crate::application::SnapshotService;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// Serve `/api/tokens` on `addr` until interrupted
pub async fn serve(addr: &str, service: Arc<SnapshotService>) -> Result<(), ServerError> {
    let listener = TcpListener::bind(addr).await.map_err(|source| ServerError::Bind {
        addr: addr.to_string(),
        source,
    })?;

    tracing::info!("Listening on http://{}/api/tokens", addr);

    axum::serve(listener, create_router(service))
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received, stopping server");
            }
        })
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}
