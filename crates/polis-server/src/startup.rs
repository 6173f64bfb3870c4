//! Background startup helper.
//!
//! [`spawn_server`] launches the HTTP + `WebSocket` server on a background
//! Tokio task so the binary can run the step scheduler and wait for a
//! shutdown signal alongside it.

use std::sync::Arc;

use tokio::task::JoinHandle;

use crate::server::{ServerConfig, ServerError};
use crate::state::AppState;

/// Errors that can occur when spawning the server.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The server failed to bind or start.
    #[error("server start error: {0}")]
    Server(#[from] ServerError),
}

/// Spawn the server on a background Tokio task.
///
/// The address is validated before spawning so obvious misconfiguration
/// is reported to the caller rather than only logged. The returned handle
/// completes when the server exits.
///
/// # Errors
///
/// Returns [`StartupError::Server`] if the configured address does not
/// parse.
pub fn spawn_server(
    config: ServerConfig,
    state: Arc<AppState>,
) -> Result<JoinHandle<()>, StartupError> {
    let addr = config.socket_addr()?;

    let handle = tokio::spawn(async move {
        if let Err(e) = crate::server::start_server(&config, state).await {
            tracing::error!(error = %e, "Server exited with error");
        }
    });

    tracing::info!(%addr, "Server spawned on background task");

    Ok(handle)
}
