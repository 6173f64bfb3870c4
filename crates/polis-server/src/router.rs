//! Axum router construction.
//!
//! Assembles all routes (REST + `WebSocket`) into a single [`Router`]
//! with CORS middleware enabled for cross-origin dashboard access.

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;
use crate::ws;

/// Build the complete Axum router.
///
/// The router includes:
/// - `GET /health` -- liveness
/// - `GET /ws/simulation` -- observer socket
/// - `GET /ws/player` -- player socket
/// - `POST /api/tasks` -- dispatch any task
/// - `POST /api/setup`, `/api/step`, `/api/reset`, `/api/vote/end`
/// - `GET /api/session` -- session status
///
/// CORS allows any origin so the dashboard can be served separately.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        // WebSocket
        .route("/ws/simulation", get(ws::ws_simulation))
        .route("/ws/player", get(ws::ws_player))
        // Triggers
        .route("/api/tasks", post(handlers::submit_task))
        .route("/api/setup", post(handlers::setup))
        .route("/api/step", post(handlers::step))
        .route("/api/reset", post(handlers::reset))
        .route("/api/vote/end", post(handlers::end_vote))
        // Status
        .route("/api/session", get(handlers::session))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
