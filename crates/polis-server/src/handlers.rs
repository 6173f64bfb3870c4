//! REST handlers: task triggers and read-only status.
//!
//! Every trigger returns `202 Accepted` as soon as the task is handed to
//! the dispatcher. Outcomes arrive on the sockets, never in the response.
//!
//! # Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `POST` | `/api/tasks` | Run any task (`{"task": "step"}`) |
//! | `POST` | `/api/setup` | Start a session; body is a partial city config |
//! | `POST` | `/api/step` | Simulate one month |
//! | `POST` | `/api/reset` | Tear the session down |
//! | `POST` | `/api/vote/end` | Close the open ballot (`?round=N` optional) |
//! | `GET` | `/api/session` | Session status |
//! | `GET` | `/health` | Liveness |

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use polis_core::Task;
use serde_json::Value;
use tracing::debug;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for `POST /api/vote/end`.
#[derive(Debug, Default, serde::Deserialize)]
pub struct EndVoteQuery {
    /// Only close the ballot if it is this round.
    pub round: Option<u64>,
}

fn accept(state: &AppState, task: Task) -> (StatusCode, Json<Value>) {
    let name = task.name();
    debug!(task = name, "Task accepted");
    drop(state.dispatch(task));
    (
        StatusCode::ACCEPTED,
        Json(serde_json::json!({ "accepted": name })),
    )
}

// ---------------------------------------------------------------------------
// POST /api/tasks
// ---------------------------------------------------------------------------

/// Dispatch an arbitrary task.
pub async fn submit_task(
    State(state): State<Arc<AppState>>,
    Json(task): Json<Task>,
) -> impl IntoResponse {
    accept(&state, task)
}

// ---------------------------------------------------------------------------
// Convenience triggers
// ---------------------------------------------------------------------------

/// Start a session. An empty body means the default configuration.
///
/// # Errors
///
/// Returns [`ApiError`] if the body is not a JSON object.
pub async fn setup(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let config: Value = if body.is_empty() {
        Value::Object(serde_json::Map::new())
    } else {
        serde_json::from_slice(&body)?
    };
    if !config.is_object() {
        return Err(ApiError::BadRequest(String::from(
            "setup config must be a JSON object",
        )));
    }
    Ok(accept(&state, Task::Setup { config }))
}

/// Simulate one month.
pub async fn step(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    accept(&state, Task::Step)
}

/// Tear the session down.
pub async fn reset(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    accept(&state, Task::Reset)
}

/// Close the open ballot.
pub async fn end_vote(
    State(state): State<Arc<AppState>>,
    Query(query): Query<EndVoteQuery>,
) -> impl IntoResponse {
    accept(&state, Task::EndVote { round: query.round })
}

// ---------------------------------------------------------------------------
// GET /api/session, GET /health
// ---------------------------------------------------------------------------

/// Current session status.
pub async fn session(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.coordinator().status().await)
}

/// Liveness probe.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
