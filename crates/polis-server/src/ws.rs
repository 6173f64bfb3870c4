//! `WebSocket` handlers for the two notification namespaces.
//!
//! Each connection is allocated a fresh connection id. Observers connect
//! to `GET /ws/simulation`, which triggers `addClient` so they receive a
//! snapshot. Players connect to `GET /ws/player`, which triggers
//! `addPlayer`; closing the socket triggers `removePlayer`.
//!
//! Every socket subscribes to the shared broadcast channel and forwards
//! the envelopes addressed to its namespace, skipping messages targeted
//! at other connections. Frames are the JSON encoding of
//! [`Event`](polis_types::Event): `{"event": <name>, "data": <payload>}`.
//!
//! Players may send two kinds of frame:
//!
//! - `{"type": "propose", "proposal": {...}}` opens a ballot
//! - `{"type": "vote", "vote": true}` casts a vote

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::IntoResponse;
use polis_core::Task;
use polis_types::{Namespace, PlayerId, Proposal};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, info, warn};

use crate::state::AppState;

/// Inbound frame from a player socket.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Put a proposal to the vote.
    Propose {
        /// The chosen policy change.
        proposal: Proposal,
    },
    /// Vote on the open proposal.
    Vote {
        /// `true` for yes.
        vote: bool,
    },
}

impl ClientMessage {
    /// The coordinator task this frame triggers for `player`.
    pub fn into_task(self, player: &PlayerId) -> Task {
        match self {
            Self::Propose { proposal } => Task::StartVote { proposal },
            Self::Vote { vote } => Task::RecordVote {
                vote,
                player: player.clone(),
            },
        }
    }
}

/// Upgrade to an observer socket.
///
/// # Route
///
/// `GET /ws/simulation`
pub async fn ws_simulation(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state, Namespace::Simulation))
}

/// Upgrade to a player socket.
///
/// # Route
///
/// `GET /ws/player`
pub async fn ws_player(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state, Namespace::Player))
}

/// Drive one connection until either side closes it.
async fn handle_socket(mut socket: WebSocket, state: Arc<AppState>, namespace: Namespace) {
    let id = PlayerId::generate();
    // Subscribe before triggering so the connect-time sync is not missed.
    let mut rx = state.subscribe();
    let join = match namespace {
        Namespace::Simulation => Task::AddClient { id: id.clone() },
        Namespace::Player => Task::AddPlayer { id: id.clone() },
    };
    drop(state.dispatch(join));
    info!(connection = %id, namespace = namespace.path(), "Socket connected");

    loop {
        tokio::select! {
            result = rx.recv() => {
                match result {
                    Ok(envelope) => {
                        if !envelope.is_for(namespace, &id) {
                            continue;
                        }
                        let json = match serde_json::to_string(&envelope.event) {
                            Ok(j) => j,
                            Err(e) => {
                                warn!("Failed to serialize event: {e}");
                                continue;
                            }
                        };
                        if socket.send(Message::Text(json.into())).await.is_err() {
                            debug!(connection = %id, "Socket closed (send failed)");
                            break;
                        }
                    }
                    Err(RecvError::Lagged(n)) => {
                        warn!(connection = %id, skipped = n, "Socket lagged, events dropped");
                    }
                    Err(RecvError::Closed) => {
                        debug!("Broadcast channel closed, shutting down socket");
                        break;
                    }
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Text(text))) if namespace == Namespace::Player => {
                        match serde_json::from_str::<ClientMessage>(text.as_str()) {
                            Ok(message) => drop(state.dispatch(message.into_task(&id))),
                            Err(e) => warn!(connection = %id, error = %e, "Unrecognised frame"),
                        }
                    }
                    Some(Err(e)) => {
                        debug!(connection = %id, "Socket error: {e}");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    if namespace == Namespace::Player {
        drop(state.dispatch(Task::RemovePlayer { id: id.clone() }));
    }
    info!(connection = %id, namespace = namespace.path(), "Socket disconnected");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use polis_types::Industry;
    use serde_json::json;

    use super::*;

    #[test]
    fn vote_frame_becomes_record_vote() {
        let msg: ClientMessage = serde_json::from_value(json!({"type": "vote", "vote": false})).unwrap();
        let player = PlayerId::new("p1");
        assert_eq!(
            msg.into_task(&player),
            Task::RecordVote {
                vote: false,
                player,
            }
        );
    }

    #[test]
    fn propose_frame_becomes_start_vote() {
        let msg: ClientMessage = serde_json::from_value(json!({
            "type": "propose",
            "proposal": {"type": "subsidy", "industry": "healthcare", "value": 200}
        }))
        .unwrap();
        let task = msg.into_task(&PlayerId::new("p1"));
        assert!(matches!(
            task,
            Task::StartVote {
                proposal: Proposal::Subsidy {
                    industry: Industry::Healthcare,
                    ..
                }
            }
        ));
    }

    #[test]
    fn unknown_frames_are_rejected() {
        assert!(serde_json::from_value::<ClientMessage>(json!({"type": "shout"})).is_err());
        assert!(serde_json::from_value::<ClientMessage>(json!({"type": "vote"})).is_err());
    }
}
