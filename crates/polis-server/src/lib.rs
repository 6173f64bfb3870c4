//! HTTP and `WebSocket` front end for the Polis session coordinator.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **Observer socket** (`/ws/simulation`) streaming simulation-namespace
//!   events to spectator dashboards
//! - **Player socket** (`/ws/player`) binding each connection to a persona
//!   and accepting proposals and votes
//! - **Task endpoints** (`/api/tasks`, `/api/setup`, ...) that trigger
//!   coordinator operations fire-and-forget
//! - **Status endpoints** (`/api/session`, `/health`)
//!
//! # Architecture
//!
//! The coordinator publishes every notification into a
//! [`tokio::sync::broadcast`] channel through [`BroadcastNotifier`]. Each
//! socket subscribes to the channel and forwards only the envelopes
//! addressed to its namespace and, for targeted messages, its connection
//! id. Inbound triggers never wait for the coordinator; they hand a
//! [`Task`](polis_core::Task) to the [`Dispatcher`](polis_core::Dispatcher).

pub mod error;
pub mod handlers;
pub mod notifier;
pub mod router;
pub mod scheduler;
pub mod server;
pub mod startup;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use notifier::BroadcastNotifier;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use startup::{StartupError, spawn_server};
pub use state::AppState;
