//! Error taxonomy for the session coordinator.
//!
//! [`SessionError`] separates precondition violations (a task triggered
//! in a state where it can never succeed) from recoverable capacity
//! exhaustion. Neither crosses the dispatch boundary: the coordinator logs
//! them and, where a player is waiting on the outcome, publishes a
//! notification.

use std::path::PathBuf;

use polis_types::PlayerId;

/// Errors raised by a simulation engine.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// The population file could not be read.
    #[error("failed to read population file {}: {source}", path.display())]
    PopulationIo {
        /// Path that was read.
        path: PathBuf,
        /// The underlying I/O error.
        source: std::io::Error,
    },

    /// The population file is not a valid persona list.
    #[error("failed to parse population file {}: {source}", path.display())]
    PopulationParse {
        /// Path that was parsed.
        path: PathBuf,
        /// The underlying JSON error.
        source: serde_json::Error,
    },

    /// The engine refused its configuration.
    #[error("invalid engine configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong.
        reason: String,
    },
}

/// Errors raised by a coordinator operation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The operation requires an active session and none exists.
    #[error("{operation} requires an active session")]
    NoSession {
        /// The operation that was attempted.
        operation: &'static str,
    },

    /// Every persona is already bound to a player.
    #[error("no unbound persona left for player {player}")]
    NoUnboundPersona {
        /// The player that could not be admitted.
        player: PlayerId,
    },

    /// The simulation reported a calendar position that does not exist.
    #[error("invalid calendar position {year}-{month:02}")]
    Calendar {
        /// Reported year.
        year: i32,
        /// Reported month (1-12).
        month: u32,
    },

    /// The setup payload could not be decoded into the engine's config.
    #[error("invalid setup config: {source}")]
    InvalidConfig {
        /// The underlying JSON error.
        #[from]
        source: serde_json::Error,
    },

    /// The engine failed while building a simulation.
    #[error("engine error: {source}")]
    Engine {
        /// The underlying engine error.
        #[from]
        source: EngineError,
    },
}

impl SessionError {
    /// Whether the error is a recoverable capacity condition rather than a
    /// precondition violation.
    pub const fn is_capacity(&self) -> bool {
        matches!(self, Self::NoUnboundPersona { .. })
    }
}
