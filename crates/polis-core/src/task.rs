//! The trigger surface exposed to external dispatch.
//!
//! Every trigger is one self-contained [`Task`]. Tasks carry no reply
//! channel; their effects surface only as notifications.

use polis_types::{PlayerId, Proposal};
use serde::{Deserialize, Serialize};

/// A unit of work for the coordinator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "task", rename_all = "snake_case")]
pub enum Task {
    /// Create a session if none exists.
    Setup {
        /// Engine configuration overrides.
        #[serde(default = "empty_config")]
        config: serde_json::Value,
    },
    /// Sync a newly connected observer.
    AddClient {
        /// The observer's connection id.
        id: PlayerId,
    },
    /// Advance the simulation by one month.
    Step,
    /// Offer proposal options to a random player.
    ChooseProposer,
    /// Open a ballot on a proposal.
    StartVote {
        /// The proposal put to the vote.
        proposal: Proposal,
    },
    /// Force-resolve the open ballot.
    EndVote {
        /// Only resolve if this round is still open; `None` resolves
        /// whatever is open.
        #[serde(default)]
        round: Option<u64>,
    },
    /// Record a player's vote.
    RecordVote {
        /// Yes (`true`) or no (`false`).
        vote: bool,
        /// The voting player.
        player: PlayerId,
    },
    /// Admit a player (or queue them before setup).
    AddPlayer {
        /// The joining player.
        id: PlayerId,
    },
    /// Release a player's persona.
    RemovePlayer {
        /// The departing player.
        id: PlayerId,
    },
    /// Tear the session down.
    Reset,
}

fn empty_config() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

impl Task {
    /// Short operation name for logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Setup { .. } => "setup",
            Self::AddClient { .. } => "add_client",
            Self::Step => "step",
            Self::ChooseProposer => "choose_proposer",
            Self::StartVote { .. } => "start_vote",
            Self::EndVote { .. } => "end_vote",
            Self::RecordVote { .. } => "record_vote",
            Self::AddPlayer { .. } => "add_player",
            Self::RemovePlayer { .. } => "remove_player",
            Self::Reset => "reset",
        }
    }
}
