//! Notification events published to observers and players.
//!
//! Every wire event name has exactly one [`Event`] variant. Serialization
//! is adjacently tagged, so a frame on the wire looks like
//! `{"event": "votes", "data": {"yays": 2, "nays": 1}}` and the `data`
//! object keeps the field names clients already consume.

use serde::{Deserialize, Serialize};

use crate::enums::Namespace;
use crate::ids::PlayerId;
use crate::proposal::Proposal;
use crate::structs::{BuildingView, GovernmentState, Persona};

/// A notification event, tagged by its wire name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "snake_case")]
pub enum Event {
    /// Full simulation snapshot for observers.
    Setup {
        /// `false` when the session was just created, `true` when syncing a
        /// late-connecting client to an existing session.
        existing: bool,
        /// Every persona in the simulation.
        population: Vec<Persona>,
        /// Building topology with tenants.
        buildings: Vec<BuildingView>,
        /// Personas currently bound to players (existing sessions only).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        players: Option<Vec<Persona>>,
    },
    /// Current government state.
    Government(Box<GovernmentState>),
    /// The persona a player has been bound to (targeted).
    Person(Box<Persona>),
    /// A player was bound to this persona.
    Joined(Box<Persona>),
    /// Waiting players, sent to a client connecting before setup.
    Init {
        /// Players queued for the next session.
        queued_players: Vec<PlayerId>,
    },
    /// A player joined the wait queue.
    JoinedQueue {
        /// The queued player.
        id: PlayerId,
    },
    /// A player left and released this persona.
    Left(Box<Persona>),
    /// A queued player left before the session started.
    LeftQueue {
        /// The departed player.
        id: PlayerId,
    },
    /// Proposal options offered to the chosen proposer (targeted).
    Propose {
        /// Options computed by the government model.
        proposals: Vec<Proposal>,
    },
    /// A ballot opened (player namespace).
    Vote {
        /// The proposal being voted on.
        proposal: Proposal,
    },
    /// A ballot opened (observer namespace).
    Voting {
        /// The proposal being voted on.
        proposal: Proposal,
    },
    /// Running tally.
    Votes {
        /// Yes votes recorded so far.
        yays: usize,
        /// No votes recorded so far.
        nays: usize,
    },
    /// A ballot was resolved.
    Voted {
        /// Whether the proposal was enacted.
        passed: bool,
    },
    /// A simulated month finished.
    Simulation {
        /// Always `true`; failures are logged, not published.
        success: bool,
    },
    /// A join request could not be honored (targeted).
    Rejected {
        /// Human-readable reason.
        reason: String,
    },
}

impl Event {
    /// The wire event name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Setup { .. } => "setup",
            Self::Government(_) => "government",
            Self::Person(_) => "person",
            Self::Joined(_) => "joined",
            Self::Init { .. } => "init",
            Self::JoinedQueue { .. } => "joined_queue",
            Self::Left(_) => "left",
            Self::LeftQueue { .. } => "left_queue",
            Self::Propose { .. } => "propose",
            Self::Vote { .. } => "vote",
            Self::Voting { .. } => "voting",
            Self::Votes { .. } => "votes",
            Self::Voted { .. } => "voted",
            Self::Simulation { .. } => "simulation",
            Self::Rejected { .. } => "rejected",
        }
    }
}

/// An event addressed to a namespace, optionally narrowed to one connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Namespace the event is published on.
    pub namespace: Namespace,
    /// Single recipient (a "room"); `None` broadcasts to the namespace.
    pub target: Option<PlayerId>,
    /// The event itself.
    pub event: Event,
}

impl Envelope {
    /// Address an event to every connection on a namespace.
    pub const fn broadcast(namespace: Namespace, event: Event) -> Self {
        Self {
            namespace,
            target: None,
            event,
        }
    }

    /// Address an event to a single connection on a namespace.
    pub const fn to(namespace: Namespace, target: PlayerId, event: Event) -> Self {
        Self {
            namespace,
            target: Some(target),
            event,
        }
    }

    /// Whether a connection with `id` listening on `namespace` should see
    /// this envelope.
    pub fn is_for(&self, namespace: Namespace, id: &PlayerId) -> bool {
        self.namespace == namespace && self.target.as_ref().is_none_or(|target| target == id)
    }
}
