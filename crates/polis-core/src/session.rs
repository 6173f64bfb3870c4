//! The session state machine.
//!
//! [`SessionState`] is the single mutable structure behind the coordinator.
//! Its operations (split across [`lifecycle`](crate::lifecycle),
//! [`registry`](crate::registry) and [`voting`](crate::voting)) are plain
//! synchronous methods: each validates first, then mutates, then returns the
//! [`Outbox`] of notifications describing the outcome. Nothing is published
//! from here, so the caller can release its lock before any I/O.
//!
//! # Invariants
//!
//! - The wait queue is empty whenever a session is active.
//! - Roster ids are distinct and each is bound to exactly one persona.
//! - At most one proposal is open; the ballot is cleared together with it.

use polis_types::{Envelope, Persona, PlayerId, Proposal};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use serde::Serialize;

use crate::ballot::Ballot;
use crate::engine::Simulation;

/// Notifications produced by one operation, in publish order.
pub type Outbox = Vec<Envelope>;

/// Whether a simulation is running.
#[derive(Debug)]
pub enum Session<S> {
    /// No simulation; joining players are queued.
    Absent,
    /// A simulation is running.
    Active(S),
}

/// Whether a ballot is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProposalState {
    /// No ballot is open.
    #[default]
    Closed,
    /// A ballot is open on `proposal`.
    Open {
        /// The proposal being voted on.
        proposal: Proposal,
        /// Monotonic round number, used to match vote timeouts.
        round: u64,
    },
}

impl ProposalState {
    /// Whether a ballot is open.
    pub const fn is_open(&self) -> bool {
        matches!(self, Self::Open { .. })
    }

    /// Round number of the open ballot.
    pub const fn round(&self) -> Option<u64> {
        match self {
            Self::Open { round, .. } => Some(*round),
            Self::Closed => None,
        }
    }
}

/// All mutable coordinator state.
#[derive(Debug)]
pub struct SessionState<S> {
    pub(crate) session: Session<S>,
    pub(crate) roster: Vec<PlayerId>,
    pub(crate) wait_queue: Vec<PlayerId>,
    pub(crate) proposal: ProposalState,
    pub(crate) ballot: Ballot,
    pub(crate) rounds: u64,
    pub(crate) rng: StdRng,
}

impl<S: Simulation> SessionState<S> {
    /// Create an empty state with an OS-seeded random source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// Create an empty state with a deterministic random source.
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            session: Session::Absent,
            roster: Vec::new(),
            wait_queue: Vec::new(),
            proposal: ProposalState::Closed,
            ballot: Ballot::new(),
            rounds: 0,
            rng,
        }
    }

    /// Whether a simulation is running.
    pub const fn is_active(&self) -> bool {
        matches!(self.session, Session::Active(_))
    }

    /// The running simulation, if any.
    pub const fn simulation(&self) -> Option<&S> {
        match &self.session {
            Session::Active(sim) => Some(sim),
            Session::Absent => None,
        }
    }

    /// Players bound to personas, in join order.
    pub fn roster(&self) -> &[PlayerId] {
        &self.roster
    }

    /// Players waiting for a session, in join order.
    pub fn wait_queue(&self) -> &[PlayerId] {
        &self.wait_queue
    }

    /// The open/closed proposal state.
    pub const fn proposal(&self) -> &ProposalState {
        &self.proposal
    }

    /// Votes cast in the current round.
    pub const fn ballot(&self) -> &Ballot {
        &self.ballot
    }

    /// Read-only projection for status endpoints.
    pub fn status(&self) -> SessionStatus {
        let (year, month) = self
            .simulation()
            .map(Simulation::year_month)
            .map_or((None, None), |(y, m)| (Some(y), Some(m)));
        SessionStatus {
            active: self.is_active(),
            year,
            month,
            roster: self.roster.clone(),
            queued: self.wait_queue.clone(),
            open_round: self.proposal.round(),
            yays: self.ballot.yays(),
            nays: self.ballot.nays(),
        }
    }
}

impl<S: Simulation> Default for SessionState<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON-serializable summary of the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    /// Whether a simulation is running.
    pub active: bool,
    /// Simulated year, when active.
    pub year: Option<i32>,
    /// Simulated month, when active.
    pub month: Option<u32>,
    /// Players bound to personas.
    pub roster: Vec<PlayerId>,
    /// Players waiting for a session.
    pub queued: Vec<PlayerId>,
    /// Round number of the open ballot.
    pub open_round: Option<u64>,
    /// Yes votes in the current ballot.
    pub yays: usize,
    /// No votes in the current ballot.
    pub nays: usize,
}

/// Bind `player` to a uniformly random unbound persona of `sim`.
///
/// Returns the persona as it looks after binding, or `None` when every
/// persona is taken.
pub(crate) fn bind_random<S: Simulation>(
    sim: &mut S,
    rng: &mut StdRng,
    player: &PlayerId,
) -> Option<Persona> {
    let free: Vec<_> = sim
        .people()
        .iter()
        .filter(|p| !p.is_bound())
        .map(|p| p.id)
        .collect();
    let chosen = *free.choose(rng)?;
    if !sim.bind_persona(chosen, Some(player.clone())) {
        return None;
    }
    sim.people().iter().find(|p| p.id == chosen).cloned()
}

/// The persona currently bound to `player`.
pub(crate) fn persona_of<'a, S: Simulation>(sim: &'a S, player: &PlayerId) -> Option<&'a Persona> {
    sim.people()
        .iter()
        .find(|p| p.player.as_ref() == Some(player))
}
