//! Proposal and vote coordination.
//!
//! A round moves `Idle -> ProposerChosen -> Open -> Resolved -> Idle`.
//! Choosing a proposer is advisory and never opens a ballot; only
//! [`start_vote`](SessionState::start_vote) does. A ballot resolves when
//! the number of distinct votes reaches the roster size, or when the
//! timeout path forces it.

use polis_types::{Envelope, Event, Namespace, PlayerId, Proposal};
use rand::seq::IndexedRandom;
use tracing::{debug, info};

use crate::engine::Simulation;
use crate::error::SessionError;
use crate::session::{Outbox, ProposalState, Session, SessionState};

impl<S: Simulation> SessionState<S> {
    /// Offer the proposal options to a random rostered player.
    ///
    /// A no-op when the roster is empty or a ballot is already open.
    pub fn choose_proposer(&mut self) -> Outbox {
        if self.proposal.is_open() {
            debug!("choose_proposer ignored: ballot already open");
            return Outbox::new();
        }
        self.offer_proposals().into_iter().collect()
    }

    /// Targeted `propose` for a random rostered player, if there is one.
    pub(crate) fn offer_proposals(&mut self) -> Option<Envelope> {
        let Session::Active(sim) = &self.session else {
            return None;
        };
        let proposer = self.roster.choose(&mut self.rng)?.clone();
        info!(proposer = %proposer, "Proposer chosen");
        Some(Envelope::to(
            Namespace::Player,
            proposer,
            Event::Propose {
                proposals: sim.proposal_options(),
            },
        ))
    }

    /// Open a ballot on `proposal`, replacing any open one.
    ///
    /// Returns the notifications and the new round number.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoSession`] before setup.
    pub fn start_vote(&mut self, proposal: Proposal) -> Result<(Outbox, u64), SessionError> {
        if !self.is_active() {
            return Err(SessionError::NoSession {
                operation: "start_vote",
            });
        }
        self.rounds = self.rounds.saturating_add(1);
        let round = self.rounds;
        info!(round, proposal = %proposal, "Ballot opened");
        self.proposal = ProposalState::Open {
            proposal: proposal.clone(),
            round,
        };
        let outbox = vec![
            Envelope::broadcast(
                Namespace::Player,
                Event::Vote {
                    proposal: proposal.clone(),
                },
            ),
            Envelope::broadcast(Namespace::Simulation, Event::Voting { proposal }),
        ];
        Ok((outbox, round))
    }

    /// Record `vote` for `player` and re-evaluate the tally.
    ///
    /// Only rostered players may vote, only while a ballot is open, and
    /// only once per round; anything else is dropped. The tally is
    /// re-evaluated either way.
    pub fn record_vote(&mut self, player: PlayerId, vote: bool) -> Outbox {
        if !self.proposal.is_open() {
            debug!(player = %player, "vote dropped: no open ballot");
        } else if !self.roster.contains(&player) {
            debug!(player = %player, "vote dropped: player not on roster");
        } else if !self.ballot.record(player.clone(), vote) {
            debug!(player = %player, "vote dropped: already voted");
        }
        self.tally()
    }

    /// Publish the running counts and resolve on quorum.
    pub fn tally(&mut self) -> Outbox {
        let mut outbox = vec![Envelope::broadcast(
            Namespace::Simulation,
            Event::Votes {
                yays: self.ballot.yays(),
                nays: self.ballot.nays(),
            },
        )];
        if self.proposal.is_open() && self.ballot.len() >= self.roster.len() {
            outbox.extend(self.resolve());
        }
        outbox
    }

    /// Force-resolve the open ballot.
    ///
    /// With `round` set, only that round is resolved, so a timer armed for
    /// an earlier ballot cannot close a later one.
    pub fn end_vote(&mut self, round: Option<u64>) -> Outbox {
        match (self.proposal.round(), round) {
            (None, _) => {
                debug!("end_vote ignored: no open ballot");
                Outbox::new()
            }
            (Some(open), Some(wanted)) if open != wanted => {
                debug!(open, wanted, "end_vote ignored: round already resolved");
                Outbox::new()
            }
            (Some(_), _) => {
                info!("Ballot closed by timeout");
                self.resolve()
            }
        }
    }

    /// Apply or discard the open proposal and clear the ballot.
    fn resolve(&mut self) -> Outbox {
        let ProposalState::Open { proposal, round } =
            std::mem::replace(&mut self.proposal, ProposalState::Closed)
        else {
            return Outbox::new();
        };
        let passed = self.ballot.passes();
        let tally = self.ballot.signed_sum();
        self.ballot.clear();

        let mut outbox = vec![Envelope::broadcast(
            Namespace::Simulation,
            Event::Voted { passed },
        )];
        if let Session::Active(sim) = &mut self.session {
            if passed {
                sim.apply_proposal(&proposal);
            }
            outbox.push(Envelope::broadcast(
                Namespace::Simulation,
                Event::Government(Box::new(sim.government())),
            ));
        }
        info!(round, tally, passed, "Ballot resolved");
        outbox
    }
}
