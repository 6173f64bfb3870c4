//! Simulation lifecycle: setup, client sync, monthly step, reset.

use polis_types::{Envelope, Event, Namespace, PlayerId};
use tracing::{debug, info, warn};

use crate::engine::{Simulation, days_in_month};
use crate::error::SessionError;
use crate::session::{Outbox, ProposalState, Session, SessionState, bind_random};

impl<S: Simulation> SessionState<S> {
    /// Install a freshly built simulation as the active session.
    ///
    /// A no-op when a session already exists; `sim` is dropped. Otherwise
    /// announces the full snapshot to observers and drains the wait queue,
    /// binding each queued player to a distinct random persona. Players
    /// that cannot be bound because the population ran out are rejected
    /// and dropped, so the queue is always empty afterwards.
    pub fn install(&mut self, mut sim: S) -> Outbox {
        if self.is_active() {
            debug!("setup ignored: session already active");
            return Outbox::new();
        }

        let mut outbox = vec![
            Envelope::broadcast(
                Namespace::Simulation,
                Event::Setup {
                    existing: false,
                    population: sim.people().to_vec(),
                    buildings: sim.buildings(),
                    players: None,
                },
            ),
            Envelope::broadcast(
                Namespace::Simulation,
                Event::Government(Box::new(sim.government())),
            ),
        ];

        for player in std::mem::take(&mut self.wait_queue) {
            if let Some(persona) = bind_random(&mut sim, &mut self.rng, &player) {
                self.roster.push(player.clone());
                outbox.push(Envelope::to(
                    Namespace::Player,
                    player,
                    Event::Person(Box::new(persona.clone())),
                ));
                outbox.push(Envelope::broadcast(
                    Namespace::Simulation,
                    Event::Joined(Box::new(persona)),
                ));
            } else {
                warn!(player = %player, "queued player dropped: no unbound persona");
                outbox.push(rejection(player));
            }
        }

        info!(
            population = sim.people().len(),
            players = self.roster.len(),
            "Session started"
        );
        self.session = Session::Active(sim);
        outbox
    }

    /// Snapshot for a newly connected observer, addressed to `client`.
    ///
    /// With a session: population, tenants, government and the personas
    /// currently bound to players. Without one: the wait queue.
    pub fn client_sync(&self, client: &PlayerId) -> Outbox {
        match &self.session {
            Session::Active(sim) => {
                let players = sim
                    .people()
                    .iter()
                    .filter(|p| p.player.as_ref().is_some_and(|id| self.roster.contains(id)))
                    .cloned()
                    .collect();
                vec![
                    Envelope::to(
                        Namespace::Simulation,
                        client.clone(),
                        Event::Setup {
                            existing: true,
                            population: sim.people().to_vec(),
                            buildings: sim.buildings(),
                            players: Some(players),
                        },
                    ),
                    Envelope::to(
                        Namespace::Simulation,
                        client.clone(),
                        Event::Government(Box::new(sim.government())),
                    ),
                ]
            }
            Session::Absent => vec![Envelope::to(
                Namespace::Simulation,
                client.clone(),
                Event::Init {
                    queued_players: self.wait_queue.clone(),
                },
            )],
        }
    }

    /// Advance the simulation through the whole current month.
    ///
    /// The day count comes from the simulation's own calendar. Afterwards a
    /// random rostered player, if any, is offered the proposal options.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoSession`] before setup, and
    /// [`SessionError::Calendar`] if the engine reports an impossible month.
    /// Neither mutates state.
    pub fn step(&mut self) -> Result<Outbox, SessionError> {
        let Session::Active(sim) = &mut self.session else {
            return Err(SessionError::NoSession { operation: "step" });
        };
        let (year, month) = sim.year_month();
        let days = days_in_month(year, month)?;
        for _ in 0..days {
            sim.advance_one_day();
        }
        info!(year, month, days, "Simulated month complete");

        let mut outbox = vec![Envelope::broadcast(
            Namespace::Simulation,
            Event::Simulation { success: true },
        )];
        outbox.extend(self.offer_proposals());
        Ok(outbox)
    }

    /// Return every field to its initial empty value.
    pub fn reset(&mut self) {
        self.session = Session::Absent;
        self.proposal = ProposalState::Closed;
        self.ballot.clear();
        self.roster.clear();
        self.wait_queue.clear();
        info!("Session reset");
    }
}

/// Targeted notice that a player could not be given a persona.
pub(crate) fn rejection(player: PlayerId) -> Envelope {
    Envelope::to(
        Namespace::Player,
        player,
        Event::Rejected {
            reason: String::from("no unassigned persona available"),
        },
    )
}
