//! Player registry: admitting, queuing and removing players.

use polis_types::{Envelope, Event, Namespace, PlayerId};
use tracing::{debug, info, warn};

use crate::engine::Simulation;
use crate::error::SessionError;
use crate::session::{Outbox, Session, SessionState, bind_random, persona_of};

impl<S: Simulation> SessionState<S> {
    /// Admit `player`.
    ///
    /// With a session the player is bound to a random unbound persona and
    /// joins the roster; without one they join the wait queue. A player
    /// already on the roster or in the queue is left alone.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoUnboundPersona`] when every persona is
    /// taken. State is unchanged in that case.
    pub fn add_player(&mut self, player: PlayerId) -> Result<Outbox, SessionError> {
        if self.roster.contains(&player) || self.wait_queue.contains(&player) {
            debug!(player = %player, "add_player ignored: already registered");
            return Ok(Outbox::new());
        }

        match &mut self.session {
            Session::Active(sim) => {
                let persona = bind_random(sim, &mut self.rng, &player)
                    .ok_or_else(|| SessionError::NoUnboundPersona {
                        player: player.clone(),
                    })?;
                self.roster.push(player.clone());
                info!(player = %player, persona = %persona.id, "Player joined");
                Ok(vec![
                    Envelope::to(
                        Namespace::Player,
                        player,
                        Event::Person(Box::new(persona.clone())),
                    ),
                    Envelope::broadcast(Namespace::Simulation, Event::Joined(Box::new(persona))),
                ])
            }
            Session::Absent => {
                self.wait_queue.push(player.clone());
                info!(player = %player, queued = self.wait_queue.len(), "Player queued");
                Ok(vec![Envelope::broadcast(
                    Namespace::Simulation,
                    Event::JoinedQueue { id: player },
                )])
            }
        }
    }

    /// Remove `player` from the roster or the wait queue.
    ///
    /// Leaving the roster releases the persona and re-evaluates the open
    /// ballot, since quorum is the roster size. Unknown players are
    /// ignored.
    pub fn remove_player(&mut self, player: &PlayerId) -> Outbox {
        if let Some(pos) = self.roster.iter().position(|id| id == player) {
            self.roster.remove(pos);
            let mut outbox = Outbox::new();
            if let Session::Active(sim) = &mut self.session {
                let released = persona_of(sim, player).map(|p| p.id);
                match released {
                    Some(persona) => {
                        sim.bind_persona(persona, None);
                        if let Some(p) = sim.people().iter().find(|p| p.id == persona) {
                            outbox.push(Envelope::broadcast(
                                Namespace::Simulation,
                                Event::Left(Box::new(p.clone())),
                            ));
                        }
                    }
                    None => warn!(player = %player, "departing player had no bound persona"),
                }
            }
            info!(player = %player, remaining = self.roster.len(), "Player left");
            outbox.extend(self.tally());
            return outbox;
        }

        if let Some(pos) = self.wait_queue.iter().position(|id| id == player) {
            self.wait_queue.remove(pos);
            info!(player = %player, "Queued player left");
            return vec![Envelope::broadcast(
                Namespace::Simulation,
                Event::LeftQueue { id: player.clone() },
            )];
        }

        debug!(player = %player, "remove_player ignored: not registered");
        Outbox::new()
    }
}
