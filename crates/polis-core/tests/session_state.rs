//! State machine tests for [`SessionState`] driven synchronously.
//!
//! These exercise the registry, lifecycle and voting transitions without a
//! runtime, inspecting both the resulting state and the outbox.

#![allow(clippy::unwrap_used)]

mod common;

use std::collections::BTreeSet;

use common::{FakeSim, pid, tax_proposal};
use polis_core::SessionError;
use polis_core::session::{Outbox, ProposalState, SessionState};
use polis_types::{Event, Namespace};

fn names(outbox: &Outbox) -> Vec<&'static str> {
    outbox.iter().map(|env| env.event.name()).collect()
}

fn active_state(people: usize) -> SessionState<FakeSim> {
    let mut state = SessionState::seeded(3);
    state.install(FakeSim::with_people(people));
    state
}

fn assert_roster_bound(state: &SessionState<FakeSim>) {
    let sim = state.simulation().unwrap();
    let distinct: BTreeSet<_> = state.roster().iter().collect();
    assert_eq!(distinct.len(), state.roster().len(), "duplicate roster ids");
    for player in state.roster() {
        let bound: Vec<_> = sim
            .people
            .iter()
            .filter(|p| p.player.as_ref() == Some(player))
            .collect();
        assert_eq!(bound.len(), 1, "player {player} bound to {} personas", bound.len());
    }
    let bound_total = sim.people.iter().filter(|p| p.is_bound()).count();
    assert_eq!(bound_total, state.roster().len());
}

// =========================================================================
// Registry
// =========================================================================

#[test]
fn players_before_setup_are_queued() {
    let mut state: SessionState<FakeSim> = SessionState::seeded(1);
    let outbox = state.add_player(pid("a")).unwrap();
    assert_eq!(names(&outbox), vec!["joined_queue"]);
    assert_eq!(state.wait_queue(), &[pid("a")]);
    assert!(state.roster().is_empty());
}

#[test]
fn setup_drains_the_queue_into_the_roster() {
    let mut state: SessionState<FakeSim> = SessionState::seeded(1);
    state.add_player(pid("a")).unwrap();
    state.add_player(pid("b")).unwrap();

    let outbox = state.install(FakeSim::with_people(5));

    assert!(state.wait_queue().is_empty());
    assert_eq!(state.roster(), &[pid("a"), pid("b")]);
    assert_roster_bound(&state);
    assert_eq!(
        names(&outbox),
        vec!["setup", "government", "person", "joined", "person", "joined"]
    );
    assert_eq!(outbox[2].target, Some(pid("a")));
    assert_eq!(outbox[2].namespace, Namespace::Player);
    assert_eq!(outbox[3].target, None);
    assert!(matches!(outbox[0].event, Event::Setup { existing: false, .. }));
}

#[test]
fn setup_rejects_queued_players_beyond_population() {
    let mut state: SessionState<FakeSim> = SessionState::seeded(1);
    for id in ["a", "b", "c"] {
        state.add_player(pid(id)).unwrap();
    }
    let outbox = state.install(FakeSim::with_people(2));
    assert_eq!(state.roster().len(), 2);
    assert!(state.wait_queue().is_empty());
    assert!(names(&outbox).contains(&"rejected"));
    assert_roster_bound(&state);
}

#[test]
fn second_setup_is_a_no_op() {
    let mut state = active_state(4);
    state.add_player(pid("a")).unwrap();
    let before = state.simulation().unwrap().people.clone();

    let outbox = state.install(FakeSim::with_people(9));

    assert!(outbox.is_empty());
    assert_eq!(state.simulation().unwrap().people, before);
    assert_eq!(state.roster(), &[pid("a")]);
    assert!(state.wait_queue().is_empty());
}

#[test]
fn add_player_binds_a_persona() {
    let mut state = active_state(3);
    let outbox = state.add_player(pid("a")).unwrap();
    assert_eq!(names(&outbox), vec!["person", "joined"]);
    assert_roster_bound(&state);
}

#[test]
fn duplicate_add_player_is_ignored() {
    let mut state = active_state(3);
    state.add_player(pid("a")).unwrap();
    let outbox = state.add_player(pid("a")).unwrap();
    assert!(outbox.is_empty());
    assert_eq!(state.roster().len(), 1);
    assert_roster_bound(&state);
}

#[test]
fn add_player_reports_exhausted_population() {
    let mut state = active_state(1);
    state.add_player(pid("a")).unwrap();
    let err = state.add_player(pid("b")).unwrap_err();
    assert!(matches!(err, SessionError::NoUnboundPersona { .. }));
    assert!(err.is_capacity());
    assert_eq!(state.roster(), &[pid("a")]);
}

#[test]
fn remove_player_releases_persona() {
    let mut state = active_state(3);
    state.add_player(pid("a")).unwrap();
    let outbox = state.remove_player(&pid("a"));
    assert_eq!(names(&outbox), vec!["left", "votes"]);
    assert!(state.roster().is_empty());
    assert!(state.simulation().unwrap().people.iter().all(|p| !p.is_bound()));
}

#[test]
fn remove_queued_player() {
    let mut state: SessionState<FakeSim> = SessionState::seeded(1);
    state.add_player(pid("a")).unwrap();
    let outbox = state.remove_player(&pid("a"));
    assert_eq!(names(&outbox), vec!["left_queue"]);
    assert!(state.wait_queue().is_empty());
}

#[test]
fn remove_twice_is_idempotent() {
    let mut state = active_state(3);
    state.add_player(pid("a")).unwrap();
    state.remove_player(&pid("a"));
    assert!(state.remove_player(&pid("a")).is_empty());
    assert!(state.remove_player(&pid("nobody")).is_empty());
}

#[test]
fn churn_keeps_roster_consistent() {
    let mut state = active_state(4);
    let ops: [(&str, bool); 12] = [
        ("a", true),
        ("b", true),
        ("a", true),
        ("c", true),
        ("b", false),
        ("d", true),
        ("e", true),
        ("e", true),
        ("a", false),
        ("b", true),
        ("f", true),
        ("c", false),
    ];
    for (id, add) in ops {
        if add {
            let _ = state.add_player(pid(id));
        } else {
            state.remove_player(&pid(id));
        }
        assert_roster_bound(&state);
        assert!(state.wait_queue().is_empty());
    }
}

// =========================================================================
// Lifecycle
// =========================================================================

#[test]
fn step_without_session_is_a_precondition_violation() {
    let mut state: SessionState<FakeSim> = SessionState::seeded(1);
    let err = state.step().unwrap_err();
    assert!(matches!(err, SessionError::NoSession { operation: "step" }));
    assert!(!state.is_active());
}

#[test]
fn step_advances_every_day_of_the_month() {
    let mut state = active_state(3);
    let outbox = state.step().unwrap();
    assert_eq!(state.simulation().unwrap().days_advanced, 30);
    assert_eq!(names(&outbox), vec!["simulation"]);
}

#[test]
fn step_offers_proposals_to_a_rostered_player() {
    let mut state = active_state(3);
    state.add_player(pid("a")).unwrap();
    state.add_player(pid("b")).unwrap();
    let outbox = state.step().unwrap();
    assert_eq!(names(&outbox), vec!["simulation", "propose"]);
    let target = outbox[1].target.clone().unwrap();
    assert!(state.roster().contains(&target));
    assert_eq!(outbox[1].namespace, Namespace::Player);
}

#[test]
fn client_sync_without_session_sends_queue() {
    let mut state: SessionState<FakeSim> = SessionState::seeded(1);
    state.add_player(pid("a")).unwrap();
    let outbox = state.client_sync(&pid("observer"));
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].target, Some(pid("observer")));
    assert_eq!(
        outbox[0].event,
        Event::Init {
            queued_players: vec![pid("a")]
        }
    );
}

#[test]
fn client_sync_with_session_sends_snapshot() {
    let mut state = active_state(3);
    state.add_player(pid("a")).unwrap();
    let outbox = state.client_sync(&pid("observer"));
    assert_eq!(names(&outbox), vec!["setup", "government"]);
    match &outbox[0].event {
        Event::Setup {
            existing,
            population,
            players,
            ..
        } => {
            assert!(*existing);
            assert_eq!(population.len(), 3);
            assert_eq!(players.as_ref().map(Vec::len), Some(1));
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert!(outbox.iter().all(|env| env.target == Some(pid("observer"))));
}

#[test]
fn reset_restores_initial_state() {
    let mut state = active_state(3);
    state.add_player(pid("a")).unwrap();
    state.start_vote(tax_proposal()).unwrap();
    state.record_vote(pid("a"), true);
    state.start_vote(tax_proposal()).unwrap();

    state.reset();
    state.reset();

    assert!(!state.is_active());
    assert!(state.roster().is_empty());
    assert!(state.wait_queue().is_empty());
    assert_eq!(state.proposal(), &ProposalState::Closed);
    assert!(state.ballot().is_empty());
}

// =========================================================================
// Voting
// =========================================================================

#[test]
fn unanimous_yes_applies_the_proposal() {
    let mut state = active_state(5);
    for id in ["a", "b", "c"] {
        state.add_player(pid(id)).unwrap();
    }
    state.start_vote(tax_proposal()).unwrap();
    state.record_vote(pid("a"), true);
    state.record_vote(pid("b"), true);
    let outbox = state.record_vote(pid("c"), true);

    assert_eq!(names(&outbox), vec!["votes", "voted", "government"]);
    assert_eq!(outbox[1].event, Event::Voted { passed: true });
    assert_eq!(state.simulation().unwrap().applied, vec![tax_proposal()]);
    assert!(!state.proposal().is_open());
    assert!(state.ballot().is_empty());
}

#[test]
fn tie_fails() {
    let mut state = active_state(5);
    state.add_player(pid("a")).unwrap();
    state.add_player(pid("b")).unwrap();
    state.start_vote(tax_proposal()).unwrap();
    state.record_vote(pid("a"), true);
    let outbox = state.record_vote(pid("b"), false);

    assert_eq!(outbox[1].event, Event::Voted { passed: false });
    assert!(state.simulation().unwrap().applied.is_empty());
}

#[test]
fn first_vote_wins() {
    let mut state = active_state(5);
    for id in ["a", "b"] {
        state.add_player(pid(id)).unwrap();
    }
    state.start_vote(tax_proposal()).unwrap();
    state.record_vote(pid("a"), true);
    let outbox = state.record_vote(pid("a"), false);

    assert_eq!(state.ballot().len(), 1);
    assert_eq!(state.ballot().get(&pid("a")), Some(true));
    assert_eq!(outbox[0].event, Event::Votes { yays: 1, nays: 0 });
}

#[test]
fn votes_from_unbound_ids_are_dropped() {
    let mut state = active_state(5);
    state.add_player(pid("a")).unwrap();
    state.start_vote(tax_proposal()).unwrap();
    let outbox = state.record_vote(pid("stranger"), true);
    assert!(state.ballot().is_empty());
    assert_eq!(names(&outbox), vec!["votes"]);
    assert!(state.proposal().is_open());
}

#[test]
fn departure_of_non_voter_resolves_the_round() {
    let mut state = active_state(5);
    for id in ["a", "b", "c"] {
        state.add_player(pid(id)).unwrap();
    }
    state.start_vote(tax_proposal()).unwrap();
    state.record_vote(pid("a"), true);
    state.record_vote(pid("b"), true);
    assert!(state.proposal().is_open());

    let outbox = state.remove_player(&pid("c"));

    assert_eq!(names(&outbox), vec!["left", "votes", "voted", "government"]);
    assert_eq!(outbox[2].event, Event::Voted { passed: true });
    assert!(!state.proposal().is_open());
}

#[test]
fn votes_without_an_open_ballot_are_dropped() {
    let mut state = active_state(5);
    state.add_player(pid("a")).unwrap();
    let outbox = state.record_vote(pid("a"), true);
    assert_eq!(names(&outbox), vec!["votes"]);
    assert!(state.ballot().is_empty());

    state.start_vote(tax_proposal()).unwrap();
    state.add_player(pid("b")).unwrap();
    state.record_vote(pid("a"), false);
    assert_eq!(state.ballot().get(&pid("a")), Some(false));
}

#[test]
fn redelivered_vote_does_not_carry_into_the_next_round() {
    let mut state = active_state(5);
    for id in ["a", "b", "c"] {
        state.add_player(pid(id)).unwrap();
    }
    state.start_vote(tax_proposal()).unwrap();
    for id in ["a", "b", "c"] {
        state.record_vote(pid(id), true);
    }
    assert!(!state.proposal().is_open());
    assert_eq!(state.simulation().unwrap().applied.len(), 1);

    // Round 1 vote delivered a second time after resolution.
    state.record_vote(pid("a"), true);
    assert!(state.ballot().is_empty());

    state.start_vote(tax_proposal()).unwrap();
    state.record_vote(pid("a"), false);
    state.record_vote(pid("b"), true);
    let outbox = state.record_vote(pid("c"), false);

    assert_eq!(outbox[1].event, Event::Voted { passed: false });
    assert_eq!(state.simulation().unwrap().applied.len(), 1);
}

#[test]
fn choose_proposer_is_suppressed_while_a_ballot_is_open() {
    let mut state = active_state(5);
    state.add_player(pid("a")).unwrap();
    assert_eq!(names(&state.choose_proposer()), vec!["propose"]);
    assert_eq!(names(&state.choose_proposer()), vec!["propose"]);
    state.start_vote(tax_proposal()).unwrap();
    assert!(state.choose_proposer().is_empty());
}

#[test]
fn choose_proposer_with_empty_roster_is_a_no_op() {
    let mut state = active_state(5);
    assert!(state.choose_proposer().is_empty());
}

#[test]
fn start_vote_overwrites_and_announces_on_both_namespaces() {
    let mut state = active_state(5);
    let (outbox, first) = state.start_vote(tax_proposal()).unwrap();
    assert_eq!(names(&outbox), vec!["vote", "voting"]);
    assert_eq!(outbox[0].namespace, Namespace::Player);
    assert_eq!(outbox[1].namespace, Namespace::Simulation);

    let (_, second) = state.start_vote(tax_proposal()).unwrap();
    assert!(second > first);
    assert_eq!(state.proposal().round(), Some(second));
}

#[test]
fn start_vote_requires_a_session() {
    let mut state: SessionState<FakeSim> = SessionState::seeded(1);
    assert!(matches!(
        state.start_vote(tax_proposal()),
        Err(SessionError::NoSession { .. })
    ));
    assert!(!state.proposal().is_open());
}

#[test]
fn end_vote_without_open_ballot_emits_nothing() {
    let mut state = active_state(5);
    assert!(state.end_vote(None).is_empty());
}

#[test]
fn end_vote_force_resolves_below_quorum() {
    let mut state = active_state(5);
    for id in ["a", "b", "c"] {
        state.add_player(pid(id)).unwrap();
    }
    state.start_vote(tax_proposal()).unwrap();
    state.record_vote(pid("a"), true);

    let outbox = state.end_vote(None);

    assert_eq!(names(&outbox), vec!["voted", "government"]);
    assert_eq!(outbox[0].event, Event::Voted { passed: true });
    assert_eq!(state.simulation().unwrap().applied.len(), 1);
}

#[test]
fn stale_timeout_does_not_close_a_newer_round() {
    let mut state = active_state(5);
    state.add_player(pid("a")).unwrap();
    let (_, first) = state.start_vote(tax_proposal()).unwrap();
    state.end_vote(Some(first));
    let (_, second) = state.start_vote(tax_proposal()).unwrap();

    assert!(state.end_vote(Some(first)).is_empty());
    assert!(state.proposal().is_open());
    assert!(!state.end_vote(Some(second)).is_empty());
}

#[test]
fn abstentions_count_as_failure_on_timeout() {
    let mut state = active_state(5);
    state.add_player(pid("a")).unwrap();
    state.start_vote(tax_proposal()).unwrap();
    let outbox = state.end_vote(None);
    assert_eq!(outbox[0].event, Event::Voted { passed: false });
    assert!(state.simulation().unwrap().applied.is_empty());
}
