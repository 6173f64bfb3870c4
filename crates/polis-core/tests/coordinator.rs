//! Async tests for the [`Coordinator`] and [`Dispatcher`]: concurrency,
//! publish ordering and the vote timeout.

#![allow(clippy::unwrap_used)]

mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{coordinator, pid, tax_proposal};
use polis_core::{Completion, Dispatcher, SessionError, Task};
use polis_types::{Event, Namespace};
use serde_json::json;

#[tokio::test]
async fn setup_publishes_snapshot_and_caps_population() {
    let (coord, notifier) = coordinator(50, 20);
    coord.setup(json!({})).await.unwrap();

    assert!(coord.is_active().await);
    let sent = notifier.take();
    match &sent[0].event {
        Event::Setup { population, .. } => assert_eq!(population.len(), 20),
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(sent[1].event.name(), "government");
}

#[tokio::test]
async fn repeated_setup_publishes_once() {
    let (coord, notifier) = coordinator(5, 5);
    coord.setup(json!({})).await.unwrap();
    coord.setup(json!({})).await.unwrap();
    let setups = notifier
        .names()
        .into_iter()
        .filter(|name| *name == "setup")
        .count();
    assert_eq!(setups, 1);
}

#[tokio::test]
async fn concurrent_setups_install_one_session() {
    let (coord, notifier) = coordinator(5, 5);
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let coord = Arc::clone(&coord);
            tokio::spawn(async move { coord.setup(json!({})).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    let setups = notifier
        .names()
        .into_iter()
        .filter(|name| *name == "setup")
        .count();
    assert_eq!(setups, 1);
}

#[tokio::test]
async fn observers_never_see_a_half_stepped_month() {
    let (coord, _notifier) = coordinator(5, 5);
    coord.setup(json!({})).await.unwrap();

    let stepper = {
        let coord = Arc::clone(&coord);
        tokio::spawn(async move { coord.step().await })
    };
    let readers: Vec<_> = (0..16)
        .map(|_| {
            let coord = Arc::clone(&coord);
            tokio::spawn(async move {
                coord
                    .inspect(|state| state.simulation().unwrap().days_advanced)
                    .await
            })
        })
        .collect();

    stepper.await.unwrap().unwrap();
    for reader in readers {
        let days = reader.await.unwrap();
        assert!(days == 0 || days == 30, "observed {days} days");
    }
}

#[tokio::test]
async fn step_before_setup_fails_without_publishing() {
    let (coord, notifier) = coordinator(5, 5);
    let err = coord.step().await.unwrap_err();
    assert!(matches!(err, SessionError::NoSession { .. }));
    assert!(notifier.take().is_empty());
    assert_eq!(coord.run(Task::Step).await, Completion::Failed);
}

#[tokio::test]
async fn concurrent_votes_are_all_counted() {
    let (coord, notifier) = coordinator(40, 40);
    coord.setup(json!({})).await.unwrap();
    let players: Vec<_> = (0..30).map(|i| pid(&format!("p{i}"))).collect();
    for player in &players {
        coord.add_player(player.clone()).await.unwrap();
    }
    coord.start_vote(tax_proposal()).await.unwrap();
    notifier.take();

    let handles: Vec<_> = players
        .iter()
        .enumerate()
        .map(|(i, player)| {
            let coord = Arc::clone(&coord);
            let player = player.clone();
            tokio::spawn(async move { coord.record_vote(i % 3 != 0, player).await })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let sent = notifier.take();
    let verdicts: Vec<_> = sent
        .iter()
        .filter_map(|env| match env.event {
            Event::Voted { passed } => Some(passed),
            _ => None,
        })
        .collect();
    assert_eq!(verdicts, vec![true]);
    let status = coord.status().await;
    assert_eq!(status.open_round, None);
    assert_eq!(status.yays + status.nays, 0);
    let applied = coord
        .inspect(|state| state.simulation().unwrap().applied.len())
        .await;
    assert_eq!(applied, 1);
}

#[tokio::test]
async fn add_player_racing_setup_lands_somewhere_consistent() {
    let (coord, _notifier) = coordinator(10, 10);
    let joiners: Vec<_> = (0..6)
        .map(|i| {
            let coord = Arc::clone(&coord);
            tokio::spawn(async move { coord.add_player(pid(&format!("p{i}"))).await })
        })
        .collect();
    let setup = {
        let coord = Arc::clone(&coord);
        tokio::spawn(async move { coord.setup(json!({})).await })
    };
    setup.await.unwrap().unwrap();
    for joiner in joiners {
        joiner.await.unwrap().unwrap();
    }

    let status = coord.status().await;
    assert!(status.queued.is_empty());
    assert_eq!(status.roster.len(), 6);
}

#[tokio::test]
async fn exhausted_population_rejects_the_player() {
    let (coord, notifier) = coordinator(1, 1);
    coord.setup(json!({})).await.unwrap();
    coord.add_player(pid("a")).await.unwrap();
    notifier.take();

    let err = coord.add_player(pid("b")).await.unwrap_err();
    assert!(err.is_capacity());
    let sent = notifier.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].namespace, Namespace::Player);
    assert_eq!(sent[0].target, Some(pid("b")));
    assert!(matches!(sent[0].event, Event::Rejected { .. }));
}

#[tokio::test]
async fn add_client_targets_the_observer() {
    let (coord, notifier) = coordinator(3, 3);
    coord.add_player(pid("a")).await.unwrap();
    notifier.take();

    coord.add_client(&pid("obs")).await;

    let sent = notifier.take();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].target, Some(pid("obs")));
    assert!(sent[0].is_for(Namespace::Simulation, &pid("obs")));
    assert!(!sent[0].is_for(Namespace::Simulation, &pid("other")));
}

#[tokio::test]
async fn inspect_sees_the_locked_state() {
    let (coord, _notifier) = coordinator(4, 4);
    assert!(coord.inspect(|state| state.simulation().is_none()).await);
    coord.setup(json!({})).await.unwrap();
    coord.add_player(pid("a")).await.unwrap();
    let roster = coord.inspect(|state| state.roster().to_vec()).await;
    assert_eq!(roster, vec![pid("a")]);
}

#[tokio::test]
async fn setup_task_starts_a_session() {
    let (coord, _notifier) = coordinator(3, 3);
    let completion = coord
        .execute(Task::Setup {
            config: json!({"tax_rate": 0.5}),
        })
        .await
        .unwrap();
    assert_eq!(completion, Completion::Done);
    assert!(coord.is_active().await);
}

#[tokio::test]
async fn start_vote_task_reports_its_round() {
    let (coord, _notifier) = coordinator(3, 3);
    coord.setup(json!({})).await.unwrap();
    let first = coord
        .run(Task::StartVote {
            proposal: tax_proposal(),
        })
        .await;
    let second = coord
        .run(Task::StartVote {
            proposal: tax_proposal(),
        })
        .await;
    assert_eq!(first, Completion::VoteOpened { round: 1 });
    assert_eq!(second, Completion::VoteOpened { round: 2 });
}

#[tokio::test]
async fn reset_then_setup_starts_fresh() {
    let (coord, notifier) = coordinator(3, 3);
    coord.setup(json!({})).await.unwrap();
    coord.add_player(pid("a")).await.unwrap();
    coord.reset().await;
    assert!(!coord.is_active().await);
    assert!(coord.status().await.roster.is_empty());

    notifier.take();
    coord.setup(json!({})).await.unwrap();
    assert_eq!(notifier.names(), vec!["setup", "government"]);
}

#[tokio::test(start_paused = true)]
async fn dispatcher_closes_ballot_after_timeout() {
    let (coord, notifier) = coordinator(5, 5);
    coord.setup(json!({})).await.unwrap();
    coord.add_player(pid("a")).await.unwrap();
    coord.add_player(pid("b")).await.unwrap();
    let dispatcher = Dispatcher::new(Arc::clone(&coord), Some(Duration::from_secs(30)));

    dispatcher
        .dispatch(Task::StartVote {
            proposal: tax_proposal(),
        })
        .await
        .unwrap();
    dispatcher
        .dispatch(Task::RecordVote {
            vote: true,
            player: pid("a"),
        })
        .await
        .unwrap();
    assert_eq!(coord.status().await.open_round, Some(1));
    notifier.take();

    tokio::time::sleep(Duration::from_secs(31)).await;

    assert_eq!(coord.status().await.open_round, None);
    assert_eq!(notifier.names(), vec!["voted", "government"]);
    let applied = coord
        .inspect(|state| state.simulation().unwrap().applied.len())
        .await;
    assert_eq!(applied, 1);
}

#[tokio::test(start_paused = true)]
async fn stale_timer_leaves_newer_ballot_open() {
    let (coord, _notifier) = coordinator(5, 5);
    coord.setup(json!({})).await.unwrap();
    coord.add_player(pid("a")).await.unwrap();
    coord.add_player(pid("b")).await.unwrap();
    let dispatcher = Dispatcher::new(Arc::clone(&coord), Some(Duration::from_secs(30)));

    dispatcher
        .dispatch(Task::StartVote {
            proposal: tax_proposal(),
        })
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_secs(20)).await;
    coord.end_vote(None).await;
    dispatcher
        .dispatch(Task::StartVote {
            proposal: tax_proposal(),
        })
        .await
        .unwrap();

    // First timer fires at t=30 but targets round 1.
    tokio::time::sleep(Duration::from_secs(15)).await;
    assert_eq!(coord.status().await.open_round, Some(2));

    tokio::time::sleep(Duration::from_secs(20)).await;
    assert_eq!(coord.status().await.open_round, None);
}
