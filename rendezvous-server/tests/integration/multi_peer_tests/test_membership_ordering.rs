use rendezvous_core::{ConnectionId, ServerEvent};
use rendezvous_server::{ConnectionRegistry, EventRouter, TracingObserver};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

use crate::integration::init_tracing;
use crate::utils::{GatedEventSink, RelayHarness};

fn replay_view(events: Vec<ServerEvent>) -> BTreeSet<String> {
    let mut view = BTreeSet::new();
    for event in events {
        match event {
            ServerEvent::ExistingUsers(roster) => {
                view = roster.into_iter().map(|p| p.id.to_string()).collect();
            }
            ServerEvent::UserConnected { participant_id, .. } => {
                view.insert(participant_id.to_string());
            }
            ServerEvent::UserDisconnected { participant_id } => {
                view.remove(participant_id.as_str());
            }
            _ => {}
        }
    }
    view
}

/// Alice leaves while Bob's roster is still on its way to him. Bob must hear
/// about the departure after the roster that lists Alice, not before it.
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_departure_during_join_follows_roster() {
    init_tracing();
    let registry = ConnectionRegistry::new();
    let sink = GatedEventSink::new();
    let router = || {
        EventRouter::new(
            ConnectionId::new(),
            registry.clone(),
            Arc::new(sink.clone()),
            Arc::new(TracingObserver),
        )
    };

    let mut alice = router();
    alice
        .join_room("lobby".into(), "u1".into(), "Alice".to_owned())
        .await;

    sink.arm();
    let mut bob = router();
    let bob_connection = bob.connection();
    let joining = tokio::spawn(async move {
        bob.join_room("lobby".into(), "u2".into(), "Bob".to_owned())
            .await;
        bob
    });
    sink.wait_parked().await;

    let leaving = tokio::spawn(async move {
        alice.disconnect().await;
    });
    tokio::time::sleep(Duration::from_millis(50)).await;
    sink.open();

    let _bob = joining.await.unwrap();
    leaving.await.unwrap();

    let names: Vec<String> = sink
        .recorded
        .events_for(bob_connection)
        .await
        .into_iter()
        .map(|event| event.name().to_owned())
        .collect();
    assert_eq!(names, vec!["existing-users", "user-disconnected"]);
    assert!(replay_view(sink.recorded.events_for(bob_connection).await).is_empty());
    assert_eq!(registry.participant_count("lobby"), 1);
}

/// Joins and departures race across worker threads; afterwards every peer
/// still present holds exactly the roster the registry holds.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_final_views_match_registry() {
    init_tracing();
    let harness = Arc::new(RelayHarness::new());

    let tasks: Vec<_> = (0..24)
        .map(|n| {
            let harness = harness.clone();
            tokio::spawn(async move {
                let room = format!("room-{}", n % 3);
                let id = format!("p{n}");
                let mut router = harness.joined(&room, &id, &id).await;
                tokio::task::yield_now().await;
                if n % 2 == 0 {
                    router.disconnect().await;
                    None
                } else {
                    Some((room, router.connection()))
                }
            })
        })
        .collect();

    let mut survivors = Vec::new();
    for task in tasks {
        if let Some(survivor) = task.await.unwrap() {
            survivors.push(survivor);
        }
    }

    assert_eq!(survivors.len(), 12);
    harness.registry.assert_invariants();

    for (room, connection) in survivors {
        let view = replay_view(harness.sink.events_for(connection).await);
        let expected: BTreeSet<String> = harness
            .registry
            .other_participants(&room, connection)
            .iter()
            .map(|p| p.id.to_string())
            .collect();
        assert_eq!(view, expected, "stale roster for {connection} in {room}");
    }
}
