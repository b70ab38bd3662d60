use rendezvous_core::{ClientEvent, ServerEvent};
use std::time::Duration;

use crate::integration::init_tracing;
use crate::utils::{TestClient, spawn_server};

async fn wait_until(mut check: impl FnMut() -> bool) -> bool {
    for _ in 0..50 {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

#[tokio::test]
async fn test_connection_is_greeted_with_its_handle() {
    init_tracing();
    let (addr, service) = spawn_server().await.expect("server failed to start");

    let client = TestClient::connect(addr).await.expect("connect failed");

    assert!(service.is_connected(&client.connection_id));
    client.close().await.expect("close failed");
}

#[tokio::test]
async fn test_malformed_frames_do_not_kill_the_session() {
    init_tracing();
    let (addr, service) = spawn_server().await.expect("server failed to start");
    let mut client = TestClient::connect(addr).await.expect("connect failed");

    client.send_raw("not json").await.expect("send failed");
    client
        .send_raw(r#"{"event":"join-room","data":{"roomId":"lobby"}}"#)
        .await
        .expect("send failed");
    client
        .send_raw(r#"{"event":"join-room","data":{"roomId":"","participantId":"u1","displayName":"A"}}"#)
        .await
        .expect("send failed");
    client.expect_quiet().await.expect("rejected frames must not be answered");
    assert_eq!(service.registry().room_count(), 0);

    let roster = client.join("lobby", "u1", "Alice").await.expect("join failed");
    assert!(roster.is_empty());
    assert!(service.registry().contains_room("lobby"));
}

#[tokio::test]
async fn test_socket_close_cleans_up_membership() {
    init_tracing();
    let (addr, service) = spawn_server().await.expect("server failed to start");

    let mut alice = TestClient::connect(addr).await.expect("connect failed");
    let mut bob = TestClient::connect(addr).await.expect("connect failed");
    alice.join("lobby", "u1", "Alice").await.expect("join failed");
    bob.join("lobby", "u2", "Bob").await.expect("join failed");
    alice.recv().await.expect("user-connected expected");

    let bob_handle = bob.connection_id;
    bob.close().await.expect("close failed");

    assert_eq!(
        alice.recv().await.expect("user-disconnected expected"),
        ServerEvent::UserDisconnected {
            participant_id: "u2".into()
        }
    );
    alice.expect_quiet().await.expect("exactly one departure notice");

    let registry = service.registry().clone();
    assert!(wait_until(|| registry.participant_count("lobby") == 1).await);
    assert!(wait_until(|| !service.is_connected(&bob_handle)).await);
}

#[tokio::test]
async fn test_leave_event_ends_the_session() {
    init_tracing();
    let (addr, service) = spawn_server().await.expect("server failed to start");

    let mut alice = TestClient::connect(addr).await.expect("connect failed");
    alice.join("lobby", "u1", "Alice").await.expect("join failed");

    alice.send(&ClientEvent::Leave).await.expect("send failed");

    let registry = service.registry().clone();
    assert!(wait_until(|| !registry.contains_room("lobby")).await);
}
