pub mod connection_tests;
pub mod multi_peer_tests;

use rendezvous_core::{ParticipantSummary, ServerEvent};
use tracing::Level;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_test_writer()
        .try_init();
}

/// Participant ids of an `existing-users` event.
pub fn roster_ids(event: &ServerEvent) -> Vec<String> {
    match event {
        ServerEvent::ExistingUsers(roster) => summary_ids(roster),
        other => panic!("expected existing-users, got {other:?}"),
    }
}

pub fn summary_ids(roster: &[ParticipantSummary]) -> Vec<String> {
    roster.iter().map(|p| p.id.to_string()).collect()
}
