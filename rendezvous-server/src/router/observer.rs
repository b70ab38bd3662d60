use crate::registry::Departure;
use rendezvous_core::{ConnectionId, ParticipantId, RoomId, SignalKind};
use tracing::{debug, info};

/// Extension points around the relay. Every hook defaults to a no-op.
pub trait RelayObserver: Send + Sync {
    fn on_join(
        &self,
        _connection: ConnectionId,
        _room_id: &RoomId,
        _participant_id: &ParticipantId,
        _others: usize,
    ) {
    }

    /// `delivered_to` is `None` when the target could not be resolved and the
    /// signal was dropped.
    fn on_signal(
        &self,
        _from: ConnectionId,
        _kind: SignalKind,
        _delivered_to: Option<ConnectionId>,
    ) {
    }

    fn on_disconnect(&self, _connection: ConnectionId, _departures: &[Departure]) {}
}

/// Writes relay activity as structured `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl RelayObserver for TracingObserver {
    fn on_join(
        &self,
        connection: ConnectionId,
        room_id: &RoomId,
        participant_id: &ParticipantId,
        others: usize,
    ) {
        info!(%connection, room = %room_id, participant = %participant_id, others, "participant joined room");
    }

    fn on_signal(&self, from: ConnectionId, kind: SignalKind, delivered_to: Option<ConnectionId>) {
        match delivered_to {
            Some(to) => debug!(%from, %to, %kind, "relayed signal"),
            None => debug!(%from, %kind, "dropped signal for unreachable target"),
        }
    }

    fn on_disconnect(&self, connection: ConnectionId, departures: &[Departure]) {
        info!(%connection, rooms = departures.len(), "connection closed");
        for departure in departures {
            if departure.remaining.is_empty() {
                info!(room = %departure.room_id, "room is empty and removed");
            } else {
                debug!(
                    room = %departure.room_id,
                    participant = %departure.participant_id,
                    remaining = departure.remaining.len(),
                    "participant left room"
                );
            }
        }
    }
}
