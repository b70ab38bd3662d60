use crate::registry::ConnectionRegistry;
use crate::router::observer::RelayObserver;
use crate::router::session_state::SessionState;
use crate::signaling::EventSink;
use rendezvous_core::{
    ClientEvent, ConnectionId, InboundSignal, ParticipantId, RoomId, ServerEvent,
};
use std::sync::Arc;
use tracing::debug;

/// Handles the inbound events of one connection.
///
/// Owned by the task reading that connection, so events of a single
/// connection are processed strictly in order. All membership state lives in
/// the shared [`ConnectionRegistry`]; the router reads it fresh on every
/// event. Joins and disconnects hold a membership turn while they mutate the
/// registry and queue their notifications.
pub struct EventRouter {
    connection: ConnectionId,
    state: SessionState,
    registry: ConnectionRegistry,
    sink: Arc<dyn EventSink>,
    observer: Arc<dyn RelayObserver>,
}

impl EventRouter {
    pub fn new(
        connection: ConnectionId,
        registry: ConnectionRegistry,
        sink: Arc<dyn EventSink>,
        observer: Arc<dyn RelayObserver>,
    ) -> Self {
        Self {
            connection,
            state: SessionState::Unjoined,
            registry,
            sink,
            observer,
        }
    }

    pub fn connection(&self) -> ConnectionId {
        self.connection
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub async fn handle(&mut self, event: ClientEvent) {
        if self.state.is_terminal() {
            debug!(connection = %self.connection, event = event.name(), "ignoring event after disconnect");
            return;
        }

        match event {
            ClientEvent::JoinRoom {
                room_id,
                participant_id,
                display_name,
            } => self.join_room(room_id, participant_id, display_name).await,
            ClientEvent::Leave => self.disconnect().await,
            other if !self.state.is_joined() => {
                debug!(connection = %self.connection, event = other.name(), "ignoring event before join");
            }
            ClientEvent::Signal(signal) => self.relay_signal(signal).await,
            ClientEvent::ChatMessage {
                room_id,
                message,
                sender_name,
            } => self.chat_message(&room_id, message, sender_name).await,
            ClientEvent::Typing {
                room_id,
                participant_id,
                is_typing,
            } => self.typing(&room_id, participant_id, is_typing).await,
        }
    }

    /// Registers this connection in `room_id`, hands the joiner the current
    /// roster, then announces the joiner to that same roster.
    pub async fn join_room(
        &mut self,
        room_id: RoomId,
        participant_id: ParticipantId,
        display_name: String,
    ) {
        if self.state.is_terminal() {
            return;
        }

        let _turn = self.registry.membership_turn().await;
        let outcome = self.registry.join(
            room_id.clone(),
            participant_id.clone(),
            display_name.clone(),
            self.connection,
        );
        self.state.record_join(room_id.clone(), participant_id.clone());
        self.observer
            .on_join(self.connection, &room_id, &participant_id, outcome.others.len());

        let roster = outcome.others.iter().map(|p| p.summary()).collect();
        self.sink
            .send(self.connection, ServerEvent::ExistingUsers(roster))
            .await;

        let others: Vec<ConnectionId> = outcome.others.iter().map(|p| p.connection).collect();

        if let Some(previous) = outcome.replaced {
            self.sink
                .send_many(
                    &others,
                    ServerEvent::UserDisconnected {
                        participant_id: previous,
                    },
                )
                .await;
        }

        self.sink
            .send_many(
                &others,
                ServerEvent::UserConnected {
                    participant_id,
                    display_name,
                    connection_id: self.connection,
                },
            )
            .await;
    }

    /// Forwards a negotiation payload to exactly one peer. Unreachable
    /// targets are dropped without telling the sender.
    pub async fn relay_signal(&self, signal: InboundSignal) {
        let kind = signal.kind;
        let target = self.registry.resolve_target(self.connection, &signal.to);
        self.observer.on_signal(self.connection, kind, target);

        let Some(target) = target else {
            return;
        };

        self.sink
            .send(target, ServerEvent::Signal(signal.relay_from(self.connection)))
            .await;
    }

    pub async fn chat_message(&self, room_id: &RoomId, message: String, sender_name: String) {
        let Some(others) = self.room_peers(room_id) else {
            return;
        };

        self.sink
            .send_many(
                &others,
                ServerEvent::ChatMessage {
                    message,
                    sender_name,
                },
            )
            .await;
    }

    pub async fn typing(&self, room_id: &RoomId, participant_id: ParticipantId, is_typing: bool) {
        let Some(others) = self.room_peers(room_id) else {
            return;
        };

        self.sink
            .send_many(
                &others,
                ServerEvent::Typing {
                    participant_id,
                    is_typing,
                },
            )
            .await;
    }

    /// Removes every membership of this connection and tells each affected
    /// room. Safe to call repeatedly; only the first call has any effect.
    ///
    /// The registry is consulted even from `Unjoined`, so a fresh router for
    /// the same connection can clean up after one whose task was aborted.
    pub async fn disconnect(&mut self) {
        if self.state.is_terminal() {
            return;
        }
        self.state = SessionState::Terminal;

        let _turn = self.registry.membership_turn().await;
        let departures = self.registry.remove_by_connection(self.connection);
        self.observer.on_disconnect(self.connection, &departures);

        for departure in departures {
            let remaining: Vec<ConnectionId> =
                departure.remaining.iter().map(|p| p.connection).collect();

            self.sink
                .send_many(
                    &remaining,
                    ServerEvent::UserDisconnected {
                        participant_id: departure.participant_id,
                    },
                )
                .await;
        }
    }

    /// Connections to fan a room-scoped event out to, or `None` when this
    /// connection is not a member of the room. Rooms this session never joined
    /// are rejected without touching the registry.
    fn room_peers(&self, room_id: &RoomId) -> Option<Vec<ConnectionId>> {
        let peers = if self.state.has_joined(room_id) {
            self.registry.peers_of(room_id.as_str(), self.connection)
        } else {
            None
        };
        let Some(peers) = peers else {
            debug!(connection = %self.connection, room = %room_id, "ignoring event for a room not joined");
            return None;
        };

        Some(peers.into_iter().map(|p| p.connection).collect())
    }
}
