use rendezvous_core::{ConnectionId, ParticipantId, ParticipantSummary, RoomId};

/// One peer inside one room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    pub id: ParticipantId,
    pub name: String,
    pub connection: ConnectionId,
}

impl Participant {
    pub fn summary(&self) -> ParticipantSummary {
        ParticipantSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            connection_id: self.connection,
        }
    }
}

/// Result of [`ConnectionRegistry::join`](super::ConnectionRegistry::join).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    /// Everyone else in the room, in join order. These are also the
    /// connections that must hear about the newcomer.
    pub others: Vec<Participant>,
    /// Identity this connection previously held in the same room, if it
    /// re-joined under a different participant id.
    pub replaced: Option<ParticipantId>,
}

/// A membership removed by
/// [`ConnectionRegistry::remove_by_connection`](super::ConnectionRegistry::remove_by_connection).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room_id: RoomId,
    pub participant_id: ParticipantId,
    /// Members left in the room right after the removal. Empty when the
    /// room was deleted.
    pub remaining: Vec<Participant>,
}
