use rendezvous_core::{ParticipantId, RoomId};
use std::collections::BTreeMap;

/// Lifecycle of one transport session as seen by its router.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Unjoined,
    /// Rooms this connection has joined, with the identity used in each.
    Joined {
        memberships: BTreeMap<RoomId, ParticipantId>,
    },
    /// Disconnected. Nothing else is processed.
    Terminal,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Terminal)
    }

    pub fn is_joined(&self) -> bool {
        matches!(self, SessionState::Joined { .. })
    }

    /// Whether this session ever joined `room_id`. The registry stays the
    /// authority: a takeover from another connection can revoke the entry.
    pub fn has_joined(&self, room_id: &RoomId) -> bool {
        match self {
            SessionState::Joined { memberships } => memberships.contains_key(room_id),
            _ => false,
        }
    }

    pub(crate) fn record_join(&mut self, room_id: RoomId, participant_id: ParticipantId) {
        match self {
            SessionState::Unjoined => {
                *self = SessionState::Joined {
                    memberships: BTreeMap::from([(room_id, participant_id)]),
                };
            }
            SessionState::Joined { memberships } => {
                memberships.insert(room_id, participant_id);
            }
            SessionState::Terminal => {}
        }
    }
}
