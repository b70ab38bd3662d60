use crate::registry::participant::{Departure, JoinOutcome, Participant};
use parking_lot::Mutex;
use rendezvous_core::{ConnectionId, ParticipantId, RoomId, SignalTarget};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

#[derive(Default)]
struct RegistryInner {
    rooms: BTreeMap<RoomId, Vec<Participant>>,
}

/// Room membership for the whole process.
///
/// Every operation takes the lock exactly once, so callers never see a room
/// that is half updated: an emptied room is gone by the time the lock is
/// released. Cloning yields another handle to the same state.
///
/// Membership changes that notify other connections are additionally
/// serialized through [`membership_turn`](Self::membership_turn).
#[derive(Clone, Default)]
pub struct ConnectionRegistry {
    inner: Arc<Mutex<RegistryInner>>,
    membership: Arc<AsyncMutex<()>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive turn for a join or departure and the events it emits.
    ///
    /// The holder mutates the registry and queues every resulting
    /// notification before dropping the guard, so each connection sees joins
    /// and departures in the order they were applied here.
    pub async fn membership_turn(&self) -> OwnedMutexGuard<()> {
        self.membership.clone().lock_owned().await
    }

    /// Adds `participant_id` to `room_id`, creating the room on first use.
    ///
    /// A participant id that is already present is overwritten in place, so a
    /// reconnect from a fresh connection takes over the old record instead of
    /// leaving a ghost behind. A connection occupies at most one entry per
    /// room: if it was present under another id, that entry is dropped and
    /// reported as `replaced`.
    pub fn join(
        &self,
        room_id: RoomId,
        participant_id: ParticipantId,
        display_name: String,
        connection: ConnectionId,
    ) -> JoinOutcome {
        let mut inner = self.inner.lock();
        let members = inner.rooms.entry(room_id).or_default();

        let replaced = members
            .iter()
            .position(|p| p.connection == connection && p.id != participant_id)
            .map(|idx| members.remove(idx).id);

        let record = Participant {
            id: participant_id,
            name: display_name,
            connection,
        };

        match members.iter_mut().find(|p| p.id == record.id) {
            Some(existing) => *existing = record,
            None => members.push(record),
        }

        let others = members
            .iter()
            .filter(|p| p.connection != connection)
            .cloned()
            .collect();

        JoinOutcome { others, replaced }
    }

    /// Members of `room_id` other than the one held by `excluding`.
    pub fn other_participants(&self, room_id: &str, excluding: ConnectionId) -> Vec<Participant> {
        let inner = self.inner.lock();
        inner
            .rooms
            .get(room_id)
            .map(|members| {
                members
                    .iter()
                    .filter(|p| p.connection != excluding)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Like [`other_participants`](Self::other_participants), but `None`
    /// unless `member` itself belongs to the room.
    pub fn peers_of(&self, room_id: &str, member: ConnectionId) -> Option<Vec<Participant>> {
        let inner = self.inner.lock();
        let members = inner.rooms.get(room_id)?;
        if !members.iter().any(|p| p.connection == member) {
            return None;
        }
        Some(
            members
                .iter()
                .filter(|p| p.connection != member)
                .cloned()
                .collect(),
        )
    }

    /// Drops every record held by `connection` and deletes the rooms that
    /// end up empty. Calling it again for the same connection returns nothing.
    pub fn remove_by_connection(&self, connection: ConnectionId) -> Vec<Departure> {
        let mut inner = self.inner.lock();
        let mut departures = Vec::new();

        inner.rooms.retain(|room_id, members| {
            let before = members.len();
            let mut removed = Vec::new();
            members.retain(|p| {
                if p.connection == connection {
                    removed.push(p.id.clone());
                    false
                } else {
                    true
                }
            });

            if members.len() == before {
                return true;
            }

            for participant_id in removed {
                departures.push(Departure {
                    room_id: room_id.clone(),
                    participant_id,
                    remaining: members.clone(),
                });
            }

            !members.is_empty()
        });

        departures
    }

    pub fn find_connection(&self, room_id: &str, participant_id: &str) -> Option<ConnectionId> {
        let inner = self.inner.lock();
        inner
            .rooms
            .get(room_id)?
            .iter()
            .find(|p| p.id.as_str() == participant_id)
            .map(|p| p.connection)
    }

    /// Resolves the destination of a signal sent by `sender`.
    ///
    /// A connection handle counts when it is registered in any room. Anything
    /// else is looked up as a participant id in the rooms `sender` belongs
    /// to, in room order.
    pub fn resolve_target(
        &self,
        sender: ConnectionId,
        target: &SignalTarget,
    ) -> Option<ConnectionId> {
        let inner = self.inner.lock();

        if let Some(handle) = target.as_connection() {
            let registered = inner
                .rooms
                .values()
                .any(|members| members.iter().any(|p| p.connection == handle));
            if registered {
                return Some(handle);
            }
        }

        inner
            .rooms
            .values()
            .filter(|members| members.iter().any(|p| p.connection == sender))
            .flat_map(|members| members.iter())
            .find(|p| p.id.as_str() == target.as_str())
            .map(|p| p.connection)
    }

    pub fn is_member(&self, room_id: &str, connection: ConnectionId) -> bool {
        let inner = self.inner.lock();
        inner
            .rooms
            .get(room_id)
            .is_some_and(|members| members.iter().any(|p| p.connection == connection))
    }

    pub fn rooms_of(&self, connection: ConnectionId) -> Vec<RoomId> {
        let inner = self.inner.lock();
        inner
            .rooms
            .iter()
            .filter(|(_, members)| members.iter().any(|p| p.connection == connection))
            .map(|(room_id, _)| room_id.clone())
            .collect()
    }

    pub fn contains_room(&self, room_id: &str) -> bool {
        self.inner.lock().rooms.contains_key(room_id)
    }

    pub fn room_count(&self) -> usize {
        self.inner.lock().rooms.len()
    }

    pub fn participant_count(&self, room_id: &str) -> usize {
        self.inner.lock().rooms.get(room_id).map_or(0, Vec::len)
    }

    /// Distinct connections holding at least one membership.
    pub fn connection_count(&self) -> usize {
        let inner = self.inner.lock();
        inner
            .rooms
            .values()
            .flat_map(|members| members.iter().map(|p| p.connection))
            .collect::<BTreeSet<_>>()
            .len()
    }

    /// Panics if any structural invariant is broken. Test support only.
    #[doc(hidden)]
    pub fn assert_invariants(&self) {
        let inner = self.inner.lock();
        for (room_id, members) in &inner.rooms {
            assert!(!members.is_empty(), "room {room_id} left behind empty");

            let ids: BTreeSet<_> = members.iter().map(|p| &p.id).collect();
            assert_eq!(ids.len(), members.len(), "duplicate participant id in {room_id}");

            let handles: BTreeSet<_> = members.iter().map(|p| p.connection).collect();
            assert_eq!(handles.len(), members.len(), "duplicate connection in {room_id}");
        }
    }
}
