use crate::error::ProtocolError;
use crate::model::connection::ConnectionId;
use crate::model::participant::{ParticipantId, ParticipantSummary};
use crate::model::room::RoomId;
use crate::model::signaling::{InboundSignal, OutboundSignal};
use serde::{Deserialize, Serialize};

pub const MAX_ID_LEN: usize = 128;
pub const MAX_NAME_LEN: usize = 128;
pub const MAX_MESSAGE_LEN: usize = 16 * 1024;

/// Events a client may send. One JSON envelope per text frame:
/// `{"event": "join-room", "data": {...}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ClientEvent {
    JoinRoom {
        room_id: RoomId,
        participant_id: ParticipantId,
        display_name: String,
    },
    Signal(InboundSignal),
    ChatMessage {
        room_id: RoomId,
        message: String,
        sender_name: String,
    },
    Typing {
        room_id: RoomId,
        participant_id: ParticipantId,
        is_typing: bool,
    },
    /// Explicit goodbye; handled exactly like a dropped socket.
    Leave,
}

impl ClientEvent {
    /// Parses one text frame and checks field constraints.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let event: ClientEvent = serde_json::from_str(text)?;
        event.validate()?;
        Ok(event)
    }

    pub fn validate(&self) -> Result<(), ProtocolError> {
        match self {
            ClientEvent::JoinRoom {
                room_id,
                participant_id,
                display_name,
            } => {
                check_id("roomId", room_id.as_str())?;
                check_id("participantId", participant_id.as_str())?;
                check_len("displayName", display_name, MAX_NAME_LEN)
            }
            ClientEvent::Signal(signal) => check_id("to", signal.to.as_str()),
            ClientEvent::ChatMessage {
                room_id,
                message,
                sender_name,
            } => {
                check_id("roomId", room_id.as_str())?;
                check_len("message", message, MAX_MESSAGE_LEN)?;
                check_len("senderName", sender_name, MAX_NAME_LEN)
            }
            ClientEvent::Typing {
                room_id,
                participant_id,
                ..
            } => {
                check_id("roomId", room_id.as_str())?;
                check_id("participantId", participant_id.as_str())
            }
            ClientEvent::Leave => Ok(()),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ClientEvent::JoinRoom { .. } => "join-room",
            ClientEvent::Signal(_) => "signal",
            ClientEvent::ChatMessage { .. } => "chat-message",
            ClientEvent::Typing { .. } => "typing",
            ClientEvent::Leave => "leave",
        }
    }
}

fn check_id(field: &'static str, value: &str) -> Result<(), ProtocolError> {
    if value.trim().is_empty() {
        return Err(ProtocolError::EmptyField(field));
    }
    check_len(field, value, MAX_ID_LEN)
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ProtocolError> {
    if value.len() > max {
        return Err(ProtocolError::FieldTooLong { field, max });
    }
    Ok(())
}

/// Events the server emits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(
    tag = "event",
    content = "data",
    rename_all = "kebab-case",
    rename_all_fields = "camelCase"
)]
pub enum ServerEvent {
    /// First frame of every session: the handle peers will see as `from`.
    Connected { connection_id: ConnectionId },
    ExistingUsers(Vec<ParticipantSummary>),
    UserConnected {
        participant_id: ParticipantId,
        display_name: String,
        connection_id: ConnectionId,
    },
    Signal(OutboundSignal),
    ChatMessage { message: String, sender_name: String },
    Typing {
        participant_id: ParticipantId,
        is_typing: bool,
    },
    UserDisconnected { participant_id: ParticipantId },
}

impl ServerEvent {
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Connected { .. } => "connected",
            ServerEvent::ExistingUsers(_) => "existing-users",
            ServerEvent::UserConnected { .. } => "user-connected",
            ServerEvent::Signal(_) => "signal",
            ServerEvent::ChatMessage { .. } => "chat-message",
            ServerEvent::Typing { .. } => "typing",
            ServerEvent::UserDisconnected { .. } => "user-disconnected",
        }
    }
}
