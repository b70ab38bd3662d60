mod connection;
mod event;
mod participant;
mod room;
mod signaling;

pub use connection::ConnectionId;
pub use event::{ClientEvent, MAX_ID_LEN, MAX_MESSAGE_LEN, MAX_NAME_LEN, ServerEvent};
pub use participant::{ParticipantId, ParticipantSummary};
pub use room::RoomId;
pub use signaling::{InboundSignal, OutboundSignal, SignalKind, SignalTarget};
