pub use rendezvous_core::{ConnectionId, ParticipantId, RoomId};

pub mod model {
    pub use rendezvous_core::model::*;
    pub use rendezvous_core::ProtocolError;
}

#[cfg(feature = "server")]
pub mod server {
    pub use rendezvous_server::*;
}
