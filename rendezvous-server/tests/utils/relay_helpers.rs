use rendezvous_core::ConnectionId;
use rendezvous_server::{ConnectionRegistry, EventRouter, TracingObserver};
use std::sync::Arc;

use super::mock_sink::MockEventSink;

/// Timeout for waiting on a WebSocket frame (ms).
pub const FRAME_TIMEOUT_MS: u64 = 2000;

/// How long to wait before concluding that no frame is coming (ms).
pub const QUIET_PERIOD_MS: u64 = 200;

/// A registry and a recording sink shared by any number of routers.
pub struct RelayHarness {
    pub registry: ConnectionRegistry,
    pub sink: MockEventSink,
}

impl RelayHarness {
    pub fn new() -> Self {
        Self {
            registry: ConnectionRegistry::new(),
            sink: MockEventSink::new(),
        }
    }

    /// Router for a brand new connection.
    pub fn connect(&self) -> EventRouter {
        self.router_for(ConnectionId::new())
    }

    /// Fresh `Unjoined` router speaking for an existing connection handle.
    pub fn router_for(&self, connection: ConnectionId) -> EventRouter {
        EventRouter::new(
            connection,
            self.registry.clone(),
            Arc::new(self.sink.clone()),
            Arc::new(TracingObserver),
        )
    }

    /// Router whose connection already joined `room` as `id`.
    pub async fn joined(&self, room: &str, id: &str, name: &str) -> EventRouter {
        let mut router = self.connect();
        router
            .join_room(room.into(), id.into(), name.to_owned())
            .await;
        router
    }
}
