use crate::registry::ConnectionRegistry;
use crate::router::{EventRouter, RelayObserver, TracingObserver};
use crate::signaling::EventSink;
use async_trait::async_trait;
use axum::extract::ws::Message;
use dashmap::DashMap;
use rendezvous_core::{ConnectionId, ServerEvent};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{debug, error};

struct SignalingInner {
    connections: DashMap<ConnectionId, mpsc::UnboundedSender<Message>>,
    registry: ConnectionRegistry,
    observer: Arc<dyn RelayObserver>,
}

/// Directory of live WebSocket sessions plus the shared room registry.
///
/// Cheap to clone; every clone talks to the same connections.
#[derive(Clone)]
pub struct SignalingService {
    inner: Arc<SignalingInner>,
}

impl SignalingService {
    pub fn new(registry: ConnectionRegistry) -> Self {
        Self::with_observer(registry, Arc::new(TracingObserver))
    }

    pub fn with_observer(registry: ConnectionRegistry, observer: Arc<dyn RelayObserver>) -> Self {
        Self {
            inner: Arc::new(SignalingInner {
                connections: DashMap::new(),
                registry,
                observer,
            }),
        }
    }

    pub fn registry(&self) -> &ConnectionRegistry {
        &self.inner.registry
    }

    pub fn connection_count(&self) -> usize {
        self.inner.connections.len()
    }

    pub fn is_connected(&self, connection: &ConnectionId) -> bool {
        self.inner.connections.contains_key(connection)
    }

    pub fn add_connection(&self, connection: ConnectionId, tx: mpsc::UnboundedSender<Message>) {
        self.inner.connections.insert(connection, tx);
    }

    pub fn remove_connection(&self, connection: &ConnectionId) {
        self.inner.connections.remove(connection);
    }

    /// A fresh router for `connection`, emitting through this service.
    pub fn router_for(&self, connection: ConnectionId) -> EventRouter {
        EventRouter::new(
            connection,
            self.inner.registry.clone(),
            Arc::new(self.clone()),
            self.inner.observer.clone(),
        )
    }

    pub fn send_event(&self, connection: ConnectionId, event: &ServerEvent) {
        let Some(tx) = self.inner.connections.get(&connection) else {
            debug!(%connection, event = event.name(), "dropping event for disconnected connection");
            return;
        };

        match serde_json::to_string(event) {
            Ok(json) => {
                if tx.send(Message::Text(json.into())).is_err() {
                    debug!(%connection, event = event.name(), "connection writer already gone");
                }
            }
            Err(e) => error!("Failed to serialize {} event: {}", event.name(), e),
        }
    }
}

#[async_trait]
impl EventSink for SignalingService {
    async fn send(&self, to: ConnectionId, event: ServerEvent) {
        self.send_event(to, &event);
    }

    async fn send_many(&self, to: &[ConnectionId], event: ServerEvent) {
        for &connection in to {
            self.send_event(connection, &event);
        }
    }
}
