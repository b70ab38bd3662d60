use async_trait::async_trait;
use rendezvous_core::{ConnectionId, ServerEvent};

/// Outbound side of the transport. The router only ever addresses single
/// connections; room fan-out is a loop over handles it already resolved.
///
/// Delivery is best effort: a handle that is no longer connected swallows
/// the event.
#[async_trait]
pub trait EventSink: Send + Sync {
    async fn send(&self, to: ConnectionId, event: ServerEvent);

    async fn send_many(&self, to: &[ConnectionId], event: ServerEvent) {
        for &connection in to {
            self.send(connection, event.clone()).await;
        }
    }
}
