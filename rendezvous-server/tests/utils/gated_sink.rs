use async_trait::async_trait;
use rendezvous_core::{ConnectionId, ServerEvent};
use rendezvous_server::EventSink;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Notify;

use super::mock_sink::MockEventSink;

/// Recording sink that can hold back the next `existing-users` event until
/// the test releases it, leaving the joining router parked mid-join.
#[derive(Clone, Default)]
pub struct GatedEventSink {
    pub recorded: MockEventSink,
    armed: Arc<AtomicBool>,
    parked: Arc<Notify>,
    release: Arc<Notify>,
}

impl GatedEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stall the next `existing-users` delivery.
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Resolves once a router is stalled on the gate.
    pub async fn wait_parked(&self) {
        self.parked.notified().await;
    }

    pub fn open(&self) {
        self.release.notify_one();
    }
}

#[async_trait]
impl EventSink for GatedEventSink {
    async fn send(&self, to: ConnectionId, event: ServerEvent) {
        if matches!(event, ServerEvent::ExistingUsers(_)) && self.armed.swap(false, Ordering::SeqCst) {
            self.parked.notify_one();
            self.release.notified().await;
        }
        self.recorded.send(to, event).await;
    }
}
