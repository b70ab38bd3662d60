use crate::SignalingService;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use rendezvous_core::{ClientEvent, ConnectionId, ServerEvent};
use tokio::sync::mpsc;
use tracing::{info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: SignalingService) {
    let connection = ConnectionId::new();
    info!(%connection, "New WebSocket connection");

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    service.add_connection(connection, tx);
    service.send_event(
        connection,
        &ServerEvent::Connected {
            connection_id: connection,
        },
    );

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let mut router = service.router_for(connection);

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match ClientEvent::decode(&text) {
                        Ok(ClientEvent::Leave) => break,
                        Ok(event) => router.handle(event).await,
                        Err(e) => warn!(%connection, "Rejected event: {}", e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }

            router.disconnect().await;
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // The reader may have been aborted before it could clean up. Removal is
    // idempotent, so running it again after a clean exit notifies nobody.
    service.router_for(connection).disconnect().await;
    service.remove_connection(&connection);
    info!(%connection, "WebSocket disconnected");
}
