//! Live event stream over WebSocket (PRD-44).
//!
//! `GET /ws` upgrades the connection and forwards every [`SessionEvent`]
//! published on the bus as one JSON text frame. The stream is one-way:
//! inbound messages are drained only to notice the client going away.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use tokio::sync::broadcast;

use argus_events::SessionEvent;

use crate::state::AppState;

/// HTTP handler that upgrades the connection to WebSocket.
///
/// The bus subscription is taken before the upgrade completes so no event
/// published during the handshake is missed.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let receiver = state.bus.subscribe();
    ws.on_upgrade(move |socket| stream_events(socket, receiver))
}

/// Forward bus events to one connected client until either side goes away.
async fn stream_events(socket: WebSocket, mut receiver: broadcast::Receiver<SessionEvent>) {
    tracing::info!("WebSocket event stream connected");

    let (mut sink, mut stream) = socket.split();

    // Sender task: serialize each bus event and push it to the socket.
    let send_task = tokio::spawn(async move {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    let json = match serde_json::to_string(&event) {
                        Ok(json) => json,
                        Err(e) => {
                            tracing::error!(error = %e, "Failed to serialize event for WebSocket");
                            continue;
                        }
                    };
                    if sink.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    // The client fell behind the bus buffer; it keeps the
                    // live stream but has a gap (the journal has the rest).
                    tracing::warn!(skipped, "WebSocket subscriber lagged behind the event bus");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    // Inbound loop: clients send nothing meaningful, but reading is how we
    // observe a close frame or a dropped connection.
    while let Some(result) = stream.next().await {
        match result {
            Ok(Message::Close(_)) | Err(_) => break,
            Ok(_) => {}
        }
    }

    send_task.abort();
    tracing::info!("WebSocket event stream disconnected");
}
