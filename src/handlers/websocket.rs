use tokio::sync::mpsc;
use futures_util::stream::StreamExt;
use futures_util::sink::SinkExt;
use warp::ws::{Message, WebSocket};
use uuid::Uuid;
use log::{error, info, warn};

use crate::core::event::{ClientEvent, ForwardRequest, ServerEvent};
use crate::core::relay::SharedRelay;

// Handle a WebSocket connection
pub async fn handle_ws_client(ws: WebSocket, relay: SharedRelay) {
    let (mut ws_tx, mut ws_rx) = ws.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    // Spawn a task to forward messages from our channel to the WebSocket
    tokio::task::spawn(async move {
        while let Some(message) = rx.recv().await {
            if let Err(e) = ws_tx.send(message).await {
                error!("Failed to send WebSocket message: {}", e);
                break;
            }
        }
    });

    // Generate a unique session ID
    let session_id = Uuid::new_v4().to_string();

    relay.connect(session_id.clone(), tx).await;
    info!("Client connected: {}", session_id);
    info!("Current connections: {}", relay.connection_count().await);

    // Handle incoming events
    while let Some(result) = ws_rx.next().await {
        match result {
            Ok(msg) => {
                // Only process text frames
                if msg.is_text() {
                    process_event(msg, &session_id, &relay).await;
                }
            }
            Err(e) => {
                error!("WebSocket error: {}", e);
                break;
            }
        }
    }

    // Client disconnected
    relay.disconnect(&session_id).await;
    info!("Client disconnected: {}", session_id);
    info!("Current connections: {}", relay.connection_count().await);
}

// Parse and dispatch an incoming frame
async fn process_event(msg: Message, session_id: &str, relay: &SharedRelay) {
    let text = match msg.to_str() {
        Ok(text) => text,
        Err(_) => {
            warn!("Failed to extract text from message");
            return;
        }
    };

    // Malformed events are a no-op; relay input must never bring the server down
    let event = match serde_json::from_str::<ClientEvent>(text) {
        Ok(event) => event,
        Err(e) => {
            warn!("Failed to parse event from {}: {}", session_id, e);
            return;
        }
    };

    match event {
        ClientEvent::Register { identity } => {
            relay.register(session_id, &identity).await;
        }
        ClientEvent::Join { room } => {
            relay.join(session_id, &room).await;
        }
        ClientEvent::Signal(request) => {
            let ForwardRequest { room, to, payload } = request;
            relay
                .forward(
                    session_id,
                    to.as_deref(),
                    room.as_deref(),
                    ServerEvent::Signal { payload },
                )
                .await;
        }
        ClientEvent::Auth(request) => {
            let ForwardRequest { room, to, payload } = request;
            relay
                .forward(
                    session_id,
                    to.as_deref(),
                    room.as_deref(),
                    ServerEvent::Auth { payload },
                )
                .await;
        }
        ClientEvent::RequestConnection { to, from, from_label } => {
            relay.request_connection(&to, from, from_label).await;
        }
        ClientEvent::AcceptConnection { to, from } => {
            relay.accept_connection(&to, from).await;
        }
        ClientEvent::RejectConnection { to, from } => {
            relay.reject_connection(&to, from).await;
        }
    }
}
