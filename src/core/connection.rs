//! Connection state for one live transport session

use std::collections::HashSet;
use tokio::sync::mpsc;
use warp::ws::Message;
use log::warn;

use crate::core::event::ServerEvent;

/// Represents the relay-side state of a single WebSocket connection
pub struct Connection {
    /// Transport-assigned session id, immutable for the connection lifetime
    pub id: String,
    pub sender: mpsc::UnboundedSender<Message>,
    /// Identity this connection registered, if any
    pub identity: Option<String>,
    /// Names of the rooms this connection currently belongs to
    pub rooms: HashSet<String>,
}

impl Connection {
    pub fn new(id: String, sender: mpsc::UnboundedSender<Message>) -> Self {
        Self {
            id,
            sender,
            identity: None,
            rooms: HashSet::new(),
        }
    }

    /// Serialize and send an event through this connection
    pub fn send_event(&self, event: &ServerEvent) -> bool {
        let text = match serde_json::to_string(event) {
            Ok(text) => text,
            Err(e) => {
                warn!("Failed to serialize event for client {}: {}", self.id, e);
                return false;
            }
        };

        match self.sender.send(Message::text(text)) {
            Ok(_) => true,
            Err(_) => {
                warn!("Failed to send event to client {}", self.id);
                false
            }
        }
    }
}
