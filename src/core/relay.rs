//! Integrated relay service that coordinates connections, identities and rooms
//!
//! All shared state lives behind a single lock; each operation holds it for
//! its full duration, so every map mutation is atomic relative to the
//! forwarding decisions of concurrently dispatched handlers. Outbound
//! delivery is an unbounded channel send and never blocks under the lock.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use warp::ws::Message as WsMessage;
use log::{debug, info};

use crate::core::connection::Connection;
use crate::core::event::ServerEvent;
use crate::core::registry::IdentityRegistry;
use crate::core::room::RoomManager;
use crate::error::RelayError;

struct RelayState {
    connections: HashMap<String, Connection>,
    registry: IdentityRegistry,
    rooms: RoomManager,
}

/// The relay core: every inbound event resolves to at most one direct
/// delivery or one room broadcast, never both.
pub struct Relay {
    state: RwLock<RelayState>,
}

impl Relay {
    /// Create a new relay with the given room capacity
    pub fn new(max_room_size: usize) -> Self {
        Self {
            state: RwLock::new(RelayState {
                connections: HashMap::new(),
                registry: IdentityRegistry::new(),
                rooms: RoomManager::new(max_room_size),
            }),
        }
    }

    /// Track a newly accepted connection
    pub async fn connect(&self, session_id: String, sender: mpsc::UnboundedSender<WsMessage>) {
        let connection = Connection::new(session_id.clone(), sender);
        self.state
            .write()
            .await
            .connections
            .insert(session_id, connection);
    }

    /// Announce the identity this session answers to.
    ///
    /// Best-effort: an empty identity is ignored, and a prior mapping for
    /// the same identity is overwritten without notice (last write wins).
    pub async fn register(&self, session_id: &str, identity: &str) {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        if let Some(normalized) = state.registry.register(identity, session_id) {
            info!("Registered identity {} for session {}", normalized, session_id);
            if let Some(connection) = state.connections.get_mut(session_id) {
                // A superseded identity must stop resolving, or forwards
                // addressed to it would never fall through to the room
                if let Some(old) = connection.identity.take() {
                    if old != normalized {
                        state.registry.unregister(&old, session_id);
                    }
                }
                connection.identity = Some(normalized);
            }
        }
    }

    /// Join a room, notifying existing members or refusing at capacity.
    ///
    /// On success every other member receives `peer-joined`; when the room
    /// is full only the requester is told, via `room-full`, and membership
    /// is left untouched.
    pub async fn join(&self, session_id: &str, room: &str) {
        if room.is_empty() {
            debug!("Ignoring join with empty room name from {}", session_id);
            return;
        }

        let mut guard = self.state.write().await;
        let state = &mut *guard;

        match state.rooms.join(room, session_id) {
            Ok(()) => {
                if let Some(connection) = state.connections.get_mut(session_id) {
                    connection.rooms.insert(room.to_string());
                }
                info!("Session {} joined room {}", session_id, room);

                let event = ServerEvent::PeerJoined {
                    peer_id: session_id.to_string(),
                };
                for member in state.rooms.members(room) {
                    if member == session_id {
                        continue;
                    }
                    if let Some(connection) = state.connections.get(member) {
                        connection.send_event(&event);
                    }
                }
            }
            Err(RelayError::RoomFull) => {
                info!("Room {} is full, refusing session {}", room, session_id);
                if let Some(connection) = state.connections.get(session_id) {
                    connection.send_event(&ServerEvent::RoomFull {
                        room: room.to_string(),
                    });
                }
            }
            Err(_) => {}
        }
    }

    /// Forward an opaque payload event from a connection.
    ///
    /// A resolvable `to` identity always takes precedence: the event goes to
    /// exactly that connection and `room` is ignored. An unresolved `to`
    /// falls through to the room broadcast (excluding the sender) when a
    /// room is named. With neither, the event is dropped.
    pub async fn forward(
        &self,
        sender_id: &str,
        to: Option<&str>,
        room: Option<&str>,
        event: ServerEvent,
    ) {
        let state = self.state.read().await;

        if let Some(to) = to {
            if let Some(target) = state.registry.resolve(to) {
                if let Some(connection) = state.connections.get(target) {
                    connection.send_event(&event);
                }
                return;
            }
            debug!("Delivery miss: identity {} is not registered", to);
        }

        if let Some(room) = room {
            for member in state.rooms.members(room) {
                if member == sender_id {
                    continue;
                }
                if let Some(connection) = state.connections.get(member) {
                    connection.send_event(&event);
                }
            }
        }
    }

    /// Forward a connection request to a registered identity
    pub async fn request_connection(&self, to: &str, from: String, from_label: Option<String>) {
        let delivered = self
            .send_to_identity(to, ServerEvent::IncomingRequest { from: from.clone(), from_label })
            .await;
        if delivered {
            info!("Connection requested: {} -> {}", from, to);
        }
    }

    /// Forward an accept back to the requesting identity
    pub async fn accept_connection(&self, to: &str, from: String) {
        let delivered = self
            .send_to_identity(to, ServerEvent::RequestAccepted { from: from.clone() })
            .await;
        if delivered {
            info!("Connection accepted: {} -> {}", from, to);
        }
    }

    /// Forward a reject back to the requesting identity
    pub async fn reject_connection(&self, to: &str, from: String) {
        let delivered = self
            .send_to_identity(to, ServerEvent::RequestRejected { from: from.clone() })
            .await;
        if delivered {
            info!("Connection rejected: {} -> {}", from, to);
        }
    }

    /// Remove a disconnected session and fan out `peer-left` to its rooms.
    ///
    /// Cleanup is best-effort and never fails, even when the state was
    /// already partially cleaned.
    pub async fn disconnect(&self, session_id: &str) {
        let mut guard = self.state.write().await;
        let state = &mut *guard;

        let connection = match state.connections.remove(session_id) {
            Some(connection) => connection,
            None => return,
        };

        if let Some(identity) = &connection.identity {
            state.registry.unregister(identity, session_id);
        }

        let event = ServerEvent::PeerLeft {
            peer_id: session_id.to_string(),
        };
        for room in &connection.rooms {
            // Skip the transport's private per-session channel
            if room == session_id {
                continue;
            }
            state.rooms.leave(room, session_id);
            for member in state.rooms.members(room) {
                if let Some(remaining) = state.connections.get(member) {
                    remaining.send_event(&event);
                }
            }
        }
    }

    /// Get the current connection count
    pub async fn connection_count(&self) -> usize {
        self.state.read().await.connections.len()
    }

    /// Deliver one event to the connection a registered identity resolves
    /// to. Misses are terminal: logged, never retried, never surfaced to
    /// the sender.
    async fn send_to_identity(&self, to: &str, event: ServerEvent) -> bool {
        let state = self.state.read().await;

        match state.registry.resolve(to) {
            Some(target) => match state.connections.get(target) {
                Some(connection) => connection.send_event(&event),
                None => {
                    debug!("Delivery miss: session for identity {} is gone", to);
                    false
                }
            },
            None => {
                debug!("Delivery miss: identity {} is not registered", to);
                false
            }
        }
    }
}

// Shared reference to the relay
pub type SharedRelay = Arc<Relay>;
