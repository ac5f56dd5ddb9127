//! Wire events for the relay protocol
//!
//! Every frame is a JSON object tagged by an `event` name with its fields
//! under `data`. Forwarded payloads stay opaque `serde_json::Value`s.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Routing envelope shared by the payload-forwarding events.
///
/// A resolvable `to` always wins over `room`; the two are never both used
/// for the same event.
#[derive(Debug, Clone, Deserialize)]
pub struct ForwardRequest {
    pub room: Option<String>,
    pub to: Option<String>,
    pub payload: Value,
}

/// Client-to-server events
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    /// Announce the identity this connection answers to
    Register { identity: String },

    /// Join a named room
    Join { room: String },

    /// Forward an opaque signaling payload
    Signal(ForwardRequest),

    /// Forward an opaque authentication payload
    Auth(ForwardRequest),

    /// Ask a registered identity for a connection
    RequestConnection {
        to: String,
        from: String,
        #[serde(rename = "fromLabel")]
        from_label: Option<String>,
    },

    /// Accept a connection request
    AcceptConnection { to: String, from: String },

    /// Reject a connection request
    RejectConnection { to: String, from: String },
}

/// Server-to-client events
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    /// Join refused, the room is at capacity; sent to the requester only
    RoomFull { room: String },

    /// Another connection joined a room you are in
    PeerJoined {
        #[serde(rename = "peerId")]
        peer_id: String,
    },

    /// A room member disconnected
    PeerLeft {
        #[serde(rename = "peerId")]
        peer_id: String,
    },

    /// Forwarded signaling payload
    Signal { payload: Value },

    /// Forwarded authentication payload
    Auth { payload: Value },

    /// Someone addressed your identity with a connection request
    IncomingRequest {
        from: String,
        #[serde(rename = "fromLabel", skip_serializing_if = "Option::is_none")]
        from_label: Option<String>,
    },

    /// The target accepted your connection request
    RequestAccepted { from: String },

    /// The target rejected your connection request
    RequestRejected { from: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_event_wire_names() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"event":"request-connection","data":{"to":"pk-b","from":"pk-a","fromLabel":"alice"}}"#,
        )
        .unwrap();
        match event {
            ClientEvent::RequestConnection { to, from, from_label } => {
                assert_eq!(to, "pk-b");
                assert_eq!(from, "pk-a");
                assert_eq!(from_label.as_deref(), Some("alice"));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_signal_routing_fields_are_optional() {
        let event: ClientEvent = serde_json::from_str(
            r#"{"event":"signal","data":{"payload":{"sdp":"offer"}}}"#,
        )
        .unwrap();
        match event {
            ClientEvent::Signal(req) => {
                assert!(req.room.is_none());
                assert!(req.to.is_none());
                assert_eq!(req.payload, json!({"sdp": "offer"}));
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_server_event_serialization() {
        let event = ServerEvent::PeerJoined {
            peer_id: "abc".to_string(),
        };
        let text = serde_json::to_string(&event).unwrap();
        assert_eq!(text, r#"{"event":"peer-joined","data":{"peerId":"abc"}}"#);
    }

    #[test]
    fn test_incoming_request_omits_absent_label() {
        let event = ServerEvent::IncomingRequest {
            from: "pk-a".to_string(),
            from_label: None,
        };
        let text = serde_json::to_string(&event).unwrap();
        assert!(!text.contains("fromLabel"));
    }
}
