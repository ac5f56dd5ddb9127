//! Room membership: named, capacity-bounded sets of connections
//!
//! Rooms are created implicitly on first join and removed once the last
//! member leaves. Names are client-chosen and carry no format constraint.

use std::collections::{HashMap, HashSet};

use crate::error::{RelayError, Result};

/// Manages all room member sets in the relay
#[derive(Debug)]
pub struct RoomManager {
    /// Map of room name to member session ids
    rooms: HashMap<String, HashSet<String>>,
    /// Maximum number of members allowed in any room
    max_members: usize,
}

impl RoomManager {
    pub fn new(max_members: usize) -> Self {
        Self {
            rooms: HashMap::new(),
            max_members,
        }
    }

    /// Add a session to a room.
    ///
    /// The capacity check runs against the current member count before the
    /// add, so a member of an already-full room re-joining is also refused.
    pub fn join(&mut self, room: &str, session_id: &str) -> Result<()> {
        if self.member_count(room) >= self.max_members {
            return Err(RelayError::RoomFull);
        }

        self.rooms
            .entry(room.to_string())
            .or_default()
            .insert(session_id.to_string());

        Ok(())
    }

    /// Remove a session from a room, dropping the room once empty
    pub fn leave(&mut self, room: &str, session_id: &str) {
        if let Some(members) = self.rooms.get_mut(room) {
            members.remove(session_id);
            if members.is_empty() {
                self.rooms.remove(room);
            }
        }
    }

    /// Iterate over the current members of a room
    pub fn members(&self, room: &str) -> impl Iterator<Item = &String> {
        self.rooms.get(room).into_iter().flatten()
    }

    /// Returns the number of members in a room (zero if it does not exist)
    pub fn member_count(&self, room: &str) -> usize {
        self.rooms.get(room).map_or(0, HashSet::len)
    }

    /// Checks if a session is a member of a room
    pub fn has_member(&self, room: &str, session_id: &str) -> bool {
        self.rooms
            .get(room)
            .map_or(false, |members| members.contains(session_id))
    }
}
