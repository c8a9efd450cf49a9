//! Room registry: maps room identifiers to running sessions.

use std::collections::HashMap;

use crate::session::{spawn_session, SessionHandle};

/// All active rooms, keyed by the identifier clients put in their
/// connection path.
///
/// Rooms are created on first reference — there is no explicit create
/// call. A session stops on its own when its last connection detaches;
/// the registry detects the dead handle on the next lookup and spawns a
/// fresh session under the same identifier, which is how vacated rooms
/// become playable again.
///
/// The registry itself is synchronous; the server keeps it behind a
/// mutex and holds the lock only for the map lookup, never across an
/// await on the session.
pub struct RoomRegistry {
    rooms: HashMap<String, SessionHandle>,
}

impl RoomRegistry {
    /// Creates a new, empty registry.
    pub fn new() -> Self {
        Self {
            rooms: HashMap::new(),
        }
    }

    /// Returns the session for `room_id`, spawning one if the room does
    /// not exist yet or its previous session has stopped.
    pub fn get_or_create(&mut self, room_id: &str) -> SessionHandle {
        if let Some(handle) = self.rooms.get(room_id) {
            if !handle.is_closed() {
                return handle.clone();
            }
        }

        let handle = spawn_session(room_id.to_string());
        self.rooms.insert(room_id.to_string(), handle.clone());
        tracing::info!(room_id, "room created");
        handle
    }

    /// Drops registry entries whose sessions have stopped. Lookup
    /// already handles stale entries, so this is just housekeeping to
    /// keep the map from growing with dead rooms.
    pub fn prune(&mut self) {
        self.rooms.retain(|_, handle| !handle.is_closed());
    }

    /// Returns the number of registered rooms, stopped ones included
    /// until the next [`prune`](Self::prune).
    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}
