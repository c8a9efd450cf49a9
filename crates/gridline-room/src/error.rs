//! Error types for the room layer.

/// Errors that can occur while talking to a room session.
///
/// Invalid *game* input never surfaces here — the session drops it
/// silently. These errors mean the session itself cannot be reached.
#[derive(Debug, thiserror::Error)]
pub enum RoomError {
    /// The session's command channel is closed: the actor has stopped
    /// (usually because its last connection detached).
    #[error("room {0} is unavailable")]
    Unavailable(String),
}
