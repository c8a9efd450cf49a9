//! Unified error type for the Gridline server.

use gridline_protocol::ProtocolError;
use gridline_room::RoomError;
use gridline_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum GridlineError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid path).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A room-level error (session unreachable).
    #[error(transparent)]
    Room(#[from] RoomError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let top: GridlineError = err.into();
        assert!(matches!(top, GridlineError::Protocol(_)));
        assert!(top.to_string().contains("bad"));
    }

    #[test]
    fn test_from_room_error() {
        let err = RoomError::Unavailable("lobby".into());
        let top: GridlineError = err.into();
        assert!(matches!(top, GridlineError::Room(_)));
    }
}
