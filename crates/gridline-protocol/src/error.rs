//! Error types for the protocol layer.

/// Errors that can occur while encoding or decoding wire messages.
///
/// Decode failures are the common case — clients can and do send
/// malformed frames. The server drops the frame (and logs it) rather
/// than terminating the connection.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// Serialization failed (turning a Rust type into bytes).
    #[cfg(feature = "json")]
    #[error("encode failed: {0}")]
    Encode(serde_json::Error),

    /// Deserialization failed (turning bytes into a Rust type).
    /// Common causes: malformed JSON, missing required fields, or an
    /// unknown event type tag.
    #[cfg(feature = "json")]
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// The message parsed but violates a protocol-level rule — e.g. a
    /// connection path with no room identifier.
    #[error("invalid message: {0}")]
    InvalidMessage(String),
}
