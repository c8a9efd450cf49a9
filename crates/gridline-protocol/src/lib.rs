//! Wire protocol for Gridline.
//!
//! This crate defines the "language" that clients and the server speak:
//!
//! - **Types** ([`ClientEvent`], [`Snapshot`], [`Mark`], etc.) — the
//!   message structures that travel on the wire, plus the identity types
//!   the rest of the server is built on ([`ClientId`], [`Seat`]).
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages
//!   are converted to/from bytes.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw bytes) and the room
//! layer (game state). It doesn't know about connections or rooms — it
//! only knows how to serialize and deserialize messages.
//!
//! ```text
//! Transport (bytes) → Protocol (ClientEvent / Snapshot) → Room (game state)
//! ```

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{Cell, ClientEvent, ClientId, Mark, Seat, Snapshot, Winner};
