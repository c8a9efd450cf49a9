//! Room sessions for Gridline.
//!
//! Each room runs as an isolated Tokio task (actor model) owning one
//! [`gridline_game::GameState`], the seat assignments, and the room's
//! timers. The [`RoomRegistry`] maps room identifiers from connection
//! paths to running sessions, creating them on first reference.
//!
//! # Key types
//!
//! - [`RoomRegistry`] — get-or-create rooms by identifier
//! - [`SessionHandle`] — send commands to a running session actor
//! - [`Role`] — what a connection is to its room (player or spectator)
//! - [`SnapshotSender`] — per-connection outbound snapshot channel

mod error;
mod registry;
mod session;

pub use error::RoomError;
pub use registry::RoomRegistry;
pub use session::{spawn_session, Role, RoomInfo, SessionHandle, SnapshotSender};
