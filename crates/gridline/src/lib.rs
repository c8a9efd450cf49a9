//! # Gridline
//!
//! Real-time multiplayer tic-tac-toe over WebSockets, on boards of any
//! size.
//!
//! Clients connect to `ws://host/ws/{room_id}`; the first two
//! connections to a room become the players, everyone after watches.
//! Every accepted action makes the room broadcast a full JSON snapshot
//! to all of its connections — clients hold no authoritative state.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gridline::GridlineServer;
//!
//! # async fn run() -> Result<(), gridline::GridlineError> {
//! let server = GridlineServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::GridlineError;
pub use server::{GridlineServer, GridlineServerBuilder};

/// Commonly used types, re-exported for server embedders.
pub mod prelude {
    pub use crate::{GridlineError, GridlineServer, GridlineServerBuilder};
    pub use gridline_game::{evaluate, GameState, Outcome};
    pub use gridline_protocol::{ClientEvent, ClientId, Mark, Seat, Snapshot, Winner};
    pub use gridline_room::{Role, RoomRegistry, SessionHandle};
}
