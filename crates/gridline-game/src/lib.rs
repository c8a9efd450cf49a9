//! Pure game rules for Gridline: the N×N win detector and the per-room
//! game state machine.
//!
//! Nothing in this crate does I/O or knows about connections, channels,
//! or time — the room layer injects all of that. Keeping the rules pure
//! makes every edge case unit-testable without an async runtime.
//!
//! # Key types
//!
//! - [`evaluate`] — the win detector: board in, [`Outcome`] out
//! - [`GameState`] — board, turn, winner, per-seat names/wins, config
//! - [`MoveOutcome`] — what an accepted move did to the game

mod detect;
mod state;

pub use detect::{evaluate, Outcome};
pub use state::{GameState, MoveOutcome, DEFAULT_GRID_SIZE};
