//! Core wire and identity types for Gridline.
//!
//! Everything a client sends or receives is defined here, together with
//! the identity types ([`ClientId`], [`Seat`]) that the room layer keys
//! its state on. These structures are the contract with the browser
//! client — the serde attributes pin the exact JSON shapes.

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity types
// ---------------------------------------------------------------------------

/// A unique identifier for a connected client.
///
/// Newtype around the connection counter assigned at accept time. There
/// is no authentication in Gridline — a connection *is* an identity for
/// as long as it stays open.
///
/// `#[serde(transparent)]` makes `ClientId(42)` serialize as just `42`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C-{}", self.0)
    }
}

/// One of the two permanent player slots in a room.
///
/// Seat 0 (the host) is the first connection to reference a room id,
/// seat 1 the second; everyone after that is a spectator. The seat
/// determines the mark placed on the board and who may configure the
/// room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Seat {
    /// Seat 0. Plays [`Mark::X`] and controls room config and resets.
    Host,
    /// Seat 1. Plays [`Mark::O`]; computer-controlled when AI is enabled
    /// and no human holds the seat.
    Guest,
}

impl Seat {
    /// The seat's index (0 or 1), used for `names`/`wins` arrays and the
    /// `turn` field of a snapshot.
    pub fn index(self) -> usize {
        match self {
            Self::Host => 0,
            Self::Guest => 1,
        }
    }

    /// The opposing seat.
    pub fn other(self) -> Seat {
        match self {
            Self::Host => Self::Guest,
            Self::Guest => Self::Host,
        }
    }

    /// The mark this seat places on the board.
    pub fn mark(self) -> Mark {
        match self {
            Self::Host => Mark::X,
            Self::Guest => Mark::O,
        }
    }
}

impl fmt::Display for Seat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "seat {}", self.index())
    }
}

// ---------------------------------------------------------------------------
// Board cells
// ---------------------------------------------------------------------------

/// The mark written into a board cell: `"X"` or `"O"` on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Mark {
    X,
    O,
}

/// A single board cell. Empty cells serialize as JSON `null`, matching
/// what grid-rendering clients expect.
pub type Cell = Option<Mark>;

/// The resolved outcome of a game: which mark completed a line, or a
/// draw. A room's `winner` field is `Option<Winner>` — `None` while the
/// game continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Winner {
    X,
    O,
    Draw,
}

impl From<Mark> for Winner {
    fn from(mark: Mark) -> Self {
        match mark {
            Mark::X => Self::X,
            Mark::O => Self::O,
        }
    }
}

// ---------------------------------------------------------------------------
// Inbound events
// ---------------------------------------------------------------------------

/// An event a client sends to its room.
///
/// `#[serde(tag = "type")]` produces internally tagged JSON:
/// `{ "type": "Move", "index": 4 }`. That keeps the client-side dispatch
/// a single switch on `type`.
///
/// Preconditions are enforced by the room session, not here — an event
/// that violates them is dropped silently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientEvent {
    /// Announce a display name and, for the host, optionally configure
    /// the room. Config fields sent by anyone else are ignored.
    ///
    /// A host join always starts a fresh round, so re-sending `Join`
    /// from seat 0 doubles as a "new game with these settings" action.
    Join {
        name: String,
        /// Board dimension N (the board has N² cells). Host-only; must
        /// be ≥ 1. Absent = keep the current size.
        #[serde(default)]
        grid_size: Option<usize>,
        /// Per-turn countdown in seconds. Host-only. Absent = keep the
        /// current timer (initially none).
        #[serde(default)]
        timer_seconds: Option<u64>,
        /// Whether seat 1 is computer-controlled while no human holds
        /// it. Host-only.
        #[serde(default)]
        ai_enabled: Option<bool>,
    },

    /// Place the sender's mark at a 0-based board index.
    Move { index: usize },

    /// Clear the board and start a new round. Host-only; cumulative
    /// `wins` and `names` survive.
    Reset,
}

// ---------------------------------------------------------------------------
// Outbound snapshot
// ---------------------------------------------------------------------------

/// The complete room state broadcast to every connection in a room after
/// each accepted event.
///
/// Clients render from snapshots alone — there are no incremental
/// updates to reconcile, so a dropped frame is healed by the next
/// broadcast.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// N² cells, row-major: index `r*N + c` is row r, column c.
    pub board: Vec<Cell>,
    /// Index of the seat whose move is currently valid (0 or 1).
    pub turn: u8,
    /// Display names per seat. Empty string until a seat joins.
    pub names: [String; 2],
    /// Cumulative win counters per seat. Survive resets.
    pub wins: [u32; 2],
    /// `None` while the game continues; terminal once set.
    pub winner: Option<Winner>,
    /// Board indices of the winning line. Non-empty iff `winner` is a
    /// mark (never for a draw).
    pub win_line: Vec<usize>,
    /// Board dimension N.
    pub grid_size: usize,
    /// Seconds left on the current turn. Omitted when no timer is
    /// configured.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_left: Option<u64>,
    /// Whether the computer opponent is enabled for seat 1.
    pub ai_enabled: bool,
}

// =========================================================================
// Tests
// =========================================================================
